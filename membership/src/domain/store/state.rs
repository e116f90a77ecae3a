//! Plain data held by the membership store.

use std::collections::HashMap;

use crate::domain::{AvailableMember, Project, ProjectId, ProjectMember, ProjectMemberId, Role};

/// Project members in display order, indexed by membership id.
///
/// Lookups for tombstoning and role updates are O(1); iteration follows the
/// order in which the service listed (or the store appended) members. A record
/// whose id is already present replaces the existing entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberRoster {
    members: Vec<ProjectMember>,
    index: HashMap<ProjectMemberId, usize>,
}

impl MemberRoster {
    /// Build a roster from a full member listing.
    ///
    /// # Examples
    /// ```
    /// use membership::domain::MemberRoster;
    ///
    /// let roster = MemberRoster::from_members(Vec::new());
    /// assert!(roster.is_empty());
    /// ```
    pub fn from_members(members: Vec<ProjectMember>) -> Self {
        let mut roster = Self {
            members: Vec::with_capacity(members.len()),
            index: HashMap::with_capacity(members.len()),
        };
        for member in members {
            roster.upsert(member);
        }
        roster
    }

    /// Insert `member`, replacing any entry with the same id in place.
    pub fn upsert(&mut self, member: ProjectMember) {
        match self.index.get(&member.project_member_id) {
            Some(&position) => {
                if let Some(slot) = self.members.get_mut(position) {
                    *slot = member;
                }
            }
            None => {
                self.index
                    .insert(member.project_member_id, self.members.len());
                self.members.push(member);
            }
        }
    }

    /// Set the tombstone on `id`. Returns `false` when `id` is unknown.
    pub fn mark_deleted(&mut self, id: ProjectMemberId) -> bool {
        self.get_mut(id)
            .map(|member| member.is_deleted = true)
            .is_some()
    }

    /// Change the role held by `id`. Returns `false` when `id` is unknown.
    pub fn update_role(&mut self, id: ProjectMemberId, role: Role) -> bool {
        self.get_mut(id).map(|member| member.role = role).is_some()
    }

    /// Look up a member by id, tombstoned or not.
    pub fn get(&self, id: ProjectMemberId) -> Option<&ProjectMember> {
        self.index
            .get(&id)
            .and_then(|&position| self.members.get(position))
    }

    fn get_mut(&mut self, id: ProjectMemberId) -> Option<&mut ProjectMember> {
        let position = *self.index.get(&id)?;
        self.members.get_mut(position)
    }

    /// Iterate over every member, tombstones included.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectMember> {
        self.members.iter()
    }

    /// Iterate over members that are not tombstoned.
    pub fn active(&self) -> impl Iterator<Item = &ProjectMember> {
        self.members.iter().filter(|member| !member.is_deleted)
    }

    /// Number of members, tombstones included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster holds no members at all.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Search state for candidate members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Query of the most recently issued search.
    pub query: String,
    /// Results of the most recent search that was still current on arrival.
    pub results: Vec<AvailableMember>,
}

/// Everything the membership view shows.
///
/// This is the canonical data; it carries no behaviour beyond the roster's
/// bookkeeping. Writes go through [`super::Mutation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipState {
    /// Projects visible to the caller.
    pub projects: Vec<Project>,
    /// Members of the selected project.
    pub project_members: MemberRoster,
    /// Unfiltered candidate pool for the selected project.
    pub available_members: Vec<AvailableMember>,
    /// Selected project, if any.
    pub selected_project_id: Option<ProjectId>,
    /// Whether a member listing is in flight.
    pub project_members_loading: bool,
    /// Whether a candidate search is in flight.
    pub available_members_loading: bool,
    /// Candidate search query and results.
    pub search: SearchState,
}
