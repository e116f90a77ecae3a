//! Named mutations, the only writers of [`MembershipState`].

use tracing::trace;

use super::{MemberRoster, MembershipState};
use crate::domain::{AvailableMember, Project, ProjectId, ProjectMember, ProjectMemberId, Role};

/// One synchronous write to the membership state.
///
/// Every mutation is total and touches only the field(s) its name implies.
/// Mutations addressing an unknown member id are no-ops; roles are not
/// re-validated here because [`Role`] cannot hold an invalid value.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Replace the project list.
    SetProjects(Vec<Project>),
    /// Replace the member roster, discarding every tombstone.
    SetProjectMembers(Vec<ProjectMember>),
    /// Replace the unfiltered candidate pool.
    SetAvailableMembers(Vec<AvailableMember>),
    /// Append a member returned by the service.
    AddProjectMember(ProjectMember),
    /// Tombstone a member.
    MarkProjectMemberDeleted(ProjectMemberId),
    /// Change a member's role in place.
    UpdateProjectMemberRole {
        /// Member to update.
        project_member_id: ProjectMemberId,
        /// New role.
        role: Role,
    },
    /// Change the selected project.
    SetSelectedProjectId(Option<ProjectId>),
    /// Toggle the member-listing flag.
    SetProjectMembersLoading(bool),
    /// Toggle the candidate-search flag.
    SetAvailableMembersLoading(bool),
    /// Record the query of the latest search.
    SetSearchQuery(String),
    /// Replace the search results.
    SetSearchResults(Vec<AvailableMember>),
}

impl Mutation {
    /// Stable name of the mutation, used in traces.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetProjects(_) => "setProjects",
            Self::SetProjectMembers(_) => "setProjectMembers",
            Self::SetAvailableMembers(_) => "setAvailableMembers",
            Self::AddProjectMember(_) => "addProjectMember",
            Self::MarkProjectMemberDeleted(_) => "markProjectMemberDeleted",
            Self::UpdateProjectMemberRole { .. } => "updateProjectMemberRole",
            Self::SetSelectedProjectId(_) => "setSelectedProjectId",
            Self::SetProjectMembersLoading(_) => "setProjectMembersLoading",
            Self::SetAvailableMembersLoading(_) => "setAvailableMembersLoading",
            Self::SetSearchQuery(_) => "setSearchQuery",
            Self::SetSearchResults(_) => "setSearchResults",
        }
    }

    /// Apply the mutation to `state`.
    ///
    /// # Examples
    /// ```
    /// use membership::domain::{MembershipState, Mutation, ProjectId};
    ///
    /// let mut state = MembershipState::default();
    /// Mutation::SetSelectedProjectId(Some(ProjectId::new(1))).apply(&mut state);
    /// assert_eq!(state.selected_project_id, Some(ProjectId::new(1)));
    /// ```
    pub fn apply(self, state: &mut MembershipState) {
        trace!(mutation = self.name(), "applying mutation");
        match self {
            Self::SetProjects(projects) => state.projects = projects,
            Self::SetProjectMembers(members) => {
                state.project_members = MemberRoster::from_members(members);
            }
            Self::SetAvailableMembers(members) => state.available_members = members,
            Self::AddProjectMember(member) => state.project_members.upsert(member),
            Self::MarkProjectMemberDeleted(id) => {
                if !state.project_members.mark_deleted(id) {
                    trace!(project_member_id = %id, "tombstone skipped: unknown member");
                }
            }
            Self::UpdateProjectMemberRole {
                project_member_id,
                role,
            } => {
                if !state.project_members.update_role(project_member_id, role) {
                    trace!(%project_member_id, "role update skipped: unknown member");
                }
            }
            Self::SetSelectedProjectId(project_id) => state.selected_project_id = project_id,
            Self::SetProjectMembersLoading(loading) => state.project_members_loading = loading,
            Self::SetAvailableMembersLoading(loading) => {
                state.available_members_loading = loading;
            }
            Self::SetSearchQuery(query) => state.search.query = query,
            Self::SetSearchResults(results) => state.search.results = results,
        }
    }
}
