//! The membership state container and its derived views.
//!
//! [`MembershipStore`] owns one [`MembershipState`] behind a mutex. Writers go
//! through [`MembershipStore::commit`] with a named [`Mutation`]; each mutation
//! is applied under the lock, so no two writes interleave. Readers receive
//! owned projections computed from the latest committed state. The lock is
//! never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{AvailableMember, Project, ProjectId, ProjectMember, ProjectMemberId};

mod fence;
mod mutation;
mod state;

pub use fence::{FetchChannel, FetchTicket};
pub(crate) use fence::LoadingGuard;
pub use mutation::Mutation;
pub use state::{MemberRoster, MembershipState, SearchState};

#[derive(Debug, Default)]
struct StoreInner {
    state: MembershipState,
    project_members_sequence: u64,
    available_members_sequence: u64,
}

impl StoreInner {
    const fn latest(&self, channel: FetchChannel) -> u64 {
        match channel {
            FetchChannel::ProjectMembers => self.project_members_sequence,
            FetchChannel::AvailableMembers => self.available_members_sequence,
        }
    }

    fn stamp(
        &mut self,
        channel: FetchChannel,
        project_id: ProjectId,
        prelude: impl IntoIterator<Item = Mutation>,
    ) -> FetchTicket {
        let sequence = match channel {
            FetchChannel::ProjectMembers => &mut self.project_members_sequence,
            FetchChannel::AvailableMembers => &mut self.available_members_sequence,
        };
        *sequence += 1;
        let ticket = FetchTicket {
            channel,
            sequence: *sequence,
            project_id,
        };

        channel.loading(true).apply(&mut self.state);
        for mutation in prelude {
            mutation.apply(&mut self.state);
        }
        ticket
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest(ticket.channel) == ticket.sequence
            && self.state.selected_project_id == Some(ticket.project_id)
    }
}

/// Single state container for one membership view.
///
/// Construct one per session and share it through `Arc`; independent
/// instances never observe each other.
///
/// # Examples
/// ```
/// use membership::domain::{MembershipStore, Mutation, ProjectId};
///
/// let store = MembershipStore::new();
/// store.commit(Mutation::SetSelectedProjectId(Some(ProjectId::new(9))));
/// assert_eq!(store.selected_project_id(), Some(ProjectId::new(9)));
/// assert!(store.active_members().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MembershipStore {
    inner: Mutex<StoreInner>,
}

impl MembershipStore {
    /// Create an empty store with no project selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `state`.
    pub fn with_state(state: MembershipState) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                state,
                ..StoreInner::default()
            }),
        }
    }

    // Mutations are total, so a panic elsewhere cannot leave the state half
    // written; recovering the guard keeps the view usable.
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one mutation.
    pub fn commit(&self, mutation: Mutation) {
        mutation.apply(&mut self.lock().state);
    }

    /// Apply `mutation` only while `project_id` is still selected.
    pub(crate) fn commit_for_project(&self, project_id: ProjectId, mutation: Mutation) -> bool {
        let mut inner = self.lock();
        if inner.state.selected_project_id != Some(project_id) {
            return false;
        }
        mutation.apply(&mut inner.state);
        true
    }

    /// Dispatch a fetch on `channel` for the selected project.
    ///
    /// Stamps a new ticket, raises the channel's loading flag and applies
    /// `prelude`, all under one lock. Returns `None` without touching the state
    /// when no project is selected.
    pub(crate) fn begin_fetch(
        &self,
        channel: FetchChannel,
        prelude: impl IntoIterator<Item = Mutation>,
    ) -> Option<LoadingGuard<'_>> {
        let ticket = {
            let mut inner = self.lock();
            let project_id = inner.state.selected_project_id?;
            inner.stamp(channel, project_id, prelude)
        };
        Some(LoadingGuard::new(self, ticket))
    }

    /// Select `project_id` and dispatch both of its dependent fetches.
    ///
    /// The selection change, both ticket stamps, both loading flags and the
    /// reset of the search query happen under one lock. Every fetch dispatched
    /// for a previous selection becomes stale.
    pub(crate) fn begin_selection(
        &self,
        project_id: ProjectId,
    ) -> (LoadingGuard<'_>, LoadingGuard<'_>) {
        let (members, candidates) = {
            let mut inner = self.lock();
            Mutation::SetSelectedProjectId(Some(project_id)).apply(&mut inner.state);
            let members = inner.stamp(FetchChannel::ProjectMembers, project_id, None::<Mutation>);
            let candidates = inner.stamp(
                FetchChannel::AvailableMembers,
                project_id,
                [Mutation::SetSearchQuery(String::new())],
            );
            (members, candidates)
        };
        (
            LoadingGuard::new(self, members),
            LoadingGuard::new(self, candidates),
        )
    }

    /// Whether `ticket` may still commit.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.lock().is_current(ticket)
    }

    /// Apply `mutations` atomically if `ticket` is still current.
    pub(crate) fn commit_if_current(
        &self,
        ticket: &FetchTicket,
        mutations: impl IntoIterator<Item = Mutation>,
    ) -> bool {
        let mut inner = self.lock();
        if !inner.is_current(ticket) {
            return false;
        }
        for mutation in mutations {
            mutation.apply(&mut inner.state);
        }
        true
    }

    fn release_loading(&self, ticket: &FetchTicket) {
        let mut inner = self.lock();
        if inner.latest(ticket.channel) == ticket.sequence {
            ticket.channel.loading(false).apply(&mut inner.state);
        }
    }

    /// Run `read` against the current state.
    ///
    /// The store is locked while `read` runs; it must not call back into the
    /// store.
    pub fn read<R>(&self, read: impl FnOnce(&MembershipState) -> R) -> R {
        read(&self.lock().state)
    }

    /// Clone of the whole current state.
    pub fn snapshot(&self) -> MembershipState {
        self.read(Clone::clone)
    }

    /// Members that are not tombstoned, in roster order.
    pub fn active_members(&self) -> Vec<ProjectMember> {
        self.read(|state| state.project_members.active().cloned().collect())
    }

    /// Look up a member by id, tombstoned or not.
    pub fn member(&self, id: ProjectMemberId) -> Option<ProjectMember> {
        self.read(|state| state.project_members.get(id).cloned())
    }

    /// Projects visible to the caller.
    pub fn projects(&self) -> Vec<Project> {
        self.read(|state| state.projects.clone())
    }

    /// Candidate pool without tombstoned entries.
    pub fn available_members(&self) -> Vec<AvailableMember> {
        self.read(|state| {
            state
                .available_members
                .iter()
                .filter(|candidate| !candidate.is_deleted)
                .cloned()
                .collect()
        })
    }

    /// Query of the most recently issued candidate search.
    pub fn search_query(&self) -> String {
        self.read(|state| state.search.query.clone())
    }

    /// Results of the latest candidate search that was current on arrival.
    pub fn search_results(&self) -> Vec<AvailableMember> {
        self.read(|state| state.search.results.clone())
    }

    /// Currently selected project.
    pub fn selected_project_id(&self) -> Option<ProjectId> {
        self.read(|state| state.selected_project_id)
    }

    /// Whether a member listing is in flight.
    pub fn is_project_members_loading(&self) -> bool {
        self.read(|state| state.project_members_loading)
    }

    /// Whether a candidate search is in flight.
    pub fn is_available_members_loading(&self) -> bool {
        self.read(|state| state.available_members_loading)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
