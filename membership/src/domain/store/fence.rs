//! Staleness fencing for fetches that may overlap.
//!
//! Each fetch stamps a [`FetchTicket`] when it is dispatched. Only the ticket
//! with the latest sequence for its channel may commit, and only while its
//! project is still selected. Superseded responses are dropped.

use std::fmt;

use super::{MembershipStore, Mutation};
use crate::domain::ProjectId;

/// Independent fetch streams, each with its own sequence and loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchChannel {
    /// Member listings for the selected project.
    ProjectMembers,
    /// Candidate searches for the selected project.
    AvailableMembers,
}

impl FetchChannel {
    pub(super) const fn loading(self, loading: bool) -> Mutation {
        match self {
            Self::ProjectMembers => Mutation::SetProjectMembersLoading(loading),
            Self::AvailableMembers => Mutation::SetAvailableMembersLoading(loading),
        }
    }
}

impl fmt::Display for FetchChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ProjectMembers => "project_members",
            Self::AvailableMembers => "available_members",
        })
    }
}

/// Stamp identifying one dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub(super) channel: FetchChannel,
    pub(super) sequence: u64,
    pub(super) project_id: ProjectId,
}

impl FetchTicket {
    /// Channel the fetch belongs to.
    pub const fn channel(&self) -> FetchChannel {
        self.channel
    }

    /// Monotonic dispatch sequence within the channel.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Project that was selected when the fetch was dispatched.
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Holds a channel's loading flag for the lifetime of one fetch.
///
/// Dropping the guard clears the flag on every exit path, including failure and
/// cancellation of the owning future, unless a newer fetch on the same channel
/// has taken the flag over.
#[must_use = "dropping the guard releases the loading flag immediately"]
pub(crate) struct LoadingGuard<'a> {
    store: &'a MembershipStore,
    ticket: FetchTicket,
}

impl<'a> LoadingGuard<'a> {
    pub(super) const fn new(store: &'a MembershipStore, ticket: FetchTicket) -> Self {
        Self { store, ticket }
    }

    pub(crate) const fn ticket(&self) -> FetchTicket {
        self.ticket
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.release_loading(&self.ticket);
    }
}
