//! Membership actions.
//!
//! The service is the only caller of the gateway. It stamps fetches, turns
//! responses into named mutations and decides what a failure means: read
//! actions log and keep the previous state, write actions log and return a
//! domain [`Error`].
//!
//! Fetches that can overlap (`fetch_project_members`,
//! `fetch_available_members`, `select_project`) do their bookkeeping when they
//! are called, not when the returned future is first polled. The ticket is
//! stamped and the loading flag raised before the method returns, so call
//! order is dispatch order.

use std::future::Future;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CreateProjectMemberRequest, MembershipGateway, MembershipGatewayError,
    ModifyProjectMemberRequest, RemoveProjectMemberRequest,
};
use crate::domain::store::LoadingGuard;
use crate::domain::{
    EmployeeId, Error, FetchChannel, MembershipResult, MembershipStore, Mutation, ProjectId,
    ProjectMember, ProjectMemberId, Role,
};

/// How a read action settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was committed to the store.
    Committed,
    /// A newer fetch or a selection change made the response stale; it was
    /// dropped.
    Superseded,
    /// The gateway failed; the previous state was kept.
    Failed,
    /// No project was selected, so nothing was requested.
    Skipped,
}

/// Settlement of both fetches dispatched by [`ProjectMembershipService::select_project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Outcome of the member listing.
    pub project_members: FetchOutcome,
    /// Outcome of the candidate listing.
    pub available_members: FetchOutcome,
}

/// Result of a successful role change.
///
/// The role change itself has already succeeded; `refresh` reports the member
/// refetch that follows it on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyOutcome {
    /// Outcome of the member refetch issued after the change.
    pub refresh: FetchOutcome,
}

/// Asynchronous actions over a [`MembershipStore`].
#[derive(Clone)]
pub struct ProjectMembershipService {
    gateway: Arc<dyn MembershipGateway>,
    store: Arc<MembershipStore>,
}

impl ProjectMembershipService {
    /// Create a service acting on `store` through `gateway`.
    pub fn new(gateway: Arc<dyn MembershipGateway>, store: Arc<MembershipStore>) -> Self {
        Self { gateway, store }
    }

    /// Store the service writes to.
    pub fn store(&self) -> &Arc<MembershipStore> {
        &self.store
    }

    /// Replace the project list.
    ///
    /// Failures are logged and leave the previous list in place. No loading
    /// flag is kept for projects.
    pub async fn fetch_projects(&self) -> FetchOutcome {
        match self.gateway.list_projects().await {
            Ok(projects) => {
                debug!(count = projects.len(), "projects loaded");
                self.store.commit(Mutation::SetProjects(projects));
                FetchOutcome::Committed
            }
            Err(error) => {
                error!(kind = error.kind(), %error, "failed to load projects");
                FetchOutcome::Failed
            }
        }
    }

    /// Reload the members of the selected project.
    ///
    /// Without a selection this logs a warning and requests nothing. Otherwise
    /// the member loading flag is raised now and cleared when the fetch
    /// settles. A successful response replaces the roster, dropping every
    /// tombstone.
    ///
    /// # Examples
    /// ```rust,ignore
    /// let refresh = service.fetch_project_members();
    /// assert!(service.store().is_project_members_loading());
    /// let outcome = refresh.await;
    /// ```
    pub fn fetch_project_members(&self) -> impl Future<Output = FetchOutcome> + Send + '_ {
        let guard = self
            .store
            .begin_fetch(FetchChannel::ProjectMembers, None::<Mutation>);
        async move {
            match guard {
                Some(guard) => self.load_project_members(guard).await,
                None => {
                    warn!("project member fetch skipped: no project selected");
                    FetchOutcome::Skipped
                }
            }
        }
    }

    /// Search the selected project's candidates.
    ///
    /// `query` is recorded as the current search query immediately. Only the
    /// most recently issued search may commit its results; an empty query also
    /// refreshes the unfiltered candidate pool.
    pub fn fetch_available_members(
        &self,
        query: impl Into<String>,
    ) -> impl Future<Output = FetchOutcome> + Send + '_ {
        let query = query.into();
        let guard = self.store.begin_fetch(
            FetchChannel::AvailableMembers,
            [Mutation::SetSearchQuery(query.clone())],
        );
        async move {
            match guard {
                Some(guard) => self.load_available_members(guard, query).await,
                None => {
                    warn!(%query, "candidate search skipped: no project selected");
                    FetchOutcome::Skipped
                }
            }
        }
    }

    /// Select `project_id` and load its members and candidates.
    ///
    /// The selection and both dependent fetches are dispatched before this
    /// returns; the returned future drives the two fetches concurrently.
    /// Responses for any earlier selection are discarded.
    ///
    /// # Examples
    /// ```rust,ignore
    /// let first = service.select_project(ProjectId::new(1));
    /// let second = service.select_project(ProjectId::new(2));
    /// let (_, outcome) = tokio::join!(first, second);
    /// assert_eq!(outcome.project_members, FetchOutcome::Committed);
    /// ```
    pub fn select_project(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = SelectionOutcome> + Send + '_ {
        let (members, candidates) = self.store.begin_selection(project_id);
        info!(%project_id, "project selected");
        async move {
            let (project_members, available_members) = tokio::join!(
                self.load_project_members(members),
                self.load_available_members(candidates, String::new()),
            );
            SelectionOutcome {
                project_members,
                available_members,
            }
        }
    }

    /// Add `employee_id` to the selected project with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidRequest`] for a role outside
    /// `PA`, `PL`, `PM` and [`crate::domain::ErrorCode::NoProjectSelected`]
    /// without a selection; neither sends a request. Gateway failures return
    /// [`crate::domain::ErrorCode::Remote`] and leave the roster untouched.
    pub async fn add_project_member(
        &self,
        employee_id: EmployeeId,
        role: &str,
    ) -> MembershipResult<ProjectMember> {
        let role = parse_role(role)?;
        let project_id = self.require_selection("add a project member")?;
        let request = CreateProjectMemberRequest {
            employee_id,
            project_id,
            role,
        };

        let member = self
            .gateway
            .create_project_member(&request)
            .await
            .map_err(|error| remote_failure("add the project member", error))?;

        info!(
            %project_id,
            project_member_id = %member.project_member_id,
            %employee_id,
            %role,
            "project member added"
        );
        if !self
            .store
            .commit_for_project(project_id, Mutation::AddProjectMember(member.clone()))
        {
            debug!(%project_id, "added member not shown: selection changed");
        }
        Ok(member)
    }

    /// Remove a member from the selected project, recording `reason`.
    ///
    /// On success the member is tombstoned locally and disappears from
    /// [`MembershipStore::active_members`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::NoProjectSelected`] without a
    /// selection and [`crate::domain::ErrorCode::Remote`] when the gateway
    /// fails; the roster is unchanged in both cases.
    pub async fn remove_project_member(
        &self,
        project_member_id: ProjectMemberId,
        reason: impl Into<String>,
    ) -> MembershipResult<()> {
        let project_id = self.require_selection("remove a project member")?;
        let request = RemoveProjectMemberRequest {
            project_id,
            reason: reason.into(),
        };

        self.gateway
            .remove_project_member(project_member_id, &request)
            .await
            .map_err(|error| remote_failure("remove the project member", error))?;

        info!(%project_id, %project_member_id, "project member removed");
        self.store.commit_for_project(
            project_id,
            Mutation::MarkProjectMemberDeleted(project_member_id),
        );
        Ok(())
    }

    /// Change a member's role, then reload the roster.
    ///
    /// The role is patched locally as soon as the service accepts it. The
    /// follow-up refetch reconciles server-side side effects; its outcome is
    /// reported in [`ModifyOutcome::refresh`] and never turns the call into
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidRequest`] for a role outside
    /// the enumeration (no request is sent),
    /// [`crate::domain::ErrorCode::NoProjectSelected`] without a selection and
    /// [`crate::domain::ErrorCode::Remote`] when the update itself fails.
    pub async fn modify_project_member(
        &self,
        project_member_id: ProjectMemberId,
        role: &str,
    ) -> MembershipResult<ModifyOutcome> {
        let role = parse_role(role)?;
        let project_id = self.require_selection("change a member's role")?;
        let request = ModifyProjectMemberRequest { project_id, role };

        self.gateway
            .modify_project_member(project_member_id, &request)
            .await
            .map_err(|error| remote_failure("change the member's role", error))?;

        info!(%project_id, %project_member_id, %role, "project member role changed");
        self.store.commit_for_project(
            project_id,
            Mutation::UpdateProjectMemberRole {
                project_member_id,
                role,
            },
        );

        let refresh = self.fetch_project_members().await;
        if refresh == FetchOutcome::Failed {
            warn!(
                %project_id,
                %project_member_id,
                "role changed but the member list could not be refreshed"
            );
        }
        Ok(ModifyOutcome { refresh })
    }

    async fn load_project_members(&self, guard: LoadingGuard<'_>) -> FetchOutcome {
        let ticket = guard.ticket();
        debug!(
            project_id = %ticket.project_id(),
            sequence = ticket.sequence(),
            "loading project members"
        );
        let result = self.gateway.list_project_members(ticket.project_id()).await;
        if !self.store.is_current(&ticket) {
            return superseded(ticket.channel(), ticket.sequence());
        }

        match result {
            Ok(members) => {
                if self
                    .store
                    .commit_if_current(&ticket, [Mutation::SetProjectMembers(members)])
                {
                    FetchOutcome::Committed
                } else {
                    superseded(ticket.channel(), ticket.sequence())
                }
            }
            Err(error) => {
                error!(
                    project_id = %ticket.project_id(),
                    kind = error.kind(),
                    %error,
                    "failed to load project members"
                );
                FetchOutcome::Failed
            }
        }
    }

    async fn load_available_members(
        &self,
        guard: LoadingGuard<'_>,
        query: String,
    ) -> FetchOutcome {
        let ticket = guard.ticket();
        debug!(
            project_id = %ticket.project_id(),
            sequence = ticket.sequence(),
            %query,
            "searching candidate members"
        );
        let result = self
            .gateway
            .list_available_members(ticket.project_id(), &query)
            .await;
        if !self.store.is_current(&ticket) {
            return superseded(ticket.channel(), ticket.sequence());
        }

        match result {
            Ok(candidates) => {
                let mut mutations = Vec::with_capacity(2);
                if query.is_empty() {
                    mutations.push(Mutation::SetAvailableMembers(candidates.clone()));
                }
                mutations.push(Mutation::SetSearchResults(candidates));
                if self.store.commit_if_current(&ticket, mutations) {
                    FetchOutcome::Committed
                } else {
                    superseded(ticket.channel(), ticket.sequence())
                }
            }
            Err(error) => {
                error!(
                    project_id = %ticket.project_id(),
                    %query,
                    kind = error.kind(),
                    %error,
                    "failed to search candidate members"
                );
                FetchOutcome::Failed
            }
        }
    }

    fn require_selection(&self, action: &str) -> MembershipResult<ProjectId> {
        self.store.selected_project_id().ok_or_else(|| {
            warn!(action, "rejected: no project selected");
            Error::no_project_selected(format!("select a project before trying to {action}"))
        })
    }
}

fn parse_role(raw: &str) -> MembershipResult<Role> {
    raw.parse::<Role>().map_err(|error| {
        warn!(%error, "rejected role before sending");
        Error::invalid_request(error.to_string()).with_details(json!({ "role": raw }))
    })
}

fn remote_failure(action: &str, error: MembershipGatewayError) -> Error {
    error!(kind = error.kind(), %error, "failed to {action}");
    Error::remote(format!("could not {action}; the membership service did not accept it"))
        .with_details(json!({ "kind": error.kind(), "cause": error.to_string() }))
}

fn superseded(channel: FetchChannel, sequence: u64) -> FetchOutcome {
    debug!(%channel, sequence, "discarding superseded response");
    FetchOutcome::Superseded
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
