//! Shared test doubles and builders for unit tests.
//!
//! [`ScriptedGateway`] hands out responses the test scripted in advance. A
//! response can be ready immediately or deferred behind a oneshot sender, so a
//! test decides exactly when, and in which order, overlapping requests settle.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Map;
use tokio::sync::oneshot;

use crate::domain::ports::{
    CreateProjectMemberRequest, MembershipGateway, MembershipGatewayError,
    ModifyProjectMemberRequest, RemoveProjectMemberRequest,
};
use crate::domain::{
    AvailableMember, EmployeeId, Project, ProjectId, ProjectMember, ProjectMemberId, Role,
};

/// Result type every gateway method returns.
pub type GatewayResult<T> = Result<T, MembershipGatewayError>;

/// Active member `id` for `employee_id` with `role`.
pub fn member(id: i64, employee_id: i64, role: Role) -> ProjectMember {
    ProjectMember {
        project_member_id: ProjectMemberId::new(id),
        employee_id: EmployeeId::new(employee_id),
        role,
        is_deleted: false,
        employee_name: None,
        extra: Map::new(),
    }
}

/// Candidate `employee_id` named `name`.
pub fn candidate(employee_id: i64, name: &str) -> AvailableMember {
    AvailableMember {
        employee_id: EmployeeId::new(employee_id),
        employee_name: Some(name.to_owned()),
        is_deleted: false,
        extra: Map::new(),
    }
}

/// Project `id` titled `title`.
pub fn project(id: i64, title: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        title: title.to_owned(),
        extra: Map::new(),
    }
}

/// Responses queued per key, consumed in FIFO order.
pub struct ResponseQueue<K, T> {
    pending: Mutex<HashMap<K, VecDeque<oneshot::Receiver<GatewayResult<T>>>>>,
}

impl<K, T> Default for ResponseQueue<K, T> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, T> ResponseQueue<K, T>
where
    K: Eq + Hash + std::fmt::Debug,
{
    /// Queue a response that is delivered as soon as it is requested.
    pub fn ready(&self, key: K, result: GatewayResult<T>) {
        let (sender, receiver) = oneshot::channel();
        if sender.send(result).is_err() {
            panic!("receiver is held locally");
        }
        self.push(key, receiver);
    }

    /// Queue a response the test completes later through the returned sender.
    pub fn deferred(&self, key: K) -> oneshot::Sender<GatewayResult<T>> {
        let (sender, receiver) = oneshot::channel();
        self.push(key, receiver);
        sender
    }

    fn push(&self, key: K, receiver: oneshot::Receiver<GatewayResult<T>>) {
        self.pending
            .lock()
            .expect("response queue mutex")
            .entry(key)
            .or_default()
            .push_back(receiver);
    }

    async fn next(&self, key: K) -> GatewayResult<T> {
        let receiver = self
            .pending
            .lock()
            .expect("response queue mutex")
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        match receiver {
            Some(receiver) => receiver.await.unwrap_or_else(|_| {
                Err(MembershipGatewayError::transport(
                    "scripted response sender dropped",
                ))
            }),
            None => Err(MembershipGatewayError::invalid_request(format!(
                "no scripted response for {key:?}"
            ))),
        }
    }
}

/// One request observed by [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list_projects`.
    ListProjects,
    /// `list_project_members` for a project.
    ListProjectMembers(ProjectId),
    /// `list_available_members` for a project and query.
    ListAvailableMembers(ProjectId, String),
    /// `create_project_member`.
    CreateProjectMember(CreateProjectMemberRequest),
    /// `remove_project_member` for a membership.
    RemoveProjectMember(ProjectMemberId, RemoveProjectMemberRequest),
    /// `modify_project_member` for a membership.
    ModifyProjectMember(ProjectMemberId, ModifyProjectMemberRequest),
}

/// Gateway double answering from scripted response queues.
#[derive(Default)]
pub struct ScriptedGateway {
    /// Replies to `list_projects`.
    pub projects: ResponseQueue<(), Vec<Project>>,
    /// Replies to `list_project_members`, keyed by project.
    pub members: ResponseQueue<ProjectId, Vec<ProjectMember>>,
    /// Replies to `list_available_members`, keyed by project and query.
    pub candidates: ResponseQueue<(ProjectId, String), Vec<AvailableMember>>,
    /// Replies to `create_project_member`.
    pub created: ResponseQueue<(), ProjectMember>,
    /// Replies to `remove_project_member`, keyed by membership.
    pub removed: ResponseQueue<ProjectMemberId, ()>,
    /// Replies to `modify_project_member`, keyed by membership.
    pub modified: ResponseQueue<ProjectMemberId, ()>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("calls mutex").clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("calls mutex").push(call);
    }
}

#[async_trait]
impl MembershipGateway for ScriptedGateway {
    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        self.record(GatewayCall::ListProjects);
        self.projects.next(()).await
    }

    async fn list_project_members(
        &self,
        project_id: ProjectId,
    ) -> GatewayResult<Vec<ProjectMember>> {
        self.record(GatewayCall::ListProjectMembers(project_id));
        self.members.next(project_id).await
    }

    async fn list_available_members(
        &self,
        project_id: ProjectId,
        query: &str,
    ) -> GatewayResult<Vec<AvailableMember>> {
        self.record(GatewayCall::ListAvailableMembers(project_id, query.to_owned()));
        self.candidates.next((project_id, query.to_owned())).await
    }

    async fn create_project_member(
        &self,
        request: &CreateProjectMemberRequest,
    ) -> GatewayResult<ProjectMember> {
        self.record(GatewayCall::CreateProjectMember(request.clone()));
        self.created.next(()).await
    }

    async fn remove_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &RemoveProjectMemberRequest,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::RemoveProjectMember(
            project_member_id,
            request.clone(),
        ));
        self.removed.next(project_member_id).await
    }

    async fn modify_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &ModifyProjectMemberRequest,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::ModifyProjectMember(
            project_member_id,
            request.clone(),
        ));
        self.modified.next(project_member_id).await
    }
}
