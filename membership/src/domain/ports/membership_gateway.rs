//! Driven port for the remote membership service.
//!
//! The domain owns the request shapes and response contract so the action
//! service stays adapter-agnostic. Adapters map transport failures into
//! [`MembershipGatewayError`] and never leak their own error types.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AvailableMember, EmployeeId, Project, ProjectId, ProjectMember, ProjectMemberId, Role,
};

/// Request to add an employee to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectMemberRequest {
    /// Employee joining the project.
    pub employee_id: EmployeeId,
    /// Project being joined.
    pub project_id: ProjectId,
    /// Role granted on joining.
    pub role: Role,
}

/// Request to remove a member from a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveProjectMemberRequest {
    /// Project the member belongs to.
    pub project_id: ProjectId,
    /// Audit reason recorded in the membership history.
    pub reason: String,
}

/// Request to change a member's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyProjectMemberRequest {
    /// Project the member belongs to.
    pub project_id: ProjectId,
    /// Role to assign.
    pub role: Role,
}

define_port_error! {
    /// Errors surfaced while calling the membership service.
    pub enum MembershipGatewayError {
        /// Network transport failed before a response arrived.
        Transport {
            /// Transport failure description.
            message: String,
        } => "membership service transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout {
            /// Which deadline expired.
            message: String,
        } => "membership service timed out: {message}",
        /// The service answered with a non-success status.
        Status {
            /// HTTP status code.
            status: u16,
            /// Body preview or the status reason phrase.
            message: String,
        } => "membership service returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Decoder error and a body preview.
            message: String,
        } => "membership service response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest {
            /// Why the request was rejected.
            message: String,
        } => "membership service request invalid: {message}",
    }
}

/// Port for reading and changing project membership on the remote service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipGateway: Send + Sync {
    /// List every project visible to the caller.
    async fn list_projects(&self) -> Result<Vec<Project>, MembershipGatewayError>;

    /// List the members of one project, tombstones included.
    async fn list_project_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectMember>, MembershipGatewayError>;

    /// List employees who could join `project_id`, narrowed by `query`.
    ///
    /// An empty query returns the whole candidate pool.
    async fn list_available_members(
        &self,
        project_id: ProjectId,
        query: &str,
    ) -> Result<Vec<AvailableMember>, MembershipGatewayError>;

    /// Add a member and return the canonical record with its assigned id.
    async fn create_project_member(
        &self,
        request: &CreateProjectMemberRequest,
    ) -> Result<ProjectMember, MembershipGatewayError>;

    /// Remove a member, recording the audit reason.
    async fn remove_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &RemoveProjectMemberRequest,
    ) -> Result<(), MembershipGatewayError>;

    /// Change a member's role.
    async fn modify_project_member(
        &self,
        project_member_id: ProjectMemberId,
        request: &ModifyProjectMemberRequest,
    ) -> Result<(), MembershipGatewayError>;
}
