//! Wire DTOs for the membership service.
//!
//! Listing and creation responses wrap their payload in a named field; the
//! envelopes below unwrap it. Request bodies use the service's camelCase keys.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    CreateProjectMemberRequest, ModifyProjectMemberRequest, RemoveProjectMemberRequest,
};
use crate::domain::{AvailableMember, EmployeeId, ProjectId, ProjectMember, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectMembersEnvelope {
    pub(super) view_project_members_by_project: Vec<ProjectMember>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AvailableMembersEnvelope {
    pub(super) view_available_members: Vec<AvailableMember>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreatedMemberEnvelope {
    pub(super) create_project_member: ProjectMember,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateProjectMemberBody {
    employee_id: EmployeeId,
    project_id: ProjectId,
    role: Role,
}

impl From<&CreateProjectMemberRequest> for CreateProjectMemberBody {
    fn from(request: &CreateProjectMemberRequest) -> Self {
        Self {
            employee_id: request.employee_id,
            project_id: request.project_id,
            role: request.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RemoveProjectMemberBody<'a> {
    project_id: ProjectId,
    project_member_history_reason: &'a str,
}

impl<'a> From<&'a RemoveProjectMemberRequest> for RemoveProjectMemberBody<'a> {
    fn from(request: &'a RemoveProjectMemberRequest) -> Self {
        Self {
            project_id: request.project_id,
            project_member_history_reason: request.reason.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModifyProjectMemberBody {
    role: Role,
    project_id: ProjectId,
}

impl From<&ModifyProjectMemberRequest> for ModifyProjectMemberBody {
    fn from(request: &ModifyProjectMemberRequest) -> Self {
        Self {
            role: request.role,
            project_id: request.project_id,
        }
    }
}
