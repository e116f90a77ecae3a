//! Project members, candidate members and the closed role enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{EmployeeId, ProjectMemberId};

/// Role a member holds within a project.
///
/// The set is closed: anything other than `PA`, `PL` or `PM` is rejected when
/// parsed, so an invalid role never reaches a mutating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Project administrator.
    Pa,
    /// Project lead.
    Pl,
    /// Project member.
    Pm,
}

impl Role {
    /// Every accepted role, in display order.
    pub const ALL: [Self; 3] = [Self::Pa, Self::Pl, Self::Pm];

    /// Wire representation of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pa => "PA",
            Self::Pl => "PL",
            Self::Pm => "PM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when role text is outside the accepted enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role {value:?}; expected one of PA, PL, PM")]
pub struct RoleValidationError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Role {
    type Err = RoleValidationError;

    /// Parse role text exactly as the service spells it.
    ///
    /// # Examples
    /// ```
    /// use membership::domain::Role;
    ///
    /// assert_eq!("PL".parse::<Role>()?, Role::Pl);
    /// assert!("pl".parse::<Role>().is_err());
    /// # Ok::<(), membership::domain::RoleValidationError>(())
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == raw)
            .ok_or_else(|| RoleValidationError {
                value: raw.to_owned(),
            })
    }
}

/// Membership row linking an employee to a project.
///
/// `is_deleted` is a local tombstone: a removed member stays in the roster,
/// addressable by id, until the next full member refetch replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Server-assigned membership identifier.
    pub project_member_id: ProjectMemberId,
    /// Employee holding the membership.
    pub employee_id: EmployeeId,
    /// Role held within the project.
    pub role: Role,
    /// Local soft-delete marker.
    #[serde(default)]
    pub is_deleted: bool,
    /// Display name, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// Remaining server fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Employee that could be added to the selected project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMember {
    /// Candidate employee.
    pub employee_id: EmployeeId,
    /// Display name, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// Soft-delete marker, honoured by the candidate view when present.
    #[serde(default)]
    pub is_deleted: bool,
    /// Remaining server fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    //! Role parsing and wire decoding.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("PA", Role::Pa)]
    #[case("PL", Role::Pl)]
    #[case("PM", Role::Pm)]
    fn parses_accepted_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    #[case::unknown("XX")]
    #[case::lowercase("pa")]
    #[case::padded(" PM")]
    #[case::empty("")]
    fn rejects_other_text(#[case] raw: &str) {
        let error = raw.parse::<Role>().expect_err("role must be rejected");
        assert_eq!(error.value, raw);
    }

    #[test]
    fn decodes_member_with_extra_fields() {
        let member: ProjectMember = serde_json::from_value(json!({
            "projectMemberId": 11,
            "employeeId": 4,
            "role": "PL",
            "employeeName": "Jae",
            "joinedAt": "2024-03-01"
        }))
        .expect("member decodes");

        assert_eq!(member.project_member_id, ProjectMemberId::new(11));
        assert_eq!(member.role, Role::Pl);
        assert!(!member.is_deleted, "tombstone defaults to false");
        assert_eq!(member.extra.get("joinedAt"), Some(&json!("2024-03-01")));
    }

    #[test]
    fn rejects_member_with_unknown_role() {
        let result = serde_json::from_value::<ProjectMember>(json!({
            "projectMemberId": 1,
            "employeeId": 2,
            "role": "CEO"
        }));
        assert!(result.is_err(), "unknown roles must not decode");
    }
}
