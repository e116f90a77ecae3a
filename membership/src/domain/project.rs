//! Project snapshots as listed by the membership service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProjectId;

/// Read-only project snapshot.
///
/// The store trusts the server for uniqueness; fields beyond `id` and `title`
/// are kept verbatim in `extra` so nothing the service sends is dropped.
///
/// # Examples
/// ```
/// use membership::domain::{Project, ProjectId};
///
/// let project: Project = serde_json::from_str(r#"{"id": 3, "title": "Atlas", "budget": 10}"#)?;
/// assert_eq!(project.id, ProjectId::new(3));
/// assert_eq!(project.extra["budget"], 10);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned project identifier.
    pub id: ProjectId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Remaining server fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
