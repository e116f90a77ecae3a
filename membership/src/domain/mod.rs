//! Domain primitives, state container and actions.
//!
//! Purpose: define the strongly typed membership entities, the single state
//! container that holds them, and the service that keeps that container in
//! step with the remote membership service.
//!
//! Public surface:
//! - Error (alias to `error::DomainError`): domain failure reported to callers.
//! - ErrorCode: stable failure category.
//! - MembershipStore: state container plus derived views.
//! - ProjectMembershipService: asynchronous actions over the store.

pub mod error;
pub mod ids;
pub mod member;
pub mod membership_service;
pub mod ports;
pub mod project;
pub mod store;

pub use self::error::{DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::ids::{EmployeeId, ProjectId, ProjectMemberId};
pub use self::member::{AvailableMember, ProjectMember, Role, RoleValidationError};
pub use self::membership_service::{
    FetchOutcome, ModifyOutcome, ProjectMembershipService, SelectionOutcome,
};
pub use self::project::Project;
pub use self::store::{
    FetchChannel, FetchTicket, MemberRoster, MembershipState, MembershipStore, Mutation,
    SearchState,
};

/// Convenient result alias for membership actions.
///
/// # Examples
/// ```
/// use membership::domain::{Error, MembershipResult};
///
/// fn reject() -> MembershipResult<()> {
///     Err(Error::no_project_selected("pick a project first"))
/// }
/// assert!(reject().is_err());
/// ```
pub type MembershipResult<T> = Result<T, Error>;
