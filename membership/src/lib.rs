//! Project membership store.
//!
//! Keeps a client-side view of projects, their members and the candidates that
//! could join them, synchronised with the remote membership service. The crate
//! is laid out as a small hexagon:
//!
//! - [`domain`] owns the state container, its named mutations, the derived
//!   views and the action service that sequences remote calls.
//! - [`domain::ports`] declares the gateway the actions talk through.
//! - [`outbound`] implements that gateway over HTTP.
//! - [`config`] loads gateway settings through OrthoConfig.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::GatewaySettings;
pub use domain::{MembershipStore, ProjectMembershipService};
