//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest-backed gateway to the remote membership service.
//!
//! Adapters translate between domain types and wire representations and
//! contain no business logic.

pub mod http;
