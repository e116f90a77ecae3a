//! HTTP outbound adapter.
//!
//! This module provides a thin reqwest implementation of the
//! `MembershipGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{GatewayBuildError, HttpMembershipGateway};
