//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod membership_gateway;

#[cfg(test)]
pub use membership_gateway::MockMembershipGateway;
pub use membership_gateway::{
    CreateProjectMemberRequest, MembershipGateway, MembershipGatewayError,
    ModifyProjectMemberRequest, RemoveProjectMemberRequest,
};
