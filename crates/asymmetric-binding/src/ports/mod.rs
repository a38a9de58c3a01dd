//! Ports module for the asymmetric binding planner
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::ProtectionPlanningApi;
pub use outbound::{
    AssertionSink, CredentialResolver, CryptoEngine, IssuedTokenSource, SupportingTokenProvider,
    TokenStore,
};
