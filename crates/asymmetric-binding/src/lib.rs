//! # Asymmetric Binding Protection Planner
//!
//! Turns a WS-SecurityPolicy asymmetric binding into an ordered plan of
//! cryptographic actions and protected regions for one message. Signing,
//! encryption and canonicalization themselves happen in the crypto engine
//! behind the [`CryptoEngine`] port.
//!
//! ## Architecture
//!
//! - **Domain**: Plan entities (ProtectedRegion, CryptoAction, ActionList, ProtectionPlan), errors, invariants
//! - **Algorithms**: Action sequencer, token resolver, SecureRegion catalog, token directives
//! - **Ports**: Inbound (ProtectionPlanningApi) and Outbound (AssertionSink, TokenStore, IssuedTokenSource, SupportingTokenProvider, CredentialResolver, CryptoEngine)
//! - **Adapters**: In-memory token store, token-store credential decorator, assertion log, static token sources
//! - **Application**: Planner service and the sign-before-encrypt / encrypt-before-sign protocols
//!
//! ## Planning Flow
//!
//! ```text
//! binding + message ──→ TokenResolver ──→ RegionCatalog ──→ ActionSequencer
//!                                                                │
//!                       CryptoEngine ←── ProtectionPlan ←── finalize
//! ```
//!
//! Any failure aborts the pass with a single [`ProcessingFault`]; no partial
//! plan reaches the engine.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{
    AssertionLog, InMemoryTokenStore, StaticIssuedTokenSource, StaticSupportingTokens,
    TokenStoreCredentialResolver, UnsatisfiedAssertion,
};
pub use application::ProtectionPlanner;
pub use config::{MessageContext, PlannerConfig, SecurityProperties, USE_REQ_SIG_CERT};
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::value_objects::*;
pub use ports::inbound::ProtectionPlanningApi;
pub use ports::outbound::{
    AssertionSink, CredentialResolver, CryptoEngine, IssuedTokenSource, SupportingTokenProvider,
    TokenStore,
};
