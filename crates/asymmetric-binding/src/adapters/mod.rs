//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits: token persistence, credential
//! decoration, assertion recording and fixed token sources.

mod assertion_log;
mod credentials;
mod static_sources;
mod token_store;

pub use assertion_log::{AssertionLog, UnsatisfiedAssertion};
pub use credentials::TokenStoreCredentialResolver;
pub use static_sources::{StaticIssuedTokenSource, StaticSupportingTokens};
pub use token_store::InMemoryTokenStore;
