//! Algorithms module for the asymmetric binding planner
//!
//! Contains:
//! - Action sequencer (ordering rules, staged build)
//! - Token resolver (signature/encryption token fallback chains)
//! - SecureRegion catalog (part selectors to protected regions)
//! - Token directives (key identifiers, token inclusion)

pub mod action_sequencer;
pub mod region_catalog;
pub mod token_directives;
pub mod token_resolver;

pub use action_sequencer::ActionSequencer;
pub use region_catalog::RegionCatalog;
pub use token_directives::{include_token, key_identifier};
pub use token_resolver::TokenResolver;
