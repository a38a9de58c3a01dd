//! # Shared Policy Crate
//!
//! The read-only WS-SecurityPolicy model consumed by the binding planners.
//! Values here are produced by the policy layer (already parsed) and are
//! never mutated while a message is processed.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: token kinds, wrapper slots and binding flags
//!   are defined once and shared by every consumer.
//! - **Closed Token Set**: [`TokenKind`] is an enum; decisions over token kinds
//!   are exhaustive matches, never open dispatch.
//! - **Serializable**: every type round-trips through serde so bindings can be
//!   shipped as configuration fixtures.

pub mod binding;
pub mod errors;
pub mod names;
pub mod parts;
pub mod tokens;

pub use binding::*;
pub use errors::*;
pub use names::QName;
pub use parts::*;
pub use tokens::*;
