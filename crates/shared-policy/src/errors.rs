//! # Error Types
//!
//! Structural errors of the policy model.

use crate::tokens::TokenSlot;
use thiserror::Error;

/// A binding that cannot be used as delivered by the policy layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Binding name carries no namespace to qualify assertions with.
    #[error("Binding name has no namespace")]
    MissingNamespace,

    /// A token wrapper was stored in a slot other than the one it declares.
    #[error("Token wrapper for {actual:?} stored in slot {expected:?}")]
    SlotMismatch {
        expected: TokenSlot,
        actual: TokenSlot,
    },

    /// Thumbprint references or signature confirmation on a WSS 1.0 assertion.
    #[error("WSS 1.1 option set on a Wss10 assertion")]
    Wss11OptionOnWss10,

    /// Trust 1.3 request options on a Trust 1.0 assertion.
    #[error("Trust 1.3 option set on a Trust10 assertion")]
    Trust13OptionOnTrust10,
}
