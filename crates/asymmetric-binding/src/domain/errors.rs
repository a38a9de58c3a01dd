//! Error types for protection planning
//!
//! Port errors convert into [`PlanningError`] at the boundary; the planner
//! wraps the first failure into a single [`ProcessingFault`].

use super::value_objects::PlanningStage;
use shared_policy::{PolicyError, ProtectionOrder};
use thiserror::Error;

/// Underlying port or policy failure carried by a [`PlanningError`].
pub type PlanningCause = Box<dyn std::error::Error + Send + Sync>;

/// Why a plan could not be produced.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// A required token or assertion could not be satisfied.
    #[error("Policy violation: {reason}")]
    PolicyViolation {
        reason: String,
        #[source]
        cause: Option<PlanningCause>,
    },

    /// The issuance source or token store could not provide the token.
    #[error("Token resolution failed: {reason}")]
    TokenResolutionFailure {
        reason: String,
        #[source]
        cause: Option<PlanningCause>,
    },

    /// Binding or policy combination that cannot be realised safely.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        reason: String,
        #[source]
        cause: Option<PlanningCause>,
    },

    /// The crypto engine rejected the finished plan.
    #[error("Crypto engine failure: {0}")]
    UnderlyingCryptoFailure(#[from] CryptoEngineError),
}

impl PlanningError {
    pub fn policy_violation(reason: impl Into<String>) -> Self {
        PlanningError::PolicyViolation {
            reason: reason.into(),
            cause: None,
        }
    }

    pub fn token_resolution(reason: impl Into<String>) -> Self {
        PlanningError::TokenResolutionFailure {
            reason: reason.into(),
            cause: None,
        }
    }

    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        PlanningError::InvalidConfiguration {
            reason: reason.into(),
            cause: None,
        }
    }

    /// Attach the failure that triggered this error.
    pub fn caused_by(mut self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            PlanningError::PolicyViolation { cause, .. }
            | PlanningError::TokenResolutionFailure { cause, .. }
            | PlanningError::InvalidConfiguration { cause, .. } => {
                *cause = Some(Box::new(err));
            }
            PlanningError::UnderlyingCryptoFailure(_) => {}
        }
        self
    }
}

impl From<PolicyError> for PlanningError {
    fn from(err: PolicyError) -> Self {
        PlanningError::invalid_configuration(err.to_string()).caused_by(err)
    }
}

impl From<TokenStoreError> for PlanningError {
    fn from(err: TokenStoreError) -> Self {
        PlanningError::token_resolution(err.to_string()).caused_by(err)
    }
}

impl From<IssuedTokenError> for PlanningError {
    fn from(err: IssuedTokenError) -> Self {
        PlanningError::token_resolution(err.to_string()).caused_by(err)
    }
}

impl From<SupportingTokenError> for PlanningError {
    fn from(err: SupportingTokenError) -> Self {
        PlanningError::policy_violation(err.to_string()).caused_by(err)
    }
}

/// The single error surfaced to callers of the planner.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct ProcessingFault {
    /// Stage that was active when the failure occurred.
    pub stage: PlanningStage,
    pub reason: String,
    #[source]
    pub cause: PlanningError,
}

impl ProcessingFault {
    pub fn new(stage: PlanningStage, order: ProtectionOrder, cause: PlanningError) -> Self {
        let prefix = match order {
            ProtectionOrder::SignBeforeEncrypting => "Sign before encryption failed",
            ProtectionOrder::EncryptBeforeSigning => "Encrypt before signing failed",
        };
        Self {
            stage,
            reason: format!("{} due to: {}", prefix, cause),
            cause,
        }
    }

    pub fn cause(&self) -> &PlanningError {
        &self.cause
    }
}

/// Token store errors
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid token identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Issued token acquisition errors
#[derive(Debug, Error)]
pub enum IssuedTokenError {
    #[error("Issuer unreachable: {0}")]
    IssuerUnreachable(String),

    #[error("Token request rejected: {0}")]
    Rejected(String),
}

/// Supporting token errors
#[derive(Debug, Error)]
pub enum SupportingTokenError {
    #[error("Supporting token {0} could not be satisfied")]
    Unsatisfied(String),
}

/// Crypto engine errors
#[derive(Debug, Error)]
pub enum CryptoEngineError {
    #[error("No credential for {0}")]
    MissingCredential(String),

    #[error("Engine failure: {0}")]
    Failed(String),
}
