//! Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the planner consults while building a plan, plus the
//! crypto engine that consumes it.

use crate::domain::entities::{
    Credential, ProtectionPlan, SecuredEnvelope, SecurityToken, SupportingToken,
};
use crate::domain::errors::{
    CryptoEngineError, IssuedTokenError, SupportingTokenError, TokenStoreError,
};
use shared_policy::{IssuedToken, QName, Role};

/// Records which policy assertions the plan satisfies.
///
/// Assertions are reported for later policy verification; the planner never
/// reads them back.
pub trait AssertionSink: Send + Sync {
    fn assert(&self, name: &QName);

    fn not_asserted(&self, name: &QName, reason: &str);
}

/// Runtime token persistence shared across messages.
///
/// At most one writer per identifier: the first store wins and later stores
/// for the same id report `Ok(false)`.
pub trait TokenStore: Send + Sync {
    fn store(&self, id: &str, token: SecurityToken) -> Result<bool, TokenStoreError>;

    fn lookup(&self, id: &str) -> Option<SecurityToken>;
}

/// Token issuance subsystem.
pub trait IssuedTokenSource: Send + Sync {
    /// Runtime token satisfying `policy`, or `None` if none was obtained.
    fn security_token(&self, policy: &IssuedToken)
        -> Result<Option<SecurityToken>, IssuedTokenError>;
}

/// Supporting-token layer (signed, endorsing and encrypted supporting tokens).
pub trait SupportingTokenProvider: Send + Sync {
    fn supporting_tokens(&self, role: Role) -> Result<Vec<SupportingToken>, SupportingTokenError>;
}

/// Ambient credential lookup (keystores, callback handlers).
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, id: &str) -> Option<Credential>;
}

/// Executes a finished plan: signing, encryption, canonicalization.
pub trait CryptoEngine: Send + Sync {
    fn execute(
        &self,
        plan: &ProtectionPlan,
        credentials: &dyn CredentialResolver,
    ) -> Result<SecuredEnvelope, CryptoEngineError>;
}
