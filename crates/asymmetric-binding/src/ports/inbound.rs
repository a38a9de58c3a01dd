//! Inbound Ports (Driving Ports / API)

use super::outbound::{AssertionSink, CredentialResolver, CryptoEngine};
use crate::config::MessageContext;
use crate::domain::entities::{ProtectionPlan, SecuredEnvelope};
use crate::domain::errors::ProcessingFault;
use shared_policy::AsymmetricBinding;

/// Primary protection planning API
pub trait ProtectionPlanningApi: Send + Sync {
    /// Build the protection plan for one message.
    ///
    /// Runs the sign-before-encrypt or encrypt-before-sign protocol named by
    /// the binding and reports every satisfied assertion to `assertions`.
    /// Any failure aborts the whole plan.
    fn plan(
        &self,
        binding: &AsymmetricBinding,
        message: &MessageContext,
        assertions: &dyn AssertionSink,
    ) -> Result<ProtectionPlan, ProcessingFault>;

    /// Plan, then hand the plan to `engine`.
    ///
    /// When the plan relies on a stored issued token, `credentials` is
    /// decorated with token-store lookup for this call only.
    fn secure(
        &self,
        binding: &AsymmetricBinding,
        message: &MessageContext,
        assertions: &dyn AssertionSink,
        engine: &dyn CryptoEngine,
        credentials: &dyn CredentialResolver,
    ) -> Result<SecuredEnvelope, ProcessingFault>;
}
