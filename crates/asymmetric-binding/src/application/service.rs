//! Protection Planner Service
//!
//! Main service implementing ProtectionPlanningApi.

use super::plan_builder::{PlanBuilder, PlannerPorts};
use crate::adapters::{
    InMemoryTokenStore, StaticIssuedTokenSource, StaticSupportingTokens,
    TokenStoreCredentialResolver,
};
use crate::config::{MessageContext, PlannerConfig};
use crate::domain::entities::{ProtectionPlan, SecuredEnvelope};
use crate::domain::errors::{PlanningError, ProcessingFault};
use crate::domain::value_objects::{CredentialStrategy, PlanningStage};
use crate::ports::inbound::ProtectionPlanningApi;
use crate::ports::outbound::{
    AssertionSink, CredentialResolver, CryptoEngine, IssuedTokenSource, SupportingTokenProvider,
    TokenStore,
};
use shared_policy::{AsymmetricBinding, ProtectionOrder};
use std::sync::Arc;
use tracing::{info, warn};

/// Protection Planner
///
/// Orchestrates one planning pass per message:
/// 1. Validate the binding (optional)
/// 2. Assert the binding and run the protocol it names
/// 3. Report binding-level assertions
/// 4. Finalize the plan, or abort with a single fault
pub struct ProtectionPlanner {
    config: PlannerConfig,
    token_store: Arc<dyn TokenStore>,
    issued_tokens: Arc<dyn IssuedTokenSource>,
    supporting_tokens: Arc<dyn SupportingTokenProvider>,
}

impl ProtectionPlanner {
    /// Planner with default config, an in-memory token store and no
    /// issued or supporting tokens.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            config,
            token_store: Arc::new(InMemoryTokenStore::new()),
            issued_tokens: Arc::new(StaticIssuedTokenSource::empty()),
            supporting_tokens: Arc::new(StaticSupportingTokens::new()),
        }
    }

    pub fn with_token_store(mut self, token_store: Arc<dyn TokenStore>) -> Self {
        self.token_store = token_store;
        self
    }

    pub fn with_issued_tokens(mut self, issued_tokens: Arc<dyn IssuedTokenSource>) -> Self {
        self.issued_tokens = issued_tokens;
        self
    }

    pub fn with_supporting_tokens(
        mut self,
        supporting_tokens: Arc<dyn SupportingTokenProvider>,
    ) -> Self {
        self.supporting_tokens = supporting_tokens;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    fn ports(&self) -> PlannerPorts<'_> {
        PlannerPorts {
            token_store: self.token_store.as_ref(),
            issued_tokens: self.issued_tokens.as_ref(),
            supporting_tokens: self.supporting_tokens.as_ref(),
        }
    }
}

impl Default for ProtectionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtectionPlanningApi for ProtectionPlanner {
    fn plan(
        &self,
        binding: &AsymmetricBinding,
        message: &MessageContext,
        assertions: &dyn AssertionSink,
    ) -> Result<ProtectionPlan, ProcessingFault> {
        let order = binding.protection_order;

        if self.config.validate_binding {
            if let Err(err) = binding.validate() {
                let fault =
                    ProcessingFault::new(PlanningStage::Start, order, PlanningError::from(err));
                warn!(reason = %fault.reason, "Binding rejected");
                return Err(fault);
            }
        }

        let mut builder = PlanBuilder::new(&self.config, binding, message, assertions, self.ports());
        info!(
            correlation_id = %builder.correlation_id(),
            order = ?order,
            role = ?message.role,
            "Planning message protection"
        );

        assertions.assert(&binding.name);

        let outcome = match order {
            ProtectionOrder::SignBeforeEncrypting => builder.sign_before_encrypt(),
            ProtectionOrder::EncryptBeforeSigning => builder.encrypt_before_sign(),
        };

        if let Err(cause) = outcome {
            let correlation_id = builder.correlation_id();
            let stage = builder.abort();
            let fault = ProcessingFault::new(stage, order, cause);
            warn!(
                correlation_id = %correlation_id,
                stage = %stage,
                reason = %fault.reason,
                "Protection planning aborted"
            );
            return Err(fault);
        }

        builder.assert_binding_properties();
        Ok(builder.finalize())
    }

    fn secure(
        &self,
        binding: &AsymmetricBinding,
        message: &MessageContext,
        assertions: &dyn AssertionSink,
        engine: &dyn CryptoEngine,
        credentials: &dyn CredentialResolver,
    ) -> Result<SecuredEnvelope, ProcessingFault> {
        let plan = self.plan(binding, message, assertions)?;

        let outcome = match plan.credentials {
            CredentialStrategy::Configured => engine.execute(&plan, credentials),
            CredentialStrategy::TokenStoreBacked => {
                let decorated =
                    TokenStoreCredentialResolver::new(credentials, self.token_store.as_ref());
                engine.execute(&plan, &decorated)
            }
        };

        outcome.map_err(|err| {
            let fault = ProcessingFault::new(
                PlanningStage::Finalized,
                plan.order,
                PlanningError::from(err),
            );
            warn!(
                correlation_id = %plan.correlation_id,
                reason = %fault.reason,
                "Crypto engine rejected protection plan"
            );
            fault
        })
    }
}
