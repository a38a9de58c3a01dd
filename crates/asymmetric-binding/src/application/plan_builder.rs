//! Per-message plan builder
//!
//! Holds the mutable state of one planning pass: the staged actions, the
//! region lists and the directives for the crypto engine. The two protocol
//! variants in [`super::protocols`] drive it through its stages; everything
//! here is shared by both.

use crate::algorithms::token_directives::{
    is_secure_conversation_family, signs_binary_security_token,
};
use crate::algorithms::{
    include_token, key_identifier, ActionSequencer, RegionCatalog, TokenResolver,
};
use crate::config::{MessageContext, PlannerConfig, SecurityProperties, USE_REQ_SIG_CERT};
use crate::domain::entities::{
    AlgorithmSelection, CryptoAction, EncryptionUser, IncludeTokenDecisions,
    KeyIdentifierChoices, ProtectedRegion, ProtectionPlan,
};
use crate::domain::errors::PlanningError;
use crate::domain::invariants;
use crate::domain::value_objects::{
    CredentialStrategy, Granularity, KeyDerivation, PlanningStage,
};
use crate::ports::outbound::{
    AssertionSink, IssuedTokenSource, SupportingTokenProvider, TokenStore,
};
use shared_policy::names::{self, assertions};
use shared_policy::{
    AlgorithmSuite, AsymmetricBinding, IssuedToken, ProtectionOrder, QName, Role, SamlToken,
    Token, TokenKind, TokenWrapper,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Outbound collaborators consulted while planning.
#[derive(Clone, Copy)]
pub(crate) struct PlannerPorts<'a> {
    pub token_store: &'a dyn TokenStore,
    pub issued_tokens: &'a dyn IssuedTokenSource,
    pub supporting_tokens: &'a dyn SupportingTokenProvider,
}

pub(crate) struct PlanBuilder<'a> {
    pub(super) binding: &'a AsymmetricBinding,
    pub(super) message: &'a MessageContext,
    pub(super) resolver: TokenResolver<'a>,
    pub(super) catalog: RegionCatalog<'a>,
    sink: &'a dyn AssertionSink,
    ports: PlannerPorts<'a>,
    properties: SecurityProperties,
    suite: AlgorithmSuite,
    correlation_id: Uuid,
    stage: PlanningStage,
    sequencer: ActionSequencer,

    signed_regions: Vec<ProtectedRegion>,
    encrypted_regions: Vec<ProtectedRegion>,
    /// Regions of signed supporting tokens, signed only if a signature exists.
    supporting_signed_regions: Vec<ProtectedRegion>,
    /// Regions of encrypted supporting tokens awaiting the encryption step.
    pub(super) encrypted_token_regions: Vec<ProtectedRegion>,

    /// Token of the primary signature, once queued.
    signing_token: Option<&'a Token>,
    /// Assertion element of an initiator SAML token that signs the message.
    signed_saml_assertion: Option<QName>,
    signature_confirmation_added: bool,
    signature_folded_into_saml: bool,

    key_identifiers: KeyIdentifierChoices,
    include_tokens: IncludeTokenDecisions,
    algorithms: AlgorithmSelection,
    signature_user: Option<String>,
    encryption_user: EncryptionUser,
    signature_token_id: Option<String>,
    credentials: CredentialStrategy,
}

impl<'a> PlanBuilder<'a> {
    pub(crate) fn new(
        config: &PlannerConfig,
        binding: &'a AsymmetricBinding,
        message: &'a MessageContext,
        sink: &'a dyn AssertionSink,
        ports: PlannerPorts<'a>,
    ) -> Self {
        let properties = message.properties.overlay(&config.properties);

        let mut suite = binding.algorithm_suite.clone();
        if let Some(algorithm) = &properties.asymmetric_signature_algorithm {
            suite.asymmetric_signature = algorithm.clone();
        }

        let soap_version = message.soap_version.unwrap_or(config.soap_version);

        Self {
            binding,
            message,
            resolver: TokenResolver::new(binding, sink),
            catalog: RegionCatalog::new(binding, soap_version, sink),
            sink,
            ports,
            properties,
            suite,
            correlation_id: Uuid::new_v4(),
            stage: PlanningStage::Start,
            sequencer: ActionSequencer::new(),
            signed_regions: Vec::new(),
            encrypted_regions: Vec::new(),
            supporting_signed_regions: Vec::new(),
            encrypted_token_regions: Vec::new(),
            signing_token: None,
            signed_saml_assertion: None,
            signature_confirmation_added: false,
            signature_folded_into_saml: false,
            key_identifiers: KeyIdentifierChoices::default(),
            include_tokens: IncludeTokenDecisions::default(),
            algorithms: AlgorithmSelection::default(),
            signature_user: None,
            encryption_user: EncryptionUser::default(),
            signature_token_id: None,
            credentials: CredentialStrategy::Configured,
        }
    }

    // =========================================================================
    // STAGES
    // =========================================================================

    pub(crate) fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub(super) fn role(&self) -> Role {
        self.message.role
    }

    pub(super) fn advance(&mut self, stage: PlanningStage) {
        debug!(
            correlation_id = %self.correlation_id,
            from = %self.stage,
            to = %stage,
            "Planning stage"
        );
        self.stage = stage;
    }

    /// Mark the pass aborted, returning the stage that was active.
    pub(crate) fn abort(&mut self) -> PlanningStage {
        let failed_at = self.stage;
        self.stage = PlanningStage::Aborted;
        failed_at
    }

    // =========================================================================
    // TOKEN EMBEDDING
    // =========================================================================

    /// Issued and SAML initiator tokens must be in place before any
    /// signature is queued.
    pub(super) fn embed_initiator_token(
        &mut self,
        wrapper: &'a TokenWrapper,
    ) -> Result<(), PlanningError> {
        match &wrapper.token.kind {
            TokenKind::Issued(issued) => self.embed_issued_token(&wrapper.token, issued),
            TokenKind::Saml(saml) => self.embed_saml_token(&wrapper.token, saml),
            TokenKind::X509(_)
            | TokenKind::SecurityContext
            | TokenKind::SecureConversation
            | TokenKind::SpnegoContext
            | TokenKind::Kerberos
            | TokenKind::KeyValue
            | TokenKind::Username => Ok(()),
        }
    }

    fn embed_issued_token(
        &mut self,
        token: &Token,
        policy: &IssuedToken,
    ) -> Result<(), PlanningError> {
        let issued = self
            .ports
            .issued_tokens
            .security_token(policy)?
            .ok_or_else(|| {
                PlanningError::token_resolution(format!(
                    "No issued token available for {}",
                    token.assertion_name(self.binding.namespace())
                ))
            })?;

        if token.inclusion.is_required_for(self.role()) && issued.saml_assertion.is_some() {
            self.sequencer.add(CryptoAction::CustomToken);
        }

        let id = issued.id.clone();
        if !self.ports.token_store.store(&id, issued)? {
            debug!(correlation_id = %self.correlation_id, token_id = %id, "Issued token already in store");
        }

        self.signature_token_id = Some(id);
        self.credentials = CredentialStrategy::TokenStoreBacked;
        Ok(())
    }

    /// The SAML token assertion is reported here rather than by the
    /// resolver: it holds only once the assertion can actually be produced.
    fn embed_saml_token(&mut self, token: &Token, saml: &SamlToken) -> Result<(), PlanningError> {
        let name = token.assertion_name(self.binding.namespace());
        if !token.inclusion.is_required_for(self.role()) {
            self.sink.assert(&name);
            return Ok(());
        }

        if !self.properties.has_saml_callback() {
            self.sink
                .not_asserted(&name, "No SAML CallbackHandler available");
            return Err(PlanningError::policy_violation(format!(
                "No SAML callback configured for {}",
                name
            )));
        }

        self.sequencer.add(CryptoAction::SamlTokenSigned);
        self.signed_saml_assertion = Some(saml.version.assertion_name());
        self.sink.assert(&name);
        Ok(())
    }

    // =========================================================================
    // SIGNATURE
    // =========================================================================

    /// Queue the primary signature over `regions`. No regions, no signature.
    pub(super) fn do_signature(&mut self, wrapper: &'a TokenWrapper, regions: Vec<ProtectedRegion>) {
        if regions.is_empty() {
            debug!(correlation_id = %self.correlation_id, "No signed regions, signature skipped");
            return;
        }

        let token = &wrapper.token;
        let derivation = KeyDerivation::for_token(token);
        self.sequencer.insert_signature(derivation);
        self.signed_regions.extend(regions);
        self.signing_token = Some(token);

        let identifier = key_identifier(token, self.binding.wss.as_ref());
        self.key_identifiers.signature = Some(identifier);
        self.include_tokens.signature = include_token(token, identifier, self.role());

        if self.binding.protect_tokens && signs_binary_security_token(token) {
            let bst = ProtectedRegion::element(names::binary_security_token());
            if !self.signed_regions.contains(&bst) {
                self.signed_regions.push(bst);
            }
        }

        self.algorithms.signature = Some(if derivation.is_derived() {
            self.suite.symmetric_signature.clone()
        } else {
            self.suite.asymmetric_signature.clone()
        });
        self.algorithms.digest = Some(self.suite.digest.clone());
        self.algorithms.c14n = Some(self.suite.c14n.clone());
        self.signature_user = self.properties.signature_user();
    }

    /// Whether a primary signature has been queued (or absorbed by a signed
    /// SAML assertion).
    pub(super) fn signature_planned(&self) -> bool {
        self.signing_token.is_some()
    }

    /// Responder-side signature confirmation, WSS 1.1 only.
    pub(super) fn add_signature_confirmation(&mut self, regions: &mut Vec<ProtectedRegion>) {
        let required = self
            .binding
            .wss
            .is_some_and(|wss| wss.requires_signature_confirmation());
        if !required {
            return;
        }

        self.sequencer.add(CryptoAction::SignatureConfirmation);
        regions.push(ProtectedRegion::element(names::signature_confirmation()));
        self.signature_confirmation_added = true;
    }

    /// A signing SAML assertion signs the message itself: the primary
    /// signature is dropped and the signed SAML action takes its slot.
    /// Supporting-token signatures are left alone.
    pub(super) fn remove_signature_if_signed_saml(&mut self) {
        let signs_with_saml = self
            .signing_token
            .is_some_and(|token| matches!(token.kind, TokenKind::Saml(_)));
        if !signs_with_saml || self.signed_saml_assertion.is_none() {
            return;
        }

        if self
            .sequencer
            .fold_primary_signature_into(CryptoAction::SamlTokenSigned)
        {
            debug!(correlation_id = %self.correlation_id, "Signature folded into signed SAML assertion");
            self.signature_folded_into_saml = true;
        }
    }

    /// Secure-conversation-family signing tokens carry their confirmation
    /// directly after the primary signature.
    pub(super) fn reposition_signature_confirmation(&mut self) {
        let secure_conversation = self
            .signing_token
            .is_some_and(|token| is_secure_conversation_family(&token.kind));
        if !secure_conversation || !self.signature_confirmation_added {
            return;
        }

        self.sequencer
            .move_after_last(CryptoAction::SignatureConfirmation, CryptoAction::is_signature);
    }

    /// Encrypt-before-sign with a signed SAML assertion: the assertion is
    /// produced after encryption, so it cannot sign anything that was
    /// encrypted as a whole element.
    pub(super) fn enforce_signed_saml_after_encryption(&mut self) -> Result<(), PlanningError> {
        let Some(assertion) = self.signed_saml_assertion.clone() else {
            return Ok(());
        };
        self.sequencer
            .move_after_last(CryptoAction::SamlTokenSigned, CryptoAction::is_encrypt);

        if !self.signature_folded_into_saml {
            return Ok(());
        }

        if self
            .encrypted_regions
            .iter()
            .any(|region| region.is_element(&assertion))
        {
            return Err(PlanningError::invalid_configuration(format!(
                "Signed SAML assertion {} cannot be encrypted before it signs the message",
                assertion
            )));
        }

        let conflict = self.signed_regions.iter().find(|signed| {
            signed.granularity == Granularity::Element
                && self.encrypted_regions.iter().any(|encrypted| {
                    encrypted.granularity == Granularity::Element
                        && encrypted.target == signed.target
                })
        });
        match conflict {
            Some(region) => Err(PlanningError::invalid_configuration(format!(
                "Signed SAML assertion cannot sign {} after it is encrypted",
                region
            ))),
            None => Ok(()),
        }
    }

    // =========================================================================
    // ENCRYPTION
    // =========================================================================

    /// `ds:Signature` (and any signature confirmation) joins the encrypted
    /// regions when the binding encrypts the signature.
    pub(super) fn protect_signature(
        &self,
        regions: &mut Vec<ProtectedRegion>,
        signature_expected: bool,
    ) {
        if signature_expected {
            regions.push(ProtectedRegion::element(names::signature()));
            if self.signature_confirmation_added {
                regions.push(ProtectedRegion::element(names::signature_confirmation()));
            }
        }
        self.sink
            .assert(&self.binding.assertion(assertions::ENCRYPT_SIGNATURE));
    }

    /// Queue encryption of `regions` for `wrapper`. No token or no regions,
    /// no encryption.
    pub(super) fn do_encryption(
        &mut self,
        wrapper: Option<&'a TokenWrapper>,
        regions: Vec<ProtectedRegion>,
    ) {
        let Some(wrapper) = wrapper else {
            debug!(correlation_id = %self.correlation_id, "No encryption token, encryption skipped");
            return;
        };
        if regions.is_empty() {
            debug!(correlation_id = %self.correlation_id, "No encrypted regions, encryption skipped");
            return;
        }

        let token = &wrapper.token;
        self.sequencer.add_encrypt(KeyDerivation::for_token(token));
        self.encrypted_regions.extend(regions);

        let identifier = key_identifier(token, self.binding.wss.as_ref());
        self.key_identifiers.encryption = Some(identifier);
        self.include_tokens.encryption = include_token(token, identifier, self.role());
        self.algorithms.key_wrap = Some(self.suite.asymmetric_key_wrap.clone());
        self.algorithms.encryption = Some(self.suite.encryption.clone());

        if let Some(user) = self.properties.encryption_user() {
            if user == USE_REQ_SIG_CERT {
                self.encryption_user.use_req_sig_cert = true;
            }
            self.encryption_user.user = Some(user);
        }

        if !self.role().is_requestor() && matches!(token.kind, TokenKind::Issued(_)) {
            self.encryption_user.use_req_sig_cert = true;
        }
    }

    // =========================================================================
    // SUPPORTING TOKENS
    // =========================================================================

    pub(super) fn attach_supporting_tokens(&mut self) -> Result<(), PlanningError> {
        let tokens = self.ports.supporting_tokens.supporting_tokens(self.role())?;

        for token in tokens {
            self.sink.assert(&token.assertion);
            self.sequencer.add(token.action);

            if let Some(region) = token.region {
                if token.signed {
                    self.supporting_signed_regions.push(region.clone());
                }
                if token.encrypted {
                    self.encrypted_token_regions.push(region);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // FINISH
    // =========================================================================

    /// Binding-level assertions reported once the protocol has succeeded.
    pub(crate) fn assert_binding_properties(&self) {
        let binding = self.binding;
        let sink = self.sink;

        sink.assert(&binding.assertion(binding.protection_order.assertion_local_name()));
        sink.assert(&binding.assertion(assertions::ALGORITHM_SUITE));
        sink.assert(&binding.assertion(assertions::LAYOUT));
        sink.assert(&binding.assertion(assertions::ONLY_SIGN_ENTIRE_HEADERS_AND_BODY));

        if let Some(wss) = &binding.wss {
            let version = if wss.wss11 {
                assertions::WSS11
            } else {
                assertions::WSS10
            };
            sink.assert(&binding.assertion(version));
            self.assert_options(&[
                (
                    wss.must_support_ref_key_identifier,
                    assertions::MUST_SUPPORT_REF_KEY_IDENTIFIER,
                ),
                (
                    wss.must_support_ref_issuer_serial,
                    assertions::MUST_SUPPORT_REF_ISSUER_SERIAL,
                ),
                (
                    wss.must_support_ref_thumbprint,
                    assertions::MUST_SUPPORT_REF_THUMBPRINT,
                ),
                (
                    wss.require_signature_confirmation,
                    assertions::REQUIRE_SIGNATURE_CONFIRMATION,
                ),
            ]);
        }

        if let Some(trust) = &binding.trust {
            let version = if trust.trust13 {
                assertions::TRUST13
            } else {
                assertions::TRUST10
            };
            sink.assert(&binding.assertion(version));
            self.assert_options(&[
                (
                    trust.must_support_client_challenge,
                    assertions::MUST_SUPPORT_CLIENT_CHALLENGE,
                ),
                (
                    trust.must_support_server_challenge,
                    assertions::MUST_SUPPORT_SERVER_CHALLENGE,
                ),
                (trust.require_client_entropy, assertions::REQUIRE_CLIENT_ENTROPY),
                (trust.require_server_entropy, assertions::REQUIRE_SERVER_ENTROPY),
                (
                    trust.must_support_issued_tokens,
                    assertions::MUST_SUPPORT_ISSUED_TOKENS,
                ),
                (
                    trust.require_request_security_token_collection,
                    assertions::REQUIRE_REQUEST_SECURITY_TOKEN_COLLECTION,
                ),
                (trust.require_applies_to, assertions::REQUIRE_APPLIES_TO),
                (trust.scope_policy_15, assertions::SCOPE_POLICY_15),
                (
                    trust.must_support_interactive_challenge,
                    assertions::MUST_SUPPORT_INTERACTIVE_CHALLENGE,
                ),
            ]);
        }

        if binding.include_timestamp {
            let name = binding.assertion(assertions::INCLUDE_TIMESTAMP);
            if self.message.timestamp_added {
                sink.assert(&name);
            } else {
                sink.not_asserted(&name, "No timestamp was added to the message");
            }
        }

        if binding.protect_tokens {
            sink.assert(&binding.assertion(assertions::PROTECT_TOKENS));
        }
    }

    /// Assert the binding-namespace assertion of every option that is set.
    fn assert_options(&self, options: &[(bool, &str)]) {
        for (set, local) in options {
            if *set {
                self.sink.assert(&self.binding.assertion(local));
            }
        }
    }

    /// Freeze the staged state into the plan handed to the crypto engine.
    pub(crate) fn finalize(mut self) -> ProtectionPlan {
        if self.signature_planned() {
            self.signed_regions
                .append(&mut self.supporting_signed_regions);
        }
        self.advance(PlanningStage::Finalized);

        let plan = ProtectionPlan {
            correlation_id: self.correlation_id,
            order: self.binding.protection_order,
            role: self.message.role,
            actions: self.sequencer.finalize_custom_token_ordering(),
            signed_regions: self.signed_regions,
            encrypted_regions: self.encrypted_regions,
            key_identifiers: self.key_identifiers,
            include_tokens: self.include_tokens,
            algorithms: self.algorithms,
            signature_user: self.signature_user,
            encryption_user: self.encryption_user,
            signature_token_id: self.signature_token_id,
            credentials: self.credentials,
        };

        debug_assert!(invariants::invariant_custom_token_last(plan.actions.as_slice()));
        debug_assert!(invariants::invariant_signature_before_kerberos(
            plan.actions.as_slice()
        ));
        debug_assert!(invariants::invariant_regions_have_actions(&plan));
        debug_assert!(
            plan.order == ProtectionOrder::EncryptBeforeSigning
                || invariants::invariant_encrypt_after_signatures(plan.actions.as_slice())
        );

        info!(
            correlation_id = %plan.correlation_id,
            order = ?plan.order,
            role = ?plan.role,
            actions = plan.actions.len(),
            signed_regions = plan.signed_regions.len(),
            encrypted_regions = plan.encrypted_regions.len(),
            "Protection plan finalized"
        );

        plan
    }
}
