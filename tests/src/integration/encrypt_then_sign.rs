//! Encrypt-before-signing scenarios.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use asymmetric_binding::{
        AssertionLog, CryptoAction, MessageContext, PlannerConfig, PlanningError, PlanningStage,
        ProtectedRegion, ProtectionPlanner, ProtectionPlanningApi, SecurityProperties,
        SoapVersion,
    };
    use shared_policy::names::{self, assertions};
    use shared_policy::{
        AsymmetricBinding, ElementPath, PartSelectors, ProtectionOrder, QName, SamlVersion,
        Token, TokenKind, TokenSlot, TokenWrapper,
    };

    fn body() -> QName {
        SoapVersion::Soap11.body()
    }

    fn saml_binding(parts: PartSelectors) -> AsymmetricBinding {
        binding_with_tokens(
            ProtectionOrder::EncryptBeforeSigning,
            Token::saml(SamlVersion::V20),
            Token::x509(),
        )
        .with_parts(parts)
    }

    fn saml_planner() -> ProtectionPlanner {
        ProtectionPlanner::with_config(PlannerConfig {
            properties: SecurityProperties {
                saml_callback_configured: Some(true),
                ..SecurityProperties::default()
            },
            ..PlannerConfig::default()
        })
    }

    // =========================================================================
    // BASIC ORDERING
    // =========================================================================

    /// Test requestor encrypts body content, then signs body and timestamp
    #[test]
    fn test_requestor_encrypts_then_signs() {
        init_tracing();
        let binding = x509_binding(ProtectionOrder::EncryptBeforeSigning);
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor().with_timestamp(), &log)
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[CryptoAction::Encrypt, CryptoAction::Signature]
        );
        assert_eq!(
            plan.signed_regions,
            vec![
                ProtectedRegion::element(body()),
                ProtectedRegion::element(names::timestamp()),
            ]
        );
        assert_eq!(plan.encrypted_regions, vec![ProtectedRegion::content(body())]);
        assert!(log.is_asserted(&binding.assertion(assertions::ENCRYPT_BEFORE_SIGNING)));
    }

    /// Test signed regions are the catalog's, captured before encryption
    #[test]
    fn test_signed_regions_captured_before_encryption() {
        let binding =
            x509_binding(ProtectionOrder::EncryptBeforeSigning).with_parts(header_parts());

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.signed_regions,
            vec![
                ProtectedRegion::element(body()),
                ProtectedRegion::element(to_header()).optional(),
            ]
        );
        assert_eq!(
            plan.encrypted_regions,
            vec![
                ProtectedRegion::content(body()),
                ProtectedRegion::element(to_header()),
            ]
        );
    }

    /// Test without an encryption token only the signature is planned
    #[test]
    fn test_missing_encryption_token_skips_encryption() {
        let binding = AsymmetricBinding::new(ProtectionOrder::EncryptBeforeSigning)
            .with_parts(PartSelectors::body_only())
            .with_token(TokenWrapper::new(TokenSlot::InitiatorToken, Token::x509()));

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(plan.actions.as_slice(), &[CryptoAction::Signature]);
        assert!(plan.encrypted_regions.is_empty());
        assert_eq!(plan.key_identifiers.encryption, None);
    }

    // =========================================================================
    // ENCRYPT SIGNATURE
    // =========================================================================

    /// Test the expected signature is encrypted
    #[test]
    fn test_encrypt_signature_adds_signature_region() {
        let binding = x509_binding(ProtectionOrder::EncryptBeforeSigning)
            .with_encrypt_signature(true);

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.encrypted_regions,
            vec![
                ProtectedRegion::content(body()),
                ProtectedRegion::element(names::signature()),
            ]
        );
    }

    /// Test no signature region without a signing token, assertion still reported
    #[test]
    fn test_encrypt_signature_without_signer() {
        let binding = AsymmetricBinding::new(ProtectionOrder::EncryptBeforeSigning)
            .with_parts(PartSelectors::body_only())
            .with_token(TokenWrapper::new(TokenSlot::RecipientToken, Token::x509()))
            .with_encrypt_signature(true);
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &log)
            .unwrap();

        assert_eq!(plan.actions.as_slice(), &[CryptoAction::Encrypt]);
        assert_eq!(plan.encrypted_regions, vec![ProtectedRegion::content(body())]);
        assert!(log.is_asserted(&binding.assertion(assertions::ENCRYPT_SIGNATURE)));
    }

    // =========================================================================
    // SIGNATURE CONFIRMATION
    // =========================================================================

    /// Test responder confirmation is queued before encryption for X.509 signers
    #[test]
    fn test_responder_confirmation_x509() {
        let binding = x509_binding(ProtectionOrder::EncryptBeforeSigning)
            .with_wss(wss11_with_confirmation());

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::SignatureConfirmation,
                CryptoAction::Encrypt,
                CryptoAction::Signature
            ]
        );
        assert_eq!(
            plan.signed_regions,
            vec![
                ProtectedRegion::element(body()),
                ProtectedRegion::element(names::signature_confirmation()),
            ]
        );
    }

    /// Test responder confirmation moves behind a security-context signature
    #[test]
    fn test_responder_confirmation_security_context() {
        let binding = binding_with_tokens(
            ProtectionOrder::EncryptBeforeSigning,
            Token::x509(),
            Token::new(TokenKind::SecurityContext),
        )
        .with_wss(wss11_with_confirmation());

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::Encrypt,
                CryptoAction::Signature,
                CryptoAction::SignatureConfirmation
            ]
        );
    }

    // =========================================================================
    // SIGNED SAML
    // =========================================================================

    /// Test the signed SAML assertion takes the signature's place after encryption
    #[test]
    fn test_signed_saml_follows_encryption() {
        init_tracing();

        let plan = saml_planner()
            .plan(
                &saml_binding(PartSelectors::body_only()),
                &MessageContext::requestor(),
                &AssertionLog::new(),
            )
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[CryptoAction::Encrypt, CryptoAction::SamlTokenSigned]
        );
        assert_eq!(plan.signed_regions, vec![ProtectedRegion::element(body())]);
    }

    /// Test a header both signed and encrypted as an element is rejected
    #[test]
    fn test_signed_saml_rejects_encrypted_signed_element() {
        let fault = saml_planner()
            .plan(
                &saml_binding(header_parts()),
                &MessageContext::requestor(),
                &AssertionLog::new(),
            )
            .unwrap_err();

        assert!(matches!(
            fault.cause(),
            PlanningError::InvalidConfiguration { .. }
        ));
        assert_eq!(fault.stage, PlanningStage::SignaturePhase);
        assert!(fault.reason.starts_with("Encrypt before signing failed"));
    }

    /// Test an encrypted signing assertion is rejected
    #[test]
    fn test_signed_saml_rejects_encrypted_assertion() {
        let parts = PartSelectors {
            encrypted_elements: Some(vec![ElementPath::new(vec![names::saml20_assertion()])]),
            ..PartSelectors::body_only()
        };

        let fault = saml_planner()
            .plan(&saml_binding(parts), &MessageContext::requestor(), &AssertionLog::new())
            .unwrap_err();

        assert!(matches!(
            fault.cause(),
            PlanningError::InvalidConfiguration { .. }
        ));
    }

    /// Test the per-message callback flag overrides the endpoint's
    #[test]
    fn test_message_properties_enable_saml_callback() {
        let message = MessageContext::requestor().with_properties(SecurityProperties {
            saml_callback_configured: Some(true),
            ..SecurityProperties::default()
        });

        let binding = saml_binding(PartSelectors::body_only());
        let log = AssertionLog::new();
        let plan = ProtectionPlanner::new()
            .plan(&binding, &message, &log)
            .unwrap();

        assert!(plan.actions.contains(CryptoAction::SamlTokenSigned));
        assert!(!plan.actions.has_signature());
        assert!(log.is_asserted(&binding.assertion("SamlToken")));
        assert!(log.unsatisfied().is_empty());
    }
}
