//! Sign-before-encrypting scenarios.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use asymmetric_binding::algorithms::RegionCatalog;
    use asymmetric_binding::{
        AssertionLog, CryptoAction, Granularity, KeyIdentifier, MessageContext, PlannerConfig,
        ProtectedRegion, ProtectionPlanner, ProtectionPlanningApi, SecurityProperties, SoapVersion,
        StaticSupportingTokens, SupportingToken, USE_REQ_SIG_CERT,
    };
    use shared_policy::names::{self, assertions, NS_SP12};
    use shared_policy::{
        algorithms, DerivedKeys, IncludeTokenType, PartSelectors, ProtectionOrder, QName, Role,
        SamlVersion, Token, TokenKind,
    };
    use std::sync::Arc;

    fn body() -> QName {
        SoapVersion::Soap11.body()
    }

    // =========================================================================
    // BASIC ORDERING
    // =========================================================================

    /// Test requestor signs timestamp and body, then encrypts body content
    #[test]
    fn test_requestor_signs_then_encrypts() {
        init_tracing();
        let planner = ProtectionPlanner::new();
        let log = AssertionLog::new();

        let plan = planner
            .plan(
                &x509_binding(ProtectionOrder::SignBeforeEncrypting),
                &MessageContext::requestor().with_timestamp(),
                &log,
            )
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[CryptoAction::Signature, CryptoAction::Encrypt]
        );
        assert_eq!(
            plan.signed_regions,
            vec![
                ProtectedRegion::element(names::timestamp()),
                ProtectedRegion::element(body()),
            ]
        );
        assert_eq!(plan.encrypted_regions, vec![ProtectedRegion::content(body())]);
        assert_eq!(plan.role, Role::Requestor);
        assert!(log.unsatisfied().is_empty());
    }

    /// Test SOAP 1.2 messages protect the SOAP 1.2 body
    #[test]
    fn test_soap12_body() {
        let planner = ProtectionPlanner::new();

        let plan = planner
            .plan(
                &x509_binding(ProtectionOrder::SignBeforeEncrypting),
                &MessageContext::requestor().with_soap_version(SoapVersion::Soap12),
                &AssertionLog::new(),
            )
            .unwrap();

        assert_eq!(
            plan.signed_regions,
            vec![ProtectedRegion::element(SoapVersion::Soap12.body())]
        );
    }

    /// Test responder with nothing to sign queues no signature
    #[test]
    fn test_responder_without_regions_skips_signature() {
        init_tracing();
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting)
            .with_parts(PartSelectors::default());
        let planner = ProtectionPlanner::new();

        let plan = planner
            .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
            .unwrap();

        assert!(plan.actions.is_empty());
        assert!(plan.signed_regions.is_empty());
        assert!(plan.encrypted_regions.is_empty());
        assert_eq!(plan.key_identifiers.signature, None);
    }

    /// Test signature confirmation alone does not make the responder sign
    #[test]
    fn test_responder_confirmation_alone_skips_signature() {
        for order in [
            ProtectionOrder::SignBeforeEncrypting,
            ProtectionOrder::EncryptBeforeSigning,
        ] {
            let binding = x509_binding(order)
                .with_parts(PartSelectors::default())
                .with_wss(wss11_with_confirmation());

            let plan = ProtectionPlanner::new()
                .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
                .unwrap();

            assert!(!plan.actions.has_signature(), "{:?}: {:?}", order, plan.actions);
            assert!(plan.signed_regions.is_empty());
            assert_eq!(plan.key_identifiers.signature, None);
        }
    }

    /// Test a binding without tokens plans nothing but still reports itself
    #[test]
    fn test_no_tokens_plans_nothing() {
        let binding = shared_policy::AsymmetricBinding::new(ProtectionOrder::SignBeforeEncrypting)
            .with_parts(PartSelectors::body_only());
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor().with_timestamp(), &log)
            .unwrap();

        assert!(plan.actions.is_empty());
        assert!(plan.signed_regions.is_empty());
        assert!(plan.encrypted_regions.is_empty());
        assert!(log.is_asserted(&binding.name));
    }

    // =========================================================================
    // DERIVED KEYS & DIRECTIVES
    // =========================================================================

    /// Test derived-key tokens switch both actions and the signature algorithm
    #[test]
    fn test_derived_key_variants() {
        let derived = Token::x509().with_derived_keys(DerivedKeys::RequireDerivedKeys);
        let binding =
            binding_with_tokens(ProtectionOrder::SignBeforeEncrypting, derived.clone(), derived);

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::SignatureWithDerivedKey,
                CryptoAction::EncryptWithDerivedKey
            ]
        );
        assert_eq!(plan.algorithms.signature.as_deref(), Some(algorithms::HMAC_SHA1));
    }

    /// Test implied derived keys keep the direct variants
    #[test]
    fn test_implied_derived_keys_stay_direct() {
        let implied = Token::x509().with_derived_keys(DerivedKeys::RequireImpliedDerivedKeys);
        let binding =
            binding_with_tokens(ProtectionOrder::SignBeforeEncrypting, implied.clone(), implied);

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[CryptoAction::Signature, CryptoAction::Encrypt]
        );
        assert_eq!(plan.algorithms.signature.as_deref(), Some(algorithms::RSA_SHA1));
        assert_eq!(plan.algorithms.key_wrap.as_deref(), Some(algorithms::RSA_OAEP));
        assert_eq!(plan.algorithms.encryption.as_deref(), Some(algorithms::AES256_CBC));
    }

    /// Test protect-tokens adds exactly one BinarySecurityToken region
    #[test]
    fn test_protect_tokens_signs_binary_security_token_once() {
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting).with_protect_tokens(true);
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &log)
            .unwrap();

        let bst = ProtectedRegion::element(names::binary_security_token());
        assert_eq!(
            plan.signed_regions.iter().filter(|r| **r == bst).count(),
            1
        );
        assert!(plan.include_tokens.signature);
        assert!(log.is_asserted(&binding.assertion(assertions::PROTECT_TOKENS)));
    }

    /// Test a recipient token that is never included is referenced by key identifier
    #[test]
    fn test_never_included_recipient_uses_key_identifier() {
        let binding = binding_with_tokens(
            ProtectionOrder::SignBeforeEncrypting,
            Token::x509(),
            Token::x509().with_inclusion(IncludeTokenType::Never),
        );

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.key_identifiers.encryption,
            Some(KeyIdentifier::SkiKeyIdentifier)
        );
        assert!(!plan.include_tokens.encryption);
        assert_eq!(
            plan.key_identifiers.signature,
            Some(KeyIdentifier::DirectReference)
        );
    }

    // =========================================================================
    // ENCRYPTION USER
    // =========================================================================

    /// Test the useReqSigCert literal selects the request signer's certificate
    #[test]
    fn test_use_req_sig_cert_literal() {
        let message = MessageContext::responder().with_properties(SecurityProperties {
            encrypt_username: Some(USE_REQ_SIG_CERT.to_string()),
            username: Some("service".to_string()),
            ..SecurityProperties::default()
        });

        let plan = ProtectionPlanner::new()
            .plan(
                &x509_binding(ProtectionOrder::SignBeforeEncrypting),
                &message,
                &AssertionLog::new(),
            )
            .unwrap();

        assert!(plan.encryption_user.use_req_sig_cert);
        assert_eq!(plan.signature_user.as_deref(), Some("service"));
    }

    // =========================================================================
    // SIGNATURE CONFIRMATION
    // =========================================================================

    /// Test secure-conversation signers carry their confirmation right after the signature
    #[test]
    fn test_secure_conversation_confirmation_follows_signature() {
        let binding = binding_with_tokens(
            ProtectionOrder::SignBeforeEncrypting,
            Token::x509(),
            Token::new(TokenKind::SecureConversation),
        )
        .with_wss(wss11_with_confirmation());

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::Signature,
                CryptoAction::SignatureConfirmation,
                CryptoAction::Encrypt
            ]
        );
        assert!(plan
            .signed_regions
            .contains(&ProtectedRegion::element(names::signature_confirmation())));
    }

    /// Test X.509 signers keep the confirmation where it was queued
    #[test]
    fn test_x509_confirmation_keeps_position() {
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting)
            .with_wss(wss11_with_confirmation());

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::SignatureConfirmation,
                CryptoAction::Signature,
                CryptoAction::Encrypt
            ]
        );
    }

    // =========================================================================
    // ENCRYPT SIGNATURE
    // =========================================================================

    /// Test the signature and its confirmation are encrypted when requested
    #[test]
    fn test_encrypt_signature_covers_confirmation() {
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting)
            .with_wss(wss11_with_confirmation())
            .with_encrypt_signature(true);
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &log)
            .unwrap();

        assert_eq!(
            plan.encrypted_regions,
            vec![
                ProtectedRegion::content(body()),
                ProtectedRegion::element(names::signature()),
                ProtectedRegion::element(names::signature_confirmation()),
            ]
        );
        assert!(log.is_asserted(&binding.assertion(assertions::ENCRYPT_SIGNATURE)));
    }

    // =========================================================================
    // SUPPORTING TOKENS
    // =========================================================================

    /// Test requestor supporting-token regions join the signature and encryption
    #[test]
    fn test_supporting_token_regions() {
        let token_region = ProtectedRegion::element(QName::new(NS_SP12, "UsernameToken"));
        let supporting = StaticSupportingTokens::new().with_token(
            Role::Requestor,
            SupportingToken::new(
                QName::new(NS_SP12, "SignedEncryptedSupportingTokens"),
                CryptoAction::UsernameToken,
            )
            .with_region(token_region.clone())
            .signed()
            .encrypted(),
        );
        let planner = ProtectionPlanner::new().with_supporting_tokens(Arc::new(supporting));

        let plan = planner
            .plan(
                &x509_binding(ProtectionOrder::SignBeforeEncrypting),
                &MessageContext::requestor(),
                &AssertionLog::new(),
            )
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::Signature,
                CryptoAction::UsernameToken,
                CryptoAction::Encrypt
            ]
        );
        assert_eq!(plan.signed_regions.last(), Some(&token_region));
        assert_eq!(plan.encrypted_regions.last(), Some(&token_region));
    }

    /// Test signed supporting regions are dropped when nothing is signed
    #[test]
    fn test_supporting_signed_region_needs_signature() {
        let token_region = ProtectedRegion::element(QName::new(NS_SP12, "UsernameToken"));
        let supporting = StaticSupportingTokens::new().with_token(
            Role::Requestor,
            SupportingToken::new(
                QName::new(NS_SP12, "SignedSupportingTokens"),
                CryptoAction::UsernameToken,
            )
            .with_region(token_region)
            .signed(),
        );
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting)
            .with_parts(PartSelectors::default());

        let plan = ProtectionPlanner::new()
            .with_supporting_tokens(Arc::new(supporting))
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(plan.actions.as_slice(), &[CryptoAction::UsernameToken]);
        assert!(plan.signed_regions.is_empty());
    }

    // =========================================================================
    // JSON FIXTURE
    // =========================================================================

    /// Test the JSON binding fixture end to end for the requestor
    #[test]
    fn test_json_binding_requestor() {
        init_tracing();
        let binding = json_binding();
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor().with_timestamp(), &log)
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[CryptoAction::Signature, CryptoAction::Encrypt]
        );
        assert_eq!(
            plan.signed_regions,
            vec![
                ProtectedRegion::element(names::timestamp()),
                ProtectedRegion::element(body()),
                ProtectedRegion::element(to_header()).optional(),
                ProtectedRegion::element(names::binary_security_token()),
            ]
        );
        assert_eq!(
            plan.encrypted_regions,
            vec![
                ProtectedRegion::content(body()),
                ProtectedRegion::element(names::signature()),
            ]
        );
        assert_eq!(plan.key_identifiers.signature, Some(KeyIdentifier::Thumbprint));
        assert!(plan.include_tokens.signature);
        assert_eq!(plan.key_identifiers.encryption, Some(KeyIdentifier::Thumbprint));
        assert!(!plan.include_tokens.encryption);

        for local in [
            assertions::SIGN_BEFORE_ENCRYPTING,
            assertions::WSS11,
            assertions::MUST_SUPPORT_REF_THUMBPRINT,
            assertions::REQUIRE_SIGNATURE_CONFIRMATION,
            assertions::INCLUDE_TIMESTAMP,
            assertions::LAYOUT,
            assertions::SIGNED_PARTS,
            assertions::ENCRYPTED_PARTS,
        ] {
            assert!(log.is_asserted(&binding.assertion(local)), "{local} not asserted");
        }
        assert!(log.unsatisfied().is_empty());
    }

    /// Test the JSON binding fixture for the responder
    #[test]
    fn test_json_binding_responder() {
        let binding = json_binding();
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::responder(), &log)
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::SignatureConfirmation,
                CryptoAction::Signature,
                CryptoAction::Encrypt
            ]
        );
        assert!(!plan.include_tokens.signature);
        assert!(!plan
            .signed_regions
            .contains(&ProtectedRegion::element(names::binary_security_token())));
        assert!(plan
            .signed_regions
            .iter()
            .all(|r| r.granularity == Granularity::Element));

        let unsatisfied = log.unsatisfied();
        assert_eq!(unsatisfied.len(), 1);
        assert_eq!(
            unsatisfied[0].name,
            binding.assertion(assertions::INCLUDE_TIMESTAMP)
        );
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// Test catalog recomputation yields the regions the plan signed
    #[test]
    fn test_catalog_matches_plan() {
        let binding = x509_binding(ProtectionOrder::SignBeforeEncrypting)
            .with_parts(header_parts());
        let log = AssertionLog::new();

        let plan = ProtectionPlanner::new()
            .plan(&binding, &MessageContext::requestor(), &log)
            .unwrap();
        let catalog = RegionCatalog::new(&binding, SoapVersion::Soap11, &log);

        assert_eq!(plan.signed_regions, catalog.signed_regions());
        assert_eq!(plan.encrypted_regions, catalog.encrypted_regions());
    }

    // =========================================================================
    // SIGNED SAML
    // =========================================================================

    /// Test the signed SAML assertion replaces only the primary signature
    #[test]
    fn test_signed_saml_keeps_supporting_signature() {
        let supporting = StaticSupportingTokens::new()
            .with_token(
                Role::Requestor,
                SupportingToken::new(
                    QName::new(NS_SP12, "SignedSupportingTokens"),
                    CryptoAction::UsernameToken,
                ),
            )
            .with_token(
                Role::Requestor,
                SupportingToken::new(
                    QName::new(NS_SP12, "EndorsingSupportingTokens"),
                    CryptoAction::Signature,
                ),
            );
        let planner = ProtectionPlanner::with_config(PlannerConfig {
            properties: SecurityProperties {
                saml_callback_configured: Some(true),
                ..SecurityProperties::default()
            },
            ..PlannerConfig::default()
        })
        .with_supporting_tokens(Arc::new(supporting));
        let binding = binding_with_tokens(
            ProtectionOrder::SignBeforeEncrypting,
            Token::saml(SamlVersion::V20),
            Token::x509(),
        );

        let plan = planner
            .plan(&binding, &MessageContext::requestor(), &AssertionLog::new())
            .unwrap();

        assert_eq!(
            plan.actions.as_slice(),
            &[
                CryptoAction::UsernameToken,
                CryptoAction::SamlTokenSigned,
                CryptoAction::Signature,
                CryptoAction::Encrypt
            ]
        );
    }
}
