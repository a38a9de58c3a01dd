//! Protection protocols
//!
//! The two orders an asymmetric binding can demand. Both run on a fresh
//! [`PlanBuilder`] and leave it ready for `finalize`.

use super::plan_builder::PlanBuilder;
use crate::domain::entities::ProtectedRegion;
use crate::domain::errors::PlanningError;
use crate::domain::value_objects::PlanningStage;
use shared_policy::names;

impl<'a> PlanBuilder<'a> {
    /// Sign the selected regions, then encrypt.
    pub(crate) fn sign_before_encrypt(&mut self) -> Result<(), PlanningError> {
        let role = self.role();

        let initiator = self.resolver.initiator_signature_token();
        if let Some(wrapper) = initiator {
            self.embed_initiator_token(wrapper)?;
        }
        self.advance(PlanningStage::TokensResolved);

        let mut sig_parts = Vec::new();
        if self.message.timestamp_added {
            sig_parts.push(ProtectedRegion::element(names::timestamp()));
        }
        sig_parts.extend(self.catalog.signed_regions());
        self.advance(PlanningStage::RegionsComputed);

        self.advance(PlanningStage::SignaturePhase);
        if role.is_requestor() {
            if let Some(wrapper) = initiator {
                self.do_signature(wrapper, sig_parts);
            }
        } else {
            // Confirmation alone never warrants a signature.
            let signs_message = !sig_parts.is_empty();
            self.add_signature_confirmation(&mut sig_parts);
            if let Some(wrapper) = self.resolver.recipient_signature_token() {
                if signs_message {
                    self.do_signature(wrapper, sig_parts);
                }
            }
        }

        self.attach_supporting_tokens()?;
        self.advance(PlanningStage::SupportingTokensAttached);
        self.remove_signature_if_signed_saml();
        self.reposition_signature_confirmation();

        self.advance(PlanningStage::EncryptionPhase);
        let mut enc_parts = self.catalog.encrypted_regions();
        if self.binding.encrypt_signature {
            let signed = self.signature_planned();
            self.protect_signature(&mut enc_parts, signed);
        }

        let encryption_token = self.resolver.encryption_token(role);
        if role.is_requestor() {
            enc_parts.append(&mut self.encrypted_token_regions);
        }
        self.do_encryption(encryption_token, enc_parts);

        Ok(())
    }

    /// Encrypt the selected regions, then sign. Signed regions are captured
    /// before any encryption is planned.
    pub(crate) fn encrypt_before_sign(&mut self) -> Result<(), PlanningError> {
        let role = self.role();

        let initiator = self.resolver.initiator_signature_token();
        if let Some(wrapper) = initiator {
            self.embed_initiator_token(wrapper)?;
        }
        let encryption_token = self.resolver.encryption_token(role);
        let signature_token = if role.is_requestor() {
            initiator
        } else {
            self.resolver.recipient_signature_token()
        };
        self.advance(PlanningStage::TokensResolved);

        let mut enc_parts = self.catalog.encrypted_regions();
        let mut sig_parts = self.catalog.signed_regions();
        let signs_message = !sig_parts.is_empty() || self.message.timestamp_added;
        self.advance(PlanningStage::RegionsComputed);

        self.attach_supporting_tokens()?;
        self.advance(PlanningStage::SupportingTokensAttached);

        self.advance(PlanningStage::EncryptionPhase);
        if encryption_token.is_some() && !enc_parts.is_empty() {
            if role.is_requestor() {
                enc_parts.append(&mut self.encrypted_token_regions);
            } else {
                self.add_signature_confirmation(&mut sig_parts);
            }

            if self.binding.encrypt_signature {
                let signature_expected = signature_token.is_some() && signs_message;
                self.protect_signature(&mut enc_parts, signature_expected);
            }

            self.do_encryption(encryption_token, enc_parts);
        }

        self.advance(PlanningStage::SignaturePhase);
        if self.message.timestamp_added {
            sig_parts.push(ProtectedRegion::element(names::timestamp()));
        }
        if let Some(wrapper) = signature_token.filter(|_| signs_message) {
            self.do_signature(wrapper, sig_parts);
        }

        self.remove_signature_if_signed_saml();
        self.enforce_signed_saml_after_encryption()?;
        self.reposition_signature_confirmation();

        Ok(())
    }
}
