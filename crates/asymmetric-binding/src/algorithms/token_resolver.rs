//! Token Resolver
//!
//! Decides which wrapper plays the signature and encryption roles for the
//! message being secured:
//!
//! | Role      | Signature token                       | Encryption token                       |
//! |-----------|---------------------------------------|----------------------------------------|
//! | Requestor | initiator signature, else initiator   | recipient encryption, else recipient   |
//! | Responder | recipient signature, else recipient   | initiator encryption, else initiator   |
//!
//! `None` means the operation is skipped, never an error. Every resolved
//! wrapper and its token are reported to the assertion sink, except a SAML
//! initiator token: that one holds only after the planner has embedded it.

use crate::ports::outbound::AssertionSink;
use shared_policy::{AsymmetricBinding, Role, TokenKind, TokenWrapper};

pub struct TokenResolver<'a> {
    binding: &'a AsymmetricBinding,
    sink: &'a dyn AssertionSink,
}

impl<'a> TokenResolver<'a> {
    pub fn new(binding: &'a AsymmetricBinding, sink: &'a dyn AssertionSink) -> Self {
        Self { binding, sink }
    }

    pub fn initiator_signature_token(&self) -> Option<&'a TokenWrapper> {
        let wrapper = fallback(
            &self.binding.initiator_signature_token,
            &self.binding.initiator_token,
        );
        match wrapper {
            Some(saml) if matches!(saml.token.kind, TokenKind::Saml(_)) => {
                self.sink
                    .assert(&saml.assertion_name(self.binding.namespace()));
                wrapper
            }
            _ => self.resolved(wrapper),
        }
    }

    pub fn recipient_signature_token(&self) -> Option<&'a TokenWrapper> {
        self.resolved(fallback(
            &self.binding.recipient_signature_token,
            &self.binding.recipient_token,
        ))
    }

    pub fn signature_token(&self, role: Role) -> Option<&'a TokenWrapper> {
        match role {
            Role::Requestor => self.initiator_signature_token(),
            Role::Responder => self.recipient_signature_token(),
        }
    }

    pub fn encryption_token(&self, role: Role) -> Option<&'a TokenWrapper> {
        let wrapper = match role {
            Role::Requestor => fallback(
                &self.binding.recipient_encryption_token,
                &self.binding.recipient_token,
            ),
            Role::Responder => fallback(
                &self.binding.initiator_encryption_token,
                &self.binding.initiator_token,
            ),
        };
        self.resolved(wrapper)
    }

    fn resolved(&self, wrapper: Option<&'a TokenWrapper>) -> Option<&'a TokenWrapper> {
        if let Some(wrapper) = wrapper {
            let namespace = self.binding.namespace();
            self.sink.assert(&wrapper.assertion_name(namespace));
            self.sink.assert(&wrapper.token.assertion_name(namespace));
        }
        wrapper
    }
}

fn fallback<'a>(
    dedicated: &'a Option<TokenWrapper>,
    general: &'a Option<TokenWrapper>,
) -> Option<&'a TokenWrapper> {
    dedicated.as_ref().or(general.as_ref())
}
