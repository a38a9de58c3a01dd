//! Value objects for protection planning

use serde::{Deserialize, Serialize};
use shared_policy::names::{NS_SOAP11, NS_SOAP12};
use shared_policy::{QName, Token};
use std::fmt;

/// Whether an action uses the token key directly or a key derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyDerivation {
    Direct,
    Derived,
}

impl KeyDerivation {
    pub fn for_token(token: &Token) -> Self {
        if token.requires_derived_keys() {
            KeyDerivation::Derived
        } else {
            KeyDerivation::Direct
        }
    }

    pub fn is_derived(self) -> bool {
        matches!(self, KeyDerivation::Derived)
    }
}

/// How a signature or encryption refers to the key-bearing token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyIdentifier {
    IssuerSerial,
    /// X.509 Subject Key Identifier.
    SkiKeyIdentifier,
    Thumbprint,
    /// `wsse:Reference` to a token carried in the security header.
    DirectReference,
    KeyValue,
}

impl KeyIdentifier {
    /// Reference styles that point at a token the message may carry.
    pub fn references_embedded_token(self) -> bool {
        matches!(
            self,
            KeyIdentifier::IssuerSerial | KeyIdentifier::Thumbprint | KeyIdentifier::DirectReference
        )
    }
}

/// Whether a region is protected as a whole element or only its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Element,
    Content,
}

/// SOAP envelope version of the message being secured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoapVersion {
    #[default]
    Soap11,
    Soap12,
}

impl SoapVersion {
    pub fn namespace(self) -> &'static str {
        match self {
            SoapVersion::Soap11 => NS_SOAP11,
            SoapVersion::Soap12 => NS_SOAP12,
        }
    }

    pub fn body(self) -> QName {
        QName::new(self.namespace(), "Body")
    }
}

/// Stage of the per-message planning state machine.
///
/// Encrypt-before-sign visits `EncryptionPhase` before `SignaturePhase`; the
/// stage is recorded for diagnostics and reported in faults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanningStage {
    #[default]
    Start,
    TokensResolved,
    RegionsComputed,
    SignaturePhase,
    EncryptionPhase,
    SupportingTokensAttached,
    Finalized,
    Aborted,
}

impl fmt::Display for PlanningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanningStage::Start => "start",
            PlanningStage::TokensResolved => "tokens-resolved",
            PlanningStage::RegionsComputed => "regions-computed",
            PlanningStage::SignaturePhase => "signature-phase",
            PlanningStage::EncryptionPhase => "encryption-phase",
            PlanningStage::SupportingTokensAttached => "supporting-tokens-attached",
            PlanningStage::Finalized => "finalized",
            PlanningStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Where the crypto engine obtains key material for the plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStrategy {
    /// Ambient credentials only.
    #[default]
    Configured,
    /// Token store first, ambient credentials as fallback. Chosen when an
    /// issued token was stored during planning.
    TokenStoreBacked,
}
