//! Core entities for protection planning
//!
//! A [`ProtectionPlan`] is created fresh for every message, consumed once by
//! the crypto engine and then discarded.

use super::value_objects::{CredentialStrategy, Granularity, KeyDerivation, KeyIdentifier};
use serde::{Deserialize, Serialize};
use shared_policy::{ProtectionOrder, QName, Role, SamlVersion};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// PROTECTED REGIONS
// =============================================================================

/// What a protected region points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionTarget {
    Element(QName),
    /// Reference outside the envelope, e.g. `cid:Attachments`.
    External(String),
}

/// A message region selected for signing or encryption.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtectedRegion {
    pub target: RegionTarget,
    pub granularity: Granularity,
    /// Optional regions are skipped by the engine when absent from the message.
    pub required: bool,
}

impl ProtectedRegion {
    pub fn element(name: QName) -> Self {
        Self {
            target: RegionTarget::Element(name),
            granularity: Granularity::Element,
            required: true,
        }
    }

    pub fn content(name: QName) -> Self {
        Self {
            target: RegionTarget::Element(name),
            granularity: Granularity::Content,
            required: true,
        }
    }

    pub fn external(reference: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            target: RegionTarget::External(reference.into()),
            granularity,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn element_name(&self) -> Option<&QName> {
        match &self.target {
            RegionTarget::Element(name) => Some(name),
            RegionTarget::External(_) => None,
        }
    }

    pub fn is_element(&self, name: &QName) -> bool {
        self.element_name() == Some(name)
    }
}

impl fmt::Display for ProtectedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            RegionTarget::Element(name) => write!(f, "{} ({:?})", name, self.granularity),
            RegionTarget::External(reference) => {
                write!(f, "{} ({:?})", reference, self.granularity)
            }
        }
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// A cryptographic action the engine performs, in plan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CryptoAction {
    Timestamp,
    Signature,
    SignatureWithDerivedKey,
    Encrypt,
    EncryptWithDerivedKey,
    SignatureConfirmation,
    UsernameToken,
    SamlTokenSigned,
    SamlTokenUnsigned,
    Kerberos,
    CustomToken,
}

impl CryptoAction {
    pub fn signature(kind: KeyDerivation) -> Self {
        match kind {
            KeyDerivation::Direct => CryptoAction::Signature,
            KeyDerivation::Derived => CryptoAction::SignatureWithDerivedKey,
        }
    }

    pub fn encrypt(kind: KeyDerivation) -> Self {
        match kind {
            KeyDerivation::Direct => CryptoAction::Encrypt,
            KeyDerivation::Derived => CryptoAction::EncryptWithDerivedKey,
        }
    }

    pub fn is_signature(self) -> bool {
        matches!(
            self,
            CryptoAction::Signature | CryptoAction::SignatureWithDerivedKey
        )
    }

    pub fn is_encrypt(self) -> bool {
        matches!(
            self,
            CryptoAction::Encrypt | CryptoAction::EncryptWithDerivedKey
        )
    }
}

/// Finished, immutable action sequence. Only the action sequencer builds one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionList(Vec<CryptoAction>);

impl ActionList {
    pub(crate) fn from_staged(actions: Vec<CryptoAction>) -> Self {
        Self(actions)
    }

    pub fn as_slice(&self) -> &[CryptoAction] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &CryptoAction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, action: CryptoAction) -> bool {
        self.0.contains(&action)
    }

    pub fn position(&self, action: CryptoAction) -> Option<usize> {
        self.0.iter().position(|a| *a == action)
    }

    pub fn has_signature(&self) -> bool {
        self.0.iter().any(|a| a.is_signature())
    }

    pub fn has_encrypt(&self) -> bool {
        self.0.iter().any(|a| a.is_encrypt())
    }
}

// =============================================================================
// DIRECTIVES
// =============================================================================

/// Key identifier chosen per operation; `None` when the operation is not planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyIdentifierChoices {
    pub signature: Option<KeyIdentifier>,
    pub encryption: Option<KeyIdentifier>,
}

/// Whether the engine embeds the token in the security header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeTokenDecisions {
    pub signature: bool,
    pub encryption: bool,
}

/// Algorithm URIs taken from the binding's suite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSelection {
    pub signature: Option<String>,
    pub digest: Option<String>,
    pub c14n: Option<String>,
    pub key_wrap: Option<String>,
    pub encryption: Option<String>,
}

/// Recipient used to look up the encryption certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionUser {
    pub user: Option<String>,
    /// Encrypt for the certificate that signed the request.
    pub use_req_sig_cert: bool,
}

// =============================================================================
// PLAN
// =============================================================================

/// Everything the crypto engine needs to secure one message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionPlan {
    pub correlation_id: Uuid,
    pub order: ProtectionOrder,
    pub role: Role,
    pub actions: ActionList,
    pub signed_regions: Vec<ProtectedRegion>,
    pub encrypted_regions: Vec<ProtectedRegion>,
    pub key_identifiers: KeyIdentifierChoices,
    pub include_tokens: IncludeTokenDecisions,
    pub algorithms: AlgorithmSelection,
    pub signature_user: Option<String>,
    pub encryption_user: EncryptionUser,
    /// Identifier of the stored issued token that signs the message.
    pub signature_token_id: Option<String>,
    pub credentials: CredentialStrategy,
}

// =============================================================================
// TOKENS & CREDENTIALS
// =============================================================================

/// A runtime token obtained from an issuance service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken {
    pub id: String,
    pub token_type: Option<String>,
    /// Set when the token is a SAML assertion.
    pub saml_assertion: Option<SamlVersion>,
    /// DER-encoded certificate bound to the token, if any.
    pub certificate: Option<Vec<u8>>,
}

impl SecurityToken {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            token_type: None,
            saml_assertion: None,
            certificate: None,
        }
    }

    pub fn with_saml_assertion(mut self, version: SamlVersion) -> Self {
        self.saml_assertion = Some(version);
        self
    }

    pub fn with_certificate(mut self, certificate: Vec<u8>) -> Self {
        self.certificate = Some(certificate);
        self
    }
}

/// A supporting token attached to the message by the supporting-token layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingToken {
    /// Assertion this token satisfies.
    pub assertion: QName,
    pub action: CryptoAction,
    /// Region the token occupies in the security header.
    pub region: Option<ProtectedRegion>,
    pub signed: bool,
    pub encrypted: bool,
}

impl SupportingToken {
    pub fn new(assertion: QName, action: CryptoAction) -> Self {
        Self {
            assertion,
            action,
            region: None,
            signed: false,
            encrypted: false,
        }
    }

    pub fn with_region(mut self, region: ProtectedRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }
}

/// Where a resolved credential came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialSource {
    TokenStore,
    Ambient,
}

/// Key material handed to the crypto engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub certificate: Option<Vec<u8>>,
    pub source: CredentialSource,
}

impl Credential {
    pub fn ambient(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            certificate: None,
            source: CredentialSource::Ambient,
        }
    }
}

impl From<SecurityToken> for Credential {
    fn from(token: SecurityToken) -> Self {
        Self {
            id: token.id,
            certificate: token.certificate,
            source: CredentialSource::TokenStore,
        }
    }
}

/// Wire bytes produced by the crypto engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuredEnvelope {
    pub correlation_id: Uuid,
    pub payload: Vec<u8>,
}
