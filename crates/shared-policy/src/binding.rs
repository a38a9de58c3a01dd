//! # Asymmetric Binding
//!
//! The `sp:AsymmetricBinding` assertion as a read-only value: protection
//! order, algorithm suite, flags, layout, the WSS and Trust options in
//! effect for the endpoint and the six token wrapper slots.

use crate::errors::PolicyError;
use crate::names::{assertions, QName, NS_SP12};
use crate::parts::PartSelectors;
use crate::tokens::{TokenSlot, TokenWrapper};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENUMS
// =============================================================================

/// Relative order of signing and encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProtectionOrder {
    #[default]
    SignBeforeEncrypting,
    EncryptBeforeSigning,
}

impl ProtectionOrder {
    pub fn assertion_local_name(self) -> &'static str {
        match self {
            ProtectionOrder::SignBeforeEncrypting => assertions::SIGN_BEFORE_ENCRYPTING,
            ProtectionOrder::EncryptBeforeSigning => assertions::ENCRYPT_BEFORE_SIGNING,
        }
    }
}

/// `sp:Layout` of the security header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Layout {
    #[default]
    Lax,
    Strict,
    LaxTsFirst,
    LaxTsLast,
}

// =============================================================================
// ALGORITHM SUITE
// =============================================================================

pub mod algorithms {
    pub const RSA_OAEP: &str = "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p";
    pub const RSA_15: &str = "http://www.w3.org/2001/04/xmlenc#rsa-1_5";
    pub const AES128_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes128-cbc";
    pub const AES256_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";
    pub const TRIPLE_DES_CBC: &str = "http://www.w3.org/2001/04/xmlenc#tripledes-cbc";
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
    pub const HMAC_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#hmac-sha1";
    pub const HMAC_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha256";
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
    pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
}

/// `sp:AlgorithmSuite` resolved to algorithm URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSuite {
    /// Suite name, e.g. `Basic256`.
    pub name: String,
    pub asymmetric_signature: String,
    pub symmetric_signature: String,
    pub asymmetric_key_wrap: String,
    pub encryption: String,
    pub digest: String,
    pub c14n: String,
}

impl AlgorithmSuite {
    fn with_name(name: &str, encryption: &str) -> Self {
        Self {
            name: name.to_string(),
            asymmetric_signature: algorithms::RSA_SHA1.to_string(),
            symmetric_signature: algorithms::HMAC_SHA1.to_string(),
            asymmetric_key_wrap: algorithms::RSA_OAEP.to_string(),
            encryption: encryption.to_string(),
            digest: algorithms::SHA1.to_string(),
            c14n: algorithms::EXC_C14N.to_string(),
        }
    }

    pub fn basic128() -> Self {
        Self::with_name("Basic128", algorithms::AES128_CBC)
    }

    pub fn basic256() -> Self {
        Self::with_name("Basic256", algorithms::AES256_CBC)
    }

    pub fn triple_des_rsa15() -> Self {
        Self {
            asymmetric_key_wrap: algorithms::RSA_15.to_string(),
            ..Self::with_name("TripleDesRsa15", algorithms::TRIPLE_DES_CBC)
        }
    }

    pub fn basic256_sha256() -> Self {
        Self {
            asymmetric_signature: algorithms::RSA_SHA256.to_string(),
            symmetric_signature: algorithms::HMAC_SHA256.to_string(),
            digest: algorithms::SHA256.to_string(),
            ..Self::with_name("Basic256Sha256", algorithms::AES256_CBC)
        }
    }
}

impl Default for AlgorithmSuite {
    fn default() -> Self {
        Self::basic256()
    }
}

// =============================================================================
// WSS OPTIONS
// =============================================================================

/// `sp:Wss10` / `sp:Wss11` assertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WssOptions {
    /// `true` for `sp:Wss11`.
    pub wss11: bool,
    pub must_support_ref_key_identifier: bool,
    pub must_support_ref_issuer_serial: bool,
    /// WSS 1.1 only.
    pub must_support_ref_thumbprint: bool,
    /// WSS 1.1 only.
    pub require_signature_confirmation: bool,
}

impl WssOptions {
    pub fn requires_signature_confirmation(&self) -> bool {
        self.wss11 && self.require_signature_confirmation
    }

    pub fn supports_thumbprint(&self) -> bool {
        self.wss11 && self.must_support_ref_thumbprint
    }
}

// =============================================================================
// TRUST OPTIONS
// =============================================================================

/// `sp:Trust10` / `sp:Trust13` assertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustOptions {
    /// `true` for `sp:Trust13`.
    pub trust13: bool,
    pub must_support_client_challenge: bool,
    pub must_support_server_challenge: bool,
    pub require_client_entropy: bool,
    pub require_server_entropy: bool,
    pub must_support_issued_tokens: bool,
    /// Trust 1.3 only.
    pub require_request_security_token_collection: bool,
    /// Trust 1.3 only.
    pub require_applies_to: bool,
    /// Trust 1.3 only.
    pub scope_policy_15: bool,
    /// Trust 1.3 only.
    pub must_support_interactive_challenge: bool,
}

impl TrustOptions {
    fn uses_trust13_options(&self) -> bool {
        self.require_request_security_token_collection
            || self.require_applies_to
            || self.scope_policy_15
            || self.must_support_interactive_challenge
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// A fully parsed `sp:AsymmetricBinding` plus the message-level selectors
/// that apply to it. Immutable for a message-processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsymmetricBinding {
    /// Binding assertion name. Its namespace qualifies every binding-level
    /// assertion reported during planning.
    pub name: QName,
    #[serde(default)]
    pub protection_order: ProtectionOrder,
    #[serde(default)]
    pub algorithm_suite: AlgorithmSuite,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub protect_tokens: bool,
    #[serde(default)]
    pub encrypt_signature: bool,
    #[serde(default)]
    pub include_timestamp: bool,
    #[serde(default)]
    pub only_sign_entire_headers_and_body: bool,
    #[serde(default)]
    pub wss: Option<WssOptions>,
    #[serde(default)]
    pub trust: Option<TrustOptions>,
    #[serde(default)]
    pub parts: PartSelectors,
    #[serde(default)]
    pub initiator_token: Option<TokenWrapper>,
    #[serde(default)]
    pub initiator_signature_token: Option<TokenWrapper>,
    #[serde(default)]
    pub initiator_encryption_token: Option<TokenWrapper>,
    #[serde(default)]
    pub recipient_token: Option<TokenWrapper>,
    #[serde(default)]
    pub recipient_signature_token: Option<TokenWrapper>,
    #[serde(default)]
    pub recipient_encryption_token: Option<TokenWrapper>,
}

impl AsymmetricBinding {
    /// A WS-SecurityPolicy 1.2 binding with no tokens configured.
    pub fn new(protection_order: ProtectionOrder) -> Self {
        Self {
            name: QName::new(NS_SP12, assertions::ASYMMETRIC_BINDING),
            protection_order,
            algorithm_suite: AlgorithmSuite::default(),
            layout: Layout::default(),
            protect_tokens: false,
            encrypt_signature: false,
            include_timestamp: false,
            only_sign_entire_headers_and_body: false,
            wss: None,
            trust: None,
            parts: PartSelectors::default(),
            initiator_token: None,
            initiator_signature_token: None,
            initiator_encryption_token: None,
            recipient_token: None,
            recipient_signature_token: None,
            recipient_encryption_token: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.name.namespace
    }

    /// Name of a binding-level assertion in the binding's namespace.
    pub fn assertion(&self, local_part: &str) -> QName {
        self.name.sibling(local_part)
    }

    /// Place `wrapper` into the slot it declares.
    pub fn with_token(mut self, wrapper: TokenWrapper) -> Self {
        let slot = match wrapper.slot {
            TokenSlot::InitiatorToken => &mut self.initiator_token,
            TokenSlot::InitiatorSignatureToken => &mut self.initiator_signature_token,
            TokenSlot::InitiatorEncryptionToken => &mut self.initiator_encryption_token,
            TokenSlot::RecipientToken => &mut self.recipient_token,
            TokenSlot::RecipientSignatureToken => &mut self.recipient_signature_token,
            TokenSlot::RecipientEncryptionToken => &mut self.recipient_encryption_token,
        };
        *slot = Some(wrapper);
        self
    }

    pub fn with_algorithm_suite(mut self, suite: AlgorithmSuite) -> Self {
        self.algorithm_suite = suite;
        self
    }

    pub fn with_parts(mut self, parts: PartSelectors) -> Self {
        self.parts = parts;
        self
    }

    pub fn with_wss(mut self, wss: WssOptions) -> Self {
        self.wss = Some(wss);
        self
    }

    pub fn with_trust(mut self, trust: TrustOptions) -> Self {
        self.trust = Some(trust);
        self
    }

    pub fn with_protect_tokens(mut self, protect_tokens: bool) -> Self {
        self.protect_tokens = protect_tokens;
        self
    }

    pub fn with_encrypt_signature(mut self, encrypt_signature: bool) -> Self {
        self.encrypt_signature = encrypt_signature;
        self
    }

    pub fn with_include_timestamp(mut self, include_timestamp: bool) -> Self {
        self.include_timestamp = include_timestamp;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Structural validation of a deserialized binding.
    ///
    /// Every wrapper must sit in the slot it declares, and options of the
    /// newer WSS and Trust versions must not be set on the older assertion.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.name.namespace.is_empty() {
            return Err(PolicyError::MissingNamespace);
        }

        let slots = [
            (TokenSlot::InitiatorToken, &self.initiator_token),
            (
                TokenSlot::InitiatorSignatureToken,
                &self.initiator_signature_token,
            ),
            (
                TokenSlot::InitiatorEncryptionToken,
                &self.initiator_encryption_token,
            ),
            (TokenSlot::RecipientToken, &self.recipient_token),
            (
                TokenSlot::RecipientSignatureToken,
                &self.recipient_signature_token,
            ),
            (
                TokenSlot::RecipientEncryptionToken,
                &self.recipient_encryption_token,
            ),
        ];
        for (expected, wrapper) in slots {
            if let Some(wrapper) = wrapper {
                if wrapper.slot != expected {
                    return Err(PolicyError::SlotMismatch {
                        expected,
                        actual: wrapper.slot,
                    });
                }
            }
        }

        if let Some(wss) = &self.wss {
            if !wss.wss11 && (wss.must_support_ref_thumbprint || wss.require_signature_confirmation)
            {
                return Err(PolicyError::Wss11OptionOnWss10);
            }
        }

        if let Some(trust) = &self.trust {
            if !trust.trust13 && trust.uses_trust13_options() {
                return Err(PolicyError::Trust13OptionOnTrust10);
            }
        }

        Ok(())
    }
}
