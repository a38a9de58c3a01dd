//! # Token Policy Model
//!
//! Tokens named by an asymmetric binding, the inclusion and derived-key
//! requirements attached to them, and the wrappers (slots) that hold them.
//!
//! Token kinds form a closed set. Every decision point downstream matches on
//! [`TokenKind`] exhaustively, so adding a kind forces every rule to be
//! revisited.

use crate::names::{assertions, QName};
use serde::{Deserialize, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// Which side of the exchange is processing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The initiator of the exchange (client side).
    Requestor,
    /// The recipient of the exchange answering a request (service side).
    Responder,
}

impl Role {
    pub fn is_requestor(self) -> bool {
        matches!(self, Role::Requestor)
    }
}

// =============================================================================
// INCLUSION & DERIVED KEYS
// =============================================================================

/// `sp:IncludeToken` value of a token assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IncludeTokenType {
    #[default]
    Always,
    AlwaysToRecipient,
    AlwaysToInitiator,
    Once,
    Never,
}

impl IncludeTokenType {
    /// Whether the token must travel in the message sent by `role`.
    ///
    /// Messages from the requestor go to the recipient, responses go to the
    /// initiator; `Once` is honoured on the first (requestor) message only.
    pub fn is_required_for(self, role: Role) -> bool {
        match self {
            IncludeTokenType::Never => false,
            IncludeTokenType::Always => true,
            IncludeTokenType::AlwaysToRecipient | IncludeTokenType::Once => role.is_requestor(),
            IncludeTokenType::AlwaysToInitiator => !role.is_requestor(),
        }
    }
}

/// Derived-key requirement of a token assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DerivedKeys {
    #[default]
    None,
    RequireDerivedKeys,
    RequireImpliedDerivedKeys,
}

// =============================================================================
// TOKEN KINDS
// =============================================================================

/// Reference requirements of an `sp:X509Token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct X509Token {
    pub require_issuer_serial_reference: bool,
    pub require_key_identifier_reference: bool,
    pub require_thumbprint_reference: bool,
}

/// `sp:IssuedToken`: a token obtained from a security token service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuedToken {
    /// Address of the issuing service, when the policy names one.
    pub issuer: Option<String>,
    /// Requested token type URI.
    pub token_type: Option<String>,
}

/// SAML assertion version carried by an `sp:SamlToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SamlVersion {
    V11,
    #[default]
    V20,
}

impl SamlVersion {
    /// Element name of the assertion on the wire.
    pub fn assertion_name(self) -> QName {
        match self {
            SamlVersion::V11 => crate::names::saml11_assertion(),
            SamlVersion::V20 => crate::names::saml20_assertion(),
        }
    }
}

/// `sp:SamlToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamlToken {
    pub version: SamlVersion,
}

/// The closed set of token kinds an asymmetric binding can name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    X509(X509Token),
    Issued(IssuedToken),
    Saml(SamlToken),
    SecurityContext,
    SecureConversation,
    SpnegoContext,
    Kerberos,
    /// Bare asymmetric key carried as `ds:KeyValue`.
    KeyValue,
    /// Password-based token, the generic symmetric credential.
    Username,
}

impl TokenKind {
    /// Local name of the policy assertion describing this kind.
    pub fn assertion_local_name(&self) -> &'static str {
        match self {
            TokenKind::X509(_) => "X509Token",
            TokenKind::Issued(_) => "IssuedToken",
            TokenKind::Saml(_) => "SamlToken",
            TokenKind::SecurityContext => "SecurityContextToken",
            TokenKind::SecureConversation => "SecureConversationToken",
            TokenKind::SpnegoContext => "SpnegoContextToken",
            TokenKind::Kerberos => "KerberosToken",
            TokenKind::KeyValue => "KeyValueToken",
            TokenKind::Username => "UsernameToken",
        }
    }
}

/// A token assertion together with its inclusion and key-derivation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default)]
    pub inclusion: IncludeTokenType,
    #[serde(default)]
    pub derived_keys: DerivedKeys,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            inclusion: IncludeTokenType::default(),
            derived_keys: DerivedKeys::default(),
        }
    }

    pub fn x509() -> Self {
        Self::new(TokenKind::X509(X509Token::default()))
    }

    pub fn issued() -> Self {
        Self::new(TokenKind::Issued(IssuedToken::default()))
    }

    pub fn saml(version: SamlVersion) -> Self {
        Self::new(TokenKind::Saml(SamlToken { version }))
    }

    pub fn with_inclusion(mut self, inclusion: IncludeTokenType) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn with_derived_keys(mut self, derived_keys: DerivedKeys) -> Self {
        self.derived_keys = derived_keys;
        self
    }

    /// Only an explicit `RequireDerivedKeys` switches actions to their
    /// derived-key variants.
    pub fn requires_derived_keys(&self) -> bool {
        self.derived_keys == DerivedKeys::RequireDerivedKeys
    }

    /// Assertion name of this token in the binding's namespace.
    pub fn assertion_name(&self, binding_namespace: &str) -> QName {
        QName::new(binding_namespace, self.kind.assertion_local_name())
    }
}

// =============================================================================
// WRAPPERS
// =============================================================================

/// The binding slot a token wrapper occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenSlot {
    InitiatorToken,
    InitiatorSignatureToken,
    InitiatorEncryptionToken,
    RecipientToken,
    RecipientSignatureToken,
    RecipientEncryptionToken,
}

impl TokenSlot {
    pub fn assertion_local_name(self) -> &'static str {
        match self {
            TokenSlot::InitiatorToken => assertions::INITIATOR_TOKEN,
            TokenSlot::InitiatorSignatureToken => assertions::INITIATOR_SIGNATURE_TOKEN,
            TokenSlot::InitiatorEncryptionToken => assertions::INITIATOR_ENCRYPTION_TOKEN,
            TokenSlot::RecipientToken => assertions::RECIPIENT_TOKEN,
            TokenSlot::RecipientSignatureToken => assertions::RECIPIENT_SIGNATURE_TOKEN,
            TokenSlot::RecipientEncryptionToken => assertions::RECIPIENT_ENCRYPTION_TOKEN,
        }
    }
}

/// A token held in one of the binding's wrapper slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWrapper {
    pub slot: TokenSlot,
    pub token: Token,
}

impl TokenWrapper {
    pub fn new(slot: TokenSlot, token: Token) -> Self {
        Self { slot, token }
    }

    pub fn assertion_name(&self, binding_namespace: &str) -> QName {
        QName::new(binding_namespace, self.slot.assertion_local_name())
    }
}
