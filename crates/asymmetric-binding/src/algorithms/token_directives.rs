//! Token directives
//!
//! Per-token decisions handed to the crypto engine: how the key is
//! referenced and whether the token itself travels in the message.
//! Every rule matches [`TokenKind`] exhaustively.

use crate::domain::value_objects::KeyIdentifier;
use shared_policy::{IncludeTokenType, Role, Token, TokenKind, WssOptions};

/// Key identifier for `token` under the binding's WSS options.
pub fn key_identifier(token: &Token, wss: Option<&WssOptions>) -> KeyIdentifier {
    match &token.kind {
        TokenKind::X509(x509) => {
            if x509.require_issuer_serial_reference {
                return KeyIdentifier::IssuerSerial;
            }
            if x509.require_key_identifier_reference {
                return KeyIdentifier::SkiKeyIdentifier;
            }
            if x509.require_thumbprint_reference {
                return KeyIdentifier::Thumbprint;
            }
        }
        TokenKind::KeyValue => return KeyIdentifier::KeyValue,
        TokenKind::Issued(_) | TokenKind::Saml(_) => return KeyIdentifier::DirectReference,
        TokenKind::SecurityContext
        | TokenKind::SecureConversation
        | TokenKind::SpnegoContext
        | TokenKind::Kerberos
        | TokenKind::Username => {}
    }

    if token.inclusion == IncludeTokenType::Never {
        return match wss {
            None => KeyIdentifier::SkiKeyIdentifier,
            Some(wss) if wss.must_support_ref_key_identifier => KeyIdentifier::SkiKeyIdentifier,
            Some(wss) if wss.must_support_ref_issuer_serial => KeyIdentifier::IssuerSerial,
            Some(wss) if wss.supports_thumbprint() => KeyIdentifier::Thumbprint,
            Some(_) => KeyIdentifier::IssuerSerial,
        };
    }

    KeyIdentifier::DirectReference
}

/// Whether the engine embeds `token` in the security header.
///
/// Only X.509 tokens are embedded: the inclusion policy must require the
/// token for this message, and the chosen reference must be able to point
/// at an embedded token. Issued, SAML and secure-conversation tokens are
/// always referenced, never re-embedded by the signature.
pub fn include_token(token: &Token, key_identifier: KeyIdentifier, role: Role) -> bool {
    let embeddable = match token.kind {
        TokenKind::X509(_) => true,
        TokenKind::Issued(_)
        | TokenKind::Saml(_)
        | TokenKind::SecurityContext
        | TokenKind::SecureConversation
        | TokenKind::SpnegoContext
        | TokenKind::Kerberos
        | TokenKind::KeyValue
        | TokenKind::Username => false,
    };

    embeddable && token.inclusion.is_required_for(role) && key_identifier.references_embedded_token()
}

/// Secure-conversation-family tokens. Their signature confirmation is
/// placed directly after the primary signature.
pub fn is_secure_conversation_family(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::SecurityContext | TokenKind::SecureConversation | TokenKind::SpnegoContext => {
            true
        }
        TokenKind::X509(_)
        | TokenKind::Issued(_)
        | TokenKind::Saml(_)
        | TokenKind::Kerberos
        | TokenKind::KeyValue
        | TokenKind::Username => false,
    }
}

/// Protect-tokens signs the embedded `wsse:BinarySecurityToken` of an X.509
/// signing token that is actually included.
pub fn signs_binary_security_token(token: &Token) -> bool {
    matches!(token.kind, TokenKind::X509(_)) && token.inclusion != IncludeTokenType::Never
}
