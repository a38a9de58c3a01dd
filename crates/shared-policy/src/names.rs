//! # Qualified Names
//!
//! XML qualified names and the namespaces every binding decision refers to.
//!
//! ## Clusters
//!
//! - **Namespaces**: SOAP 1.1/1.2, WSS 1.0/1.1, XML-DSig, SAML 1.1/2.0, SP 1.1/1.2
//! - **Elements**: well-known header elements that become protected regions
//! - **Assertions**: local names of the policy assertions the planner reports

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// NAMESPACES
// =============================================================================

pub const NS_SOAP11: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const NS_SOAP12: &str = "http://www.w3.org/2003/05/soap-envelope";

pub const NS_WSSE10: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
pub const NS_WSSE11: &str = "http://docs.oasis-open.org/wss/oasis-wss-wssecurity-secext-1.1.xsd";
pub const NS_WSU10: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
pub const NS_DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

pub const NS_SAML11: &str = "urn:oasis:names:tc:SAML:1.0:assertion";
pub const NS_SAML20: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// WS-SecurityPolicy 1.1
pub const NS_SP11: &str = "http://schemas.xmlsoap.org/ws/2005/07/securitypolicy";
/// WS-SecurityPolicy 1.2
pub const NS_SP12: &str = "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702";

/// External reference covering every MIME attachment of the message.
pub const ATTACHMENTS_REFERENCE: &str = "cid:Attachments";

/// Local name used by header selectors that match any element in a namespace.
pub const WILDCARD: &str = "*";

// =============================================================================
// QNAME
// =============================================================================

/// An XML qualified name (`{namespace}local`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    pub namespace: String,
    pub local_part: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    /// Name of a policy assertion living in the same namespace as `self`.
    pub fn sibling(&self, local_part: &str) -> Self {
        Self::new(self.namespace.clone(), local_part)
    }

    pub fn is_wildcard(&self) -> bool {
        self.local_part == WILDCARD
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_part)
    }
}

// =============================================================================
// WELL-KNOWN ELEMENTS
// =============================================================================

pub fn timestamp() -> QName {
    QName::new(NS_WSU10, "Timestamp")
}

pub fn signature() -> QName {
    QName::new(NS_DSIG, "Signature")
}

pub fn signature_confirmation() -> QName {
    QName::new(NS_WSSE11, "SignatureConfirmation")
}

pub fn binary_security_token() -> QName {
    QName::new(NS_WSSE10, "BinarySecurityToken")
}

pub fn saml11_assertion() -> QName {
    QName::new(NS_SAML11, "Assertion")
}

pub fn saml20_assertion() -> QName {
    QName::new(NS_SAML20, "Assertion")
}

// =============================================================================
// POLICY ASSERTION LOCAL NAMES
// =============================================================================

/// Local names of the WS-SecurityPolicy assertions reported by the planner.
pub mod assertions {
    pub const ASYMMETRIC_BINDING: &str = "AsymmetricBinding";
    pub const SIGN_BEFORE_ENCRYPTING: &str = "SignBeforeEncrypting";
    pub const ENCRYPT_BEFORE_SIGNING: &str = "EncryptBeforeSigning";
    pub const ENCRYPT_SIGNATURE: &str = "EncryptSignature";
    pub const PROTECT_TOKENS: &str = "ProtectTokens";
    pub const ONLY_SIGN_ENTIRE_HEADERS_AND_BODY: &str = "OnlySignEntireHeadersAndBody";
    pub const INCLUDE_TIMESTAMP: &str = "IncludeTimestamp";
    pub const LAYOUT: &str = "Layout";
    pub const ALGORITHM_SUITE: &str = "AlgorithmSuite";

    pub const SIGNED_PARTS: &str = "SignedParts";
    pub const SIGNED_ELEMENTS: &str = "SignedElements";
    pub const ENCRYPTED_PARTS: &str = "EncryptedParts";
    pub const ENCRYPTED_ELEMENTS: &str = "EncryptedElements";
    pub const CONTENT_ENCRYPTED_ELEMENTS: &str = "ContentEncryptedElements";

    pub const WSS10: &str = "Wss10";
    pub const WSS11: &str = "Wss11";
    pub const MUST_SUPPORT_REF_KEY_IDENTIFIER: &str = "MustSupportRefKeyIdentifier";
    pub const MUST_SUPPORT_REF_ISSUER_SERIAL: &str = "MustSupportRefIssuerSerial";
    pub const MUST_SUPPORT_REF_THUMBPRINT: &str = "MustSupportRefThumbprint";
    pub const REQUIRE_SIGNATURE_CONFIRMATION: &str = "RequireSignatureConfirmation";

    pub const TRUST10: &str = "Trust10";
    pub const TRUST13: &str = "Trust13";
    pub const MUST_SUPPORT_CLIENT_CHALLENGE: &str = "MustSupportClientChallenge";
    pub const MUST_SUPPORT_SERVER_CHALLENGE: &str = "MustSupportServerChallenge";
    pub const REQUIRE_CLIENT_ENTROPY: &str = "RequireClientEntropy";
    pub const REQUIRE_SERVER_ENTROPY: &str = "RequireServerEntropy";
    pub const MUST_SUPPORT_ISSUED_TOKENS: &str = "MustSupportIssuedTokens";
    pub const REQUIRE_REQUEST_SECURITY_TOKEN_COLLECTION: &str =
        "RequireRequestSecurityTokenCollection";
    pub const REQUIRE_APPLIES_TO: &str = "RequireAppliesTo";
    pub const SCOPE_POLICY_15: &str = "ScopePolicy15";
    pub const MUST_SUPPORT_INTERACTIVE_CHALLENGE: &str = "MustSupportInteractiveChallenge";

    pub const INITIATOR_TOKEN: &str = "InitiatorToken";
    pub const INITIATOR_SIGNATURE_TOKEN: &str = "InitiatorSignatureToken";
    pub const INITIATOR_ENCRYPTION_TOKEN: &str = "InitiatorEncryptionToken";
    pub const RECIPIENT_TOKEN: &str = "RecipientToken";
    pub const RECIPIENT_SIGNATURE_TOKEN: &str = "RecipientSignatureToken";
    pub const RECIPIENT_ENCRYPTION_TOKEN: &str = "RecipientEncryptionToken";
}
