//! # Part Selectors
//!
//! `sp:SignedParts`, `sp:SignedElements`, `sp:EncryptedParts`,
//! `sp:EncryptedElements` and `sp:ContentEncryptedElements`, already parsed.
//! Element selectors arrive as resolved element paths; XPath evaluation is
//! not part of this model.

use crate::names::{QName, WILDCARD};
use serde::{Deserialize, Serialize};

/// `sp:Header` selector. A missing name matches every header in the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSelector {
    pub name: Option<String>,
    pub namespace: String,
}

impl HeaderSelector {
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            namespace: namespace.into(),
        }
    }

    pub fn any_in(namespace: impl Into<String>) -> Self {
        Self {
            name: None,
            namespace: namespace.into(),
        }
    }

    pub fn qname(&self) -> QName {
        let local = self.name.as_deref().unwrap_or(WILDCARD);
        QName::new(self.namespace.clone(), local)
    }
}

/// `sp:Attachments` selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsSelector {
    /// Protect attachment content only (content signature transform /
    /// content-only encryption) instead of the complete MIME part.
    pub content_only: bool,
}

/// Body, headers and attachments selected by a parts assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageParts {
    pub body: bool,
    pub headers: Vec<HeaderSelector>,
    pub attachments: Option<AttachmentsSelector>,
}

impl MessageParts {
    pub fn body() -> Self {
        Self {
            body: true,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, header: HeaderSelector) -> Self {
        self.headers.push(header);
        self
    }

    pub fn with_attachments(mut self, attachments: AttachmentsSelector) -> Self {
        self.attachments = Some(attachments);
        self
    }
}

/// Resolved path of an element selector, outermost element first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPath(pub Vec<QName>);

impl ElementPath {
    pub fn new(path: Vec<QName>) -> Self {
        Self(path)
    }

    /// The element the selector designates.
    pub fn target(&self) -> Option<&QName> {
        self.0.last()
    }
}

/// Every part and element selector that applies to a message.
///
/// `None` means the assertion is absent from the policy; `Some` with an empty
/// selection is still asserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartSelectors {
    pub signed_parts: Option<MessageParts>,
    pub signed_elements: Option<Vec<ElementPath>>,
    pub encrypted_parts: Option<MessageParts>,
    pub encrypted_elements: Option<Vec<ElementPath>>,
    pub content_encrypted_elements: Option<Vec<ElementPath>>,
}

impl PartSelectors {
    /// Sign and encrypt the SOAP body, the most common selection.
    pub fn body_only() -> Self {
        Self {
            signed_parts: Some(MessageParts::body()),
            encrypted_parts: Some(MessageParts::body()),
            ..Self::default()
        }
    }
}
