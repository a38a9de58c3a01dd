//! Configuration for the asymmetric binding planner
//!
//! Endpoint-level settings live in [`PlannerConfig`]; each message carries a
//! [`MessageContext`] whose properties override the endpoint's.

use crate::domain::value_objects::SoapVersion;
use serde::{Deserialize, Serialize};
use shared_policy::Role;

/// Encryption user value that selects the certificate which signed the request.
pub const USE_REQ_SIG_CERT: &str = "useReqSigCert";

/// Contextual security properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityProperties {
    /// Replaces the suite's asymmetric signature algorithm.
    pub asymmetric_signature_algorithm: Option<String>,
    pub username: Option<String>,
    pub signature_username: Option<String>,
    pub encrypt_username: Option<String>,
    /// Whether a SAML callback is available to produce assertions.
    pub saml_callback_configured: Option<bool>,
}

impl SecurityProperties {
    /// `self` where set, `fallback` otherwise.
    pub fn overlay(&self, fallback: &SecurityProperties) -> SecurityProperties {
        SecurityProperties {
            asymmetric_signature_algorithm: self
                .asymmetric_signature_algorithm
                .clone()
                .or_else(|| fallback.asymmetric_signature_algorithm.clone()),
            username: self.username.clone().or_else(|| fallback.username.clone()),
            signature_username: self
                .signature_username
                .clone()
                .or_else(|| fallback.signature_username.clone()),
            encrypt_username: self
                .encrypt_username
                .clone()
                .or_else(|| fallback.encrypt_username.clone()),
            saml_callback_configured: self
                .saml_callback_configured
                .or(fallback.saml_callback_configured),
        }
    }

    pub fn has_saml_callback(&self) -> bool {
        self.saml_callback_configured.unwrap_or(false)
    }

    /// Signature user: signature-username, else username.
    pub fn signature_user(&self) -> Option<String> {
        self.signature_username
            .clone()
            .or_else(|| self.username.clone())
    }

    /// Encryption user: encrypt-username, else username.
    pub fn encryption_user(&self) -> Option<String> {
        self.encrypt_username
            .clone()
            .or_else(|| self.username.clone())
    }
}

/// Planner configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub properties: SecurityProperties,
    /// Used when the message does not state its SOAP version.
    pub soap_version: SoapVersion,
    /// Run structural binding validation before planning.
    pub validate_binding: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            properties: SecurityProperties::default(),
            soap_version: SoapVersion::Soap11,
            validate_binding: true,
        }
    }
}

/// Per-message inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub role: Role,
    #[serde(default)]
    pub soap_version: Option<SoapVersion>,
    /// A timestamp was inserted into the security header earlier in processing.
    #[serde(default)]
    pub timestamp_added: bool,
    #[serde(default)]
    pub properties: SecurityProperties,
}

impl MessageContext {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            soap_version: None,
            timestamp_added: false,
            properties: SecurityProperties::default(),
        }
    }

    pub fn requestor() -> Self {
        Self::new(Role::Requestor)
    }

    pub fn responder() -> Self {
        Self::new(Role::Responder)
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp_added = true;
        self
    }

    pub fn with_soap_version(mut self, soap_version: SoapVersion) -> Self {
        self.soap_version = Some(soap_version);
        self
    }

    pub fn with_properties(mut self, properties: SecurityProperties) -> Self {
        self.properties = properties;
        self
    }
}
