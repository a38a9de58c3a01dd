//! Static Token Sources
//!
//! Fixed-answer implementations of the issuance and supporting-token ports
//! for endpoints that do not use them (the defaults) or that are configured
//! with pre-obtained tokens.

use crate::domain::entities::{SecurityToken, SupportingToken};
use crate::domain::errors::{IssuedTokenError, SupportingTokenError};
use crate::ports::outbound::{IssuedTokenSource, SupportingTokenProvider};
use shared_policy::{IssuedToken, Role};

/// Issuance source that hands out one pre-obtained token.
#[derive(Clone, Debug, Default)]
pub struct StaticIssuedTokenSource {
    token: Option<SecurityToken>,
}

impl StaticIssuedTokenSource {
    pub fn new(token: SecurityToken) -> Self {
        Self { token: Some(token) }
    }

    /// Source with no token; issued-token policies fail to resolve.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl IssuedTokenSource for StaticIssuedTokenSource {
    fn security_token(
        &self,
        _policy: &IssuedToken,
    ) -> Result<Option<SecurityToken>, IssuedTokenError> {
        Ok(self.token.clone())
    }
}

/// Supporting tokens attached to messages of a given role.
#[derive(Clone, Debug, Default)]
pub struct StaticSupportingTokens {
    requestor: Vec<SupportingToken>,
    responder: Vec<SupportingToken>,
}

impl StaticSupportingTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, role: Role, token: SupportingToken) -> Self {
        match role {
            Role::Requestor => self.requestor.push(token),
            Role::Responder => self.responder.push(token),
        }
        self
    }
}

impl SupportingTokenProvider for StaticSupportingTokens {
    fn supporting_tokens(&self, role: Role) -> Result<Vec<SupportingToken>, SupportingTokenError> {
        Ok(match role {
            Role::Requestor => self.requestor.clone(),
            Role::Responder => self.responder.clone(),
        })
    }
}
