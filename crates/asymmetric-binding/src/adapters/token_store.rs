//! In-Memory Token Store Adapter
//!
//! Implements the `TokenStore` port with a first-writer-wins map.

use crate::domain::entities::SecurityToken;
use crate::domain::errors::TokenStoreError;
use crate::ports::outbound::TokenStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Process-local token store.
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, SecurityToken>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn store(&self, id: &str, token: SecurityToken) -> Result<bool, TokenStoreError> {
        if id.is_empty() {
            return Err(TokenStoreError::InvalidIdentifier(id.to_string()));
        }

        let mut tokens = self.tokens.write();
        if tokens.contains_key(id) {
            debug!(token_id = id, "Token already stored, keeping first copy");
            return Ok(false);
        }
        tokens.insert(id.to_string(), token);
        debug!(token_id = id, "Token stored");
        Ok(true)
    }

    fn lookup(&self, id: &str) -> Option<SecurityToken> {
        self.tokens.read().get(id).cloned()
    }
}
