//! Token-Store Credential Resolver
//!
//! Decorates an ambient `CredentialResolver` so that tokens stored during
//! planning are found first. Built per `secure` call when the plan's
//! credential strategy is `TokenStoreBacked`.

use crate::domain::entities::Credential;
use crate::ports::outbound::{CredentialResolver, TokenStore};

pub struct TokenStoreCredentialResolver<'a> {
    inner: &'a dyn CredentialResolver,
    store: &'a dyn TokenStore,
}

impl<'a> TokenStoreCredentialResolver<'a> {
    pub fn new(inner: &'a dyn CredentialResolver, store: &'a dyn TokenStore) -> Self {
        Self { inner, store }
    }
}

impl CredentialResolver for TokenStoreCredentialResolver<'_> {
    fn resolve(&self, id: &str) -> Option<Credential> {
        self.store
            .lookup(id)
            .map(Credential::from)
            .or_else(|| self.inner.resolve(id))
    }
}
