//! Action Sequencer
//!
//! Accumulates cryptographic actions in a staging sequence while the planner
//! runs, then produces the immutable [`ActionList`] in one final pass.
//!
//! Ordering rules:
//! - a signature is inserted immediately before the first Kerberos action,
//!   otherwise appended
//! - custom-token actions may be staged any number of times; finalization
//!   removes them all and appends exactly one at the end

use crate::domain::entities::{ActionList, CryptoAction};
use crate::domain::value_objects::KeyDerivation;

/// Per-message staging sequence. Never shared between plans.
#[derive(Debug, Default)]
pub struct ActionSequencer {
    staged: Vec<CryptoAction>,
    /// Position of the signature queued by `insert_signature`, kept in step
    /// with every insert and removal.
    primary_signature: Option<usize>,
}

impl ActionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the primary signature ahead of any Kerberos action.
    pub fn insert_signature(&mut self, kind: KeyDerivation) -> CryptoAction {
        let action = CryptoAction::signature(kind);
        let index = self.insert_before_kerberos(action);
        self.primary_signature = Some(index);
        action
    }

    pub fn add_encrypt(&mut self, kind: KeyDerivation) -> CryptoAction {
        let action = CryptoAction::encrypt(kind);
        self.staged.push(action);
        action
    }

    /// Append `action`. Signatures still honour the Kerberos rule.
    pub fn add(&mut self, action: CryptoAction) {
        if action.is_signature() {
            self.insert_before_kerberos(action);
        } else {
            self.staged.push(action);
        }
    }

    fn insert_before_kerberos(&mut self, action: CryptoAction) -> usize {
        let index = self
            .staged
            .iter()
            .position(|a| *a == CryptoAction::Kerberos)
            .unwrap_or(self.staged.len());
        self.insert_at(index, action);
        index
    }

    fn insert_at(&mut self, index: usize, action: CryptoAction) {
        if let Some(primary) = self.primary_signature.as_mut() {
            if index <= *primary {
                *primary += 1;
            }
        }
        self.staged.insert(index, action);
    }

    fn remove_at(&mut self, index: usize) -> CryptoAction {
        self.primary_signature = match self.primary_signature {
            Some(primary) if primary == index => None,
            Some(primary) if primary > index => Some(primary - 1),
            other => other,
        };
        self.staged.remove(index)
    }

    pub fn contains(&self, action: CryptoAction) -> bool {
        self.staged.contains(&action)
    }

    pub fn staged(&self) -> &[CryptoAction] {
        &self.staged
    }

    /// Remove the primary signature, returning the index it held.
    pub fn remove_primary_signature(&mut self) -> Option<usize> {
        let index = self.primary_signature?;
        self.remove_at(index);
        Some(index)
    }

    /// Move the first staged `action` to `index` of the sequence without it
    /// (clamped to the end).
    pub fn move_to(&mut self, action: CryptoAction, index: usize) -> bool {
        let Some(current) = self.staged.iter().position(|a| *a == action) else {
            return false;
        };
        let moved = self.remove_at(current);
        self.insert_at(index.min(self.staged.len()), moved);
        true
    }

    /// Move the first staged `action` directly after the last action that
    /// matches `anchor`. Returns `false` (sequence unchanged) when either is
    /// missing.
    pub fn move_after_last<F>(&mut self, action: CryptoAction, anchor: F) -> bool
    where
        F: Fn(CryptoAction) -> bool,
    {
        let Some(current) = self.staged.iter().position(|a| *a == action) else {
            return false;
        };
        let moved = self.remove_at(current);
        match self.staged.iter().rposition(|a| anchor(*a)) {
            Some(anchor_index) => {
                self.insert_at(anchor_index + 1, moved);
                true
            }
            None => {
                self.insert_at(current, moved);
                false
            }
        }
    }

    /// Replace the primary signature with the staged `action`, which is
    /// reinserted at the index the signature held. Returns `false` when
    /// either is missing.
    pub fn fold_primary_signature_into(&mut self, action: CryptoAction) -> bool {
        if !self.contains(action) {
            return false;
        }
        match self.remove_primary_signature() {
            Some(index) => self.move_to(action, index),
            None => false,
        }
    }

    /// Single reordering pass: every staged custom token is removed and one
    /// is appended at the end if any was staged.
    pub fn finalize_custom_token_ordering(self) -> ActionList {
        let mut custom_token = false;
        let mut actions: Vec<CryptoAction> = self
            .staged
            .into_iter()
            .filter(|a| {
                let is_custom = *a == CryptoAction::CustomToken;
                custom_token |= is_custom;
                !is_custom
            })
            .collect();

        if custom_token {
            actions.push(CryptoAction::CustomToken);
        }

        ActionList::from_staged(actions)
    }
}
