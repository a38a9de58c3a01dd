//! Domain invariants for protection plans
//!
//! Checked in debug builds when a plan is finalized and exercised directly
//! by the property tests.

use super::entities::{CryptoAction, ProtectionPlan};

/// Every signature action precedes the first Kerberos action.
pub fn invariant_signature_before_kerberos(actions: &[CryptoAction]) -> bool {
    let first_kerberos = actions.iter().position(|a| *a == CryptoAction::Kerberos);
    let last_signature = actions.iter().rposition(|a| a.is_signature());

    match (last_signature, first_kerberos) {
        (Some(signature), Some(kerberos)) => signature < kerberos,
        _ => true,
    }
}

/// Sign-then-encrypt: no encryption is queued ahead of the last signature.
pub fn invariant_encrypt_after_signatures(actions: &[CryptoAction]) -> bool {
    let Some(last_signature) = actions.iter().rposition(|a| a.is_signature()) else {
        return true;
    };
    !actions[..last_signature].iter().any(|a| a.is_encrypt())
}

/// At most one custom-token action, and only in last position.
pub fn invariant_custom_token_last(actions: &[CryptoAction]) -> bool {
    let count = actions
        .iter()
        .filter(|a| **a == CryptoAction::CustomToken)
        .count();

    match count {
        0 => true,
        1 => actions.last() == Some(&CryptoAction::CustomToken),
        _ => false,
    }
}

/// Regions are only listed for operations that were actually planned.
///
/// A signed SAML assertion that absorbed the primary signature still signs
/// the signed regions.
pub fn invariant_regions_have_actions(plan: &ProtectionPlan) -> bool {
    let signs = plan.actions.has_signature() || plan.actions.contains(CryptoAction::SamlTokenSigned);
    let signed_ok = plan.signed_regions.is_empty() || signs;
    let encrypted_ok = plan.encrypted_regions.is_empty() || plan.actions.has_encrypt();

    signed_ok && encrypted_ok
}
