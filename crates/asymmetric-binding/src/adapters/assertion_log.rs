//! Assertion Log Adapter
//!
//! Implements `AssertionSink` by recording every report, for policy
//! verification after the message has been secured.

use crate::ports::outbound::AssertionSink;
use parking_lot::Mutex;
use shared_policy::QName;
use tracing::debug;

/// An assertion that could not be satisfied, with the reason given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsatisfiedAssertion {
    pub name: QName,
    pub reason: String,
}

#[derive(Default)]
pub struct AssertionLog {
    asserted: Mutex<Vec<QName>>,
    unsatisfied: Mutex<Vec<UnsatisfiedAssertion>>,
}

impl AssertionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every asserted name, in report order (duplicates kept).
    pub fn asserted(&self) -> Vec<QName> {
        self.asserted.lock().clone()
    }

    pub fn is_asserted(&self, name: &QName) -> bool {
        self.asserted.lock().contains(name)
    }

    pub fn assert_count(&self, name: &QName) -> usize {
        self.asserted.lock().iter().filter(|n| *n == name).count()
    }

    pub fn unsatisfied(&self) -> Vec<UnsatisfiedAssertion> {
        self.unsatisfied.lock().clone()
    }
}

impl AssertionSink for AssertionLog {
    fn assert(&self, name: &QName) {
        self.asserted.lock().push(name.clone());
    }

    fn not_asserted(&self, name: &QName, reason: &str) {
        debug!(assertion = %name, reason, "Assertion not satisfied");
        self.unsatisfied.lock().push(UnsatisfiedAssertion {
            name: name.clone(),
            reason: reason.to_string(),
        });
    }
}
