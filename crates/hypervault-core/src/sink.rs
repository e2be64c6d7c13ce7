//! Sink trait for outbound Core actions and system-address transfers.
//!
//! The bridge and trading components never talk to Core directly; they hand
//! an [`Outbound`] to a `CoreSink`. This allows for:
//! - Unit testing with a recording implementation
//! - Separating action construction from the transport that emits it
//!
//! A successful submission only means the action left the vault. Settlement
//! on Core is never observable through this trait.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::action::Outbound;

/// Result of handing an outbound item to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Accepted for emission. The id is sink-local.
    Submitted { submission_id: u64 },
    /// Refused before emission; nothing left the vault.
    Rejected(String),
}

impl SubmitResult {
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitResult::Submitted { .. })
    }
}

/// Trait for emitting outbound items.
pub trait CoreSink: Send + Sync {
    fn submit(&self, outbound: Outbound) -> SubmitResult;
}

/// Arc wrapper for CoreSink trait objects.
pub type DynCoreSink = Arc<dyn CoreSink>;

/// Sink that records every accepted submission.
///
/// Used by tests and by dry-run tooling. Individual attempts can be
/// configured to be rejected.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Accepted submissions in order.
    submissions: parking_lot::Mutex<Vec<Outbound>>,
    /// Zero-based attempt indices that will be rejected.
    reject_attempts: parking_lot::Mutex<HashSet<u64>>,
    /// Reject everything while set.
    reject_all: std::sync::atomic::AtomicBool,
    attempts: AtomicU64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`-th attempt (zero-based, counted across all submissions).
    pub fn reject_attempt(&self, n: u64) {
        self.reject_attempts.lock().insert(n);
    }

    /// Reject every attempt until cleared.
    pub fn set_reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }

    /// Accepted submissions.
    pub fn submissions(&self) -> Vec<Outbound> {
        self.submissions.lock().clone()
    }

    /// Total attempts, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.submissions.lock().clear();
    }
}

impl CoreSink for RecordingSink {
    fn submit(&self, outbound: Outbound) -> SubmitResult {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject_all.load(Ordering::SeqCst) || self.reject_attempts.lock().contains(&attempt)
        {
            return SubmitResult::Rejected(format!("attempt {attempt} rejected"));
        }

        let mut submissions = self.submissions.lock();
        submissions.push(outbound);
        SubmitResult::Submitted {
            submission_id: submissions.len() as u64,
        }
    }
}
