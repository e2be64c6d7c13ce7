//! Settlement tickets.
//!
//! A submission to Core cannot be confirmed within the call that makes it.
//! Each one opens a ticket in `Submitted`; the caller moves it to
//! `Reconciled` or `Failed` after checking external state. Nothing in this
//! crate resolves a ticket on its own.

use crate::error::{BridgeError, BridgeResult};
use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use hypervault_core::BridgeTransfer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ticket lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Submitted,
    Reconciled,
    Failed,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Reconciled => write!(f, "reconciled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What the caller observed when checking external state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Settled,
    Failed { reason: String },
}

/// One submitted bridge movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTicket {
    pub id: u64,
    pub transfer: BridgeTransfer,
    /// Sink-local id of the submission.
    pub submission_id: u64,
    /// Final recipient for withdrawals.
    pub destination: Option<Address>,
    pub status: SettlementStatus,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}

impl SettlementTicket {
    pub fn is_pending(&self) -> bool {
        self.status == SettlementStatus::Submitted
    }
}

/// All tickets opened by one controller.
#[derive(Debug, Clone, Default)]
pub struct SettlementBook {
    next_id: u64,
    tickets: BTreeMap<u64, SettlementTicket>,
}

impl SettlementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a ticket in `Submitted`.
    pub fn open(
        &mut self,
        transfer: BridgeTransfer,
        submission_id: u64,
        destination: Option<Address>,
    ) -> SettlementTicket {
        self.next_id += 1;
        let ticket = SettlementTicket {
            id: self.next_id,
            transfer,
            submission_id,
            destination,
            status: SettlementStatus::Submitted,
            submitted_at: Utc::now(),
            resolved_at: None,
            failure_reason: None,
        };
        self.tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    pub fn get(&self, id: u64) -> Option<&SettlementTicket> {
        self.tickets.get(&id)
    }

    /// Tickets still awaiting reconciliation, oldest first.
    pub fn pending(&self) -> Vec<&SettlementTicket> {
        self.tickets.values().filter(|t| t.is_pending()).collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &SettlementTicket> {
        self.tickets.values()
    }

    /// Move a `Submitted` ticket to its final status.
    pub fn resolve(&mut self, id: u64, outcome: &SettlementOutcome) -> BridgeResult<SettlementTicket> {
        let ticket = self
            .tickets
            .get_mut(&id)
            .ok_or(BridgeError::UnknownTicket(id))?;
        if !ticket.is_pending() {
            return Err(BridgeError::TicketAlreadyResolved {
                id,
                status: ticket.status,
            });
        }

        match outcome {
            SettlementOutcome::Settled => ticket.status = SettlementStatus::Reconciled,
            SettlementOutcome::Failed { reason } => {
                ticket.status = SettlementStatus::Failed;
                ticket.failure_reason = Some(reason.clone());
            }
        }
        ticket.resolved_at = Some(Utc::now());
        Ok(ticket.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypervault_core::{TokenConfig, TransferDirection};

    fn transfer() -> BridgeTransfer {
        BridgeTransfer {
            token: TokenConfig::new("USDC", Address::repeat_byte(1), 6, 0, 8),
            amount_scaled: 1_000_000,
            direction: TransferDirection::EvmToCore,
        }
    }

    #[test]
    fn test_open_assigns_sequential_ids() {
        let mut book = SettlementBook::new();
        let a = book.open(transfer(), 1, None);
        let b = book.open(transfer(), 2, None);
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.status, SettlementStatus::Submitted);
        assert_eq!(book.pending().len(), 2);
    }

    #[test]
    fn test_resolve_settled() {
        let mut book = SettlementBook::new();
        let ticket = book.open(transfer(), 1, None);
        let resolved = book.resolve(ticket.id, &SettlementOutcome::Settled).unwrap();
        assert_eq!(resolved.status, SettlementStatus::Reconciled);
        assert!(resolved.resolved_at.is_some());
        assert!(book.pending().is_empty());
    }

    #[test]
    fn test_resolve_failed_records_reason() {
        let mut book = SettlementBook::new();
        let ticket = book.open(transfer(), 1, None);
        let resolved = book
            .resolve(
                ticket.id,
                &SettlementOutcome::Failed {
                    reason: "not credited".to_string(),
                },
            )
            .unwrap();
        assert_eq!(resolved.status, SettlementStatus::Failed);
        assert_eq!(resolved.failure_reason.as_deref(), Some("not credited"));
    }

    #[test]
    fn test_resolve_twice_rejected() {
        let mut book = SettlementBook::new();
        let ticket = book.open(transfer(), 1, None);
        book.resolve(ticket.id, &SettlementOutcome::Settled).unwrap();
        assert!(matches!(
            book.resolve(ticket.id, &SettlementOutcome::Settled),
            Err(BridgeError::TicketAlreadyResolved {
                status: SettlementStatus::Reconciled,
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_unknown() {
        let mut book = SettlementBook::new();
        assert!(matches!(
            book.resolve(42, &SettlementOutcome::Settled),
            Err(BridgeError::UnknownTicket(42))
        ));
    }
}
