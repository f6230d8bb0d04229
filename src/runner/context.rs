//! Per-run execution context shared by all workers.

use std::sync::Arc;
use tokio::time::Instant;

use crate::client::LedgerApi;
use crate::model::Participant;

use super::pending::PendingQueue;

/// A transfer the ledger accepted a prepare for, awaiting a later lookup.
///
/// Consumed at most once, and never before `created_at + 2s`.
#[derive(Debug, Clone)]
pub struct PendingPrepare {
    pub created_at: Instant,
    pub payer: String,
    pub payee: String,
    pub transfer_id: String,
}

/// Marker for a plain prepare awaiting its commit leg.
///
/// Reserved sink: pushed by plain prepares, never drained.
#[derive(Debug, Clone)]
pub struct DeferredFulfil {
    pub created_at: Instant,
    pub transfer_id: String,
}

/// Explicitly constructed, injectable state for one load-test run.
///
/// The two pending-work queues are the only mutable state shared across
/// workers; roster and API handle are read-only. Lifecycle is tied to the
/// orchestrator's setup/teardown, so independent runs in one process never
/// see each other's state.
pub struct ExecutionContext {
    api: Arc<dyn LedgerApi>,
    target: String,
    participants: Vec<Participant>,
    reconcile_currency: bool,
    pub(crate) prepares: PendingQueue<PendingPrepare>,
    pub(crate) awaiting_commit: PendingQueue<DeferredFulfil>,
}

impl ExecutionContext {
    pub fn new(
        api: Arc<dyn LedgerApi>,
        target: &str,
        participants: Vec<Participant>,
        reconcile_currency: bool,
        queue_capacity: usize,
    ) -> Self {
        Self {
            api,
            target: target.to_string(),
            participants,
            reconcile_currency,
            prepares: PendingQueue::new(queue_capacity),
            awaiting_commit: PendingQueue::new(queue_capacity),
        }
    }

    pub fn api(&self) -> &dyn LedgerApi {
        self.api.as_ref()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn reconcile_currency(&self) -> bool {
        self.reconcile_currency
    }

    pub fn pending_prepares(&self) -> usize {
        self.prepares.len()
    }

    pub fn dropped_prepares(&self) -> u64 {
        self.prepares.dropped()
    }

    pub fn awaiting_commit_len(&self) -> usize {
        self.awaiting_commit.len()
    }

    /// Empties both queues between runs.
    pub fn clear(&self) {
        self.prepares.clear();
        self.awaiting_commit.clear();
    }

    /// Teardown: clears queues and releases the transport pool. Safe to
    /// call once per run; in-flight pops may be lost, which is accepted.
    pub fn close(&self) {
        self.clear();
        self.api.close();
    }
}
