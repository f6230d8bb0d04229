//! ledger-loadgen - Load-generation harness for a central-ledger payment switch
//!
//! Replays scripted financial actions against a target ledger service and
//! records a per-call outcome for an external load-test orchestrator.
//!
//! # Modules
//!
//! - [`config`] - YAML harness configuration (target URL, TLS, switches)
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - `ClientError` taxonomy and the server error envelope
//! - [`model`] - wire/domain types (Participant, Transfer, Action corpus)
//! - [`transport`] - pooled REST transport with normalized failure handling
//! - [`client`] - the five ledger operations behind the `LedgerApi` seam
//! - [`runner`] - action dispatcher, pending-work queues, outcome records

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod runner;
pub mod transport;

// Convenient re-exports at crate root
pub use client::{DfspClient, LedgerApi};
pub use config::{HarnessConfig, TlsSettings};
pub use error::ClientError;
pub use model::{Account, Action, Amount, Extension, Participant, Transfer};
pub use runner::{
    DeferredFulfil, Dispatcher, ExecutionContext, PendingPrepare, PendingQueue, SETTLEMENT_DELAY,
    SampleOutcome,
};
pub use transport::RestTransport;
