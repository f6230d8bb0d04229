//! Action dispatcher: executes one scripted action against the ledger and
//! populates an outcome record.
//!
//! This is the sole catch point of the harness: whatever a dispatch does,
//! the worker gets back a populated [`SampleOutcome`] and never an error.
//! Prepares feed the pending-prepare queue; lookups drain it, honoring the
//! settlement delay before calling the ledger.

pub mod context;
pub mod outcome;
pub mod pending;
pub mod reconcile;

pub use context::{DeferredFulfil, ExecutionContext, PendingPrepare};
pub use outcome::SampleOutcome;
pub use pending::PendingQueue;

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{Action, Transfer};

/// Minimum age of a prepare before its lookup is expected to succeed.
pub const SETTLEMENT_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct Dispatcher {
    ctx: Arc<ExecutionContext>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<ExecutionContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Executes one scripted action.
    ///
    /// Never fails: any error is converted into a failed outcome with the
    /// normalized cause suffixed onto the response code. The bytes-sent
    /// diagnostic is recorded on every exit path.
    pub async fn run(&self, action: &mut Action, index: u64) -> SampleOutcome {
        let kind = action.kind();
        let mut outcome = SampleOutcome::new(format!("[{}]:[{}]", self.ctx.target(), kind));
        let mut content_to_send = action.request_json().unwrap_or_else(|| "{}".to_string());

        let result = self
            .dispatch(action, &mut outcome, &mut content_to_send, index)
            .await;
        match result {
            Ok(()) => {
                if outcome.response_data.is_empty() {
                    outcome.set_response("Unknown".to_string());
                }
                outcome.response_message = "SUCCESS".to_string();
                outcome.response_code = "200".to_string();
                outcome.success = true;
            }
            Err(err) => {
                outcome.sample_end();
                let message = err.to_string();
                error!("Action '{}' failed: {}", kind, message);
                outcome.set_response(message.clone());
                outcome.response_message = format!("ERROR-EXCEPTION ({}): {}", kind, message);
                outcome.response_code = format!("500-{}", err.code());
                outcome.success = false;
            }
        }

        outcome.sent_bytes = content_to_send.len() as u64;
        outcome.sampler_data = content_to_send;
        outcome
    }

    async fn dispatch(
        &self,
        action: &mut Action,
        outcome: &mut SampleOutcome,
        content_to_send: &mut String,
        index: u64,
    ) -> Result<(), ClientError> {
        match action {
            Action::CreateParticipant { request, response } => {
                outcome.request_headers =
                    header_block("create_participant", "/jmeter/participants/create", index);
                let participant = request.as_ref().ok_or_else(|| {
                    ClientError::FieldValidate("No participant request in test data.".to_string())
                })?;

                outcome.sample_start();
                let created = self.ctx.api().create_participant(participant).await?;
                outcome.sample_end();

                // Create is idempotent by name; the service says which case this was.
                let tag = if created.newly_created {
                    "newly-created"
                } else {
                    "existing"
                };
                outcome.label = format!("{}:[{}]", outcome.label, tag);
                outcome.set_response(encode(&created)?);
                *response = Some(created);
            }

            Action::TransferPrepare { request, response } => {
                self.prepare(request, response, false, outcome, content_to_send, index)
                    .await?;
            }
            Action::TransferPrepareFulfil { request, response } => {
                self.prepare(request, response, true, outcome, content_to_send, index)
                    .await?;
            }

            Action::TransferFulfil { .. } => {
                // Reserved: the commit leg is not replayed yet. No-op completion.
                outcome.request_headers =
                    header_block("transfer_fulfil", "/jmeter/transfers/fulfil", index);
            }

            Action::TransferLookup { response, .. } => {
                outcome.request_headers = header_block(
                    "transfer_lookup",
                    "/jmeter/participants/{name}/transfers/{id}",
                    index,
                );
                let Some(pending) = self.ctx.prepares.pop() else {
                    error!("Please check test data. Expected a valid transfer!");
                    return Err(ClientError::NoResult("No valid cached prepare.".to_string()));
                };
                *content_to_send = format!("{:?}", pending);

                // Settlement delay: suspends only this worker, no lock held.
                sleep_until(pending.created_at + SETTLEMENT_DELAY).await;

                outcome.sample_start();
                let found = self
                    .ctx
                    .api()
                    .transfer_lookup(&pending.payer, &pending.transfer_id)
                    .await?;
                outcome.sample_end();
                outcome.set_response(encode(&found)?);
                *response = Some(found);
            }

            Action::TransferReject { .. } | Action::AccountLookup { .. } => {
                return Err(ClientError::IllegalState(format!(
                    "Action type '{}' not yet supported.",
                    action.kind()
                )));
            }
        }
        Ok(())
    }

    async fn prepare(
        &self,
        request: &mut Option<Transfer>,
        response: &mut Option<Transfer>,
        fulfil: bool,
        outcome: &mut SampleOutcome,
        content_to_send: &mut String,
        index: u64,
    ) -> Result<(), ClientError> {
        let kind = if fulfil {
            "transfer_prepare_fulfil"
        } else {
            "transfer_prepare"
        };
        outcome.request_headers = header_block(kind, "/jmeter/transfers/prepare", index);

        let transfer = request.as_mut().ok_or_else(|| {
            ClientError::FieldValidate("No transfer request in test data.".to_string())
        })?;

        transfer.transfer_id = Some(Uuid::new_v4().to_string());
        transfer.expiration = Some(Utc::now() + chrono::Duration::hours(24));
        transfer.fulfil = fulfil;

        if self.ctx.reconcile_currency() {
            self.reconcile(transfer);
        }

        *content_to_send = encode(transfer)?;

        outcome.sample_start();
        let accepted = self.ctx.api().transfer_prepare(transfer).await?;
        outcome.sample_end();

        let now = Instant::now();
        let transfer_id = transfer.transfer_id.clone().unwrap_or_default();
        let pending = PendingPrepare {
            created_at: now,
            payer: transfer.payer_fsp.clone().unwrap_or_default(),
            payee: transfer.payee_fsp.clone().unwrap_or_default(),
            transfer_id: transfer_id.clone(),
        };
        if !self.ctx.prepares.push(pending) {
            warn!("Pending-prepare queue full; dropped transfer {}.", transfer_id);
        }
        if !fulfil {
            let marker = DeferredFulfil {
                created_at: now,
                transfer_id: transfer_id.clone(),
            };
            if !self.ctx.awaiting_commit.push(marker) {
                warn!("Awaiting-commit queue full; dropped transfer {}.", transfer_id);
            }
        }

        outcome.set_response(encode(&accepted)?);
        *response = Some(accepted);
        Ok(())
    }

    /// Substitutes a currency both sides can settle, when enabled.
    fn reconcile(&self, transfer: &mut Transfer) {
        let Some(amount) = transfer.amount.as_mut() else {
            return;
        };
        let roster = self.ctx.participants();
        let payer = roster
            .iter()
            .find(|p| p.name.is_some() && p.name == transfer.payer_fsp);
        let payee = roster
            .iter()
            .find(|p| p.name.is_some() && p.name == transfer.payee_fsp);
        let (Some(payer), Some(payee)) = (payer, payee) else {
            return;
        };

        if let Some(substitute) =
            reconcile::common_currency(&payer.accounts, &payee.accounts, &amount.currency)
        {
            warn!(
                "Making use of currency [{}] for [{}].",
                substitute,
                transfer.transfer_id.as_deref().unwrap_or("unset")
            );
            amount.currency = substitute;
        }
    }
}

fn header_block(kind: &str, url_postfix: &str, index: u64) -> String {
    format!(
        "Action-Type: {}\nURL: {}\nTest Data Index: {}",
        kind, url_postfix, index
    )
}

fn encode<T: Serialize>(value: &T) -> Result<String, ClientError> {
    serde_json::to_string(value).map_err(|e| ClientError::JsonParsing(e.to_string()))
}
