//! Contribution submission state machine.
//!
//! The controller is owned by a single event loop. User intents (`set_amount`,
//! `submit`, connect/switch requests) are applied synchronously; the contribution
//! itself runs as a spawned task whose outcome comes back through an internal
//! channel and is applied by [`SubmissionController::next_event`] or
//! [`SubmissionController::pump`]. The controller must be driven from inside a
//! Tokio runtime.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::amount::{ContributionAmount, ValidationError};
use super::fee::FeeSplit;
use super::gate::{self, GateStatus, PreconditionError, TARGET_CHAIN_ID};
use crate::api::{ContributionError, ContributionService};
use crate::wallet::Wallet;

/// How long the success banner stays up before the form resets.
pub const RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("transaction failed")]
    TransactionFailed,
}

/// Inline failure shown under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Validation(ValidationError),
    Submission(SubmissionError),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Validation(err) => write!(f, "{err}"),
            FailureReason::Submission(err) => write!(f, "{err}"),
        }
    }
}

/// What the user sees. Wallet readiness always takes priority over the
/// controller's own progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    NoWallet,
    WrongNetwork,
    Idle,
    Processing,
    Success,
    Failed(FailureReason),
}

/// Result of a submit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The contribution is in flight.
    Started,
    /// The amount failed validation; nothing was sent.
    Rejected(ValidationError),
    /// Wallet or network is not ready; nothing was sent.
    Blocked(PreconditionError),
    /// A contribution is already in flight or the success banner is showing.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Processing,
    Success,
    Failed(FailureReason),
}

#[derive(Debug)]
enum ControllerEvent {
    Settled {
        attempt: u64,
        result: Result<(), ContributionError>,
    },
    ResetElapsed {
        generation: u64,
    },
}

/// Pending success-to-idle reset. Dropping it cancels the timer.
struct ScheduledReset {
    generation: u64,
    handle: JoinHandle<()>,
}

impl ScheduledReset {
    fn start(generation: u64, delay: Duration, events: UnboundedSender<ControllerEvent>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(ControllerEvent::ResetElapsed { generation });
        });
        Self { generation, handle }
    }
}

impl Drop for ScheduledReset {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Read-only view of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: SubmissionState,
    pub amount_input: String,
    pub preview: Result<FeeSplit, ValidationError>,
    pub account: Option<String>,
    pub chain_id: Option<u64>,
    pub connecting: bool,
    pub submit_enabled: bool,
}

type SuccessCallback = Box<dyn FnMut() + Send>;

pub struct SubmissionController {
    wallet: Arc<dyn Wallet>,
    contributions: Arc<dyn ContributionService>,
    campaign_id: String,
    on_success: Option<SuccessCallback>,
    amount_input: String,
    phase: Phase,
    attempt: u64,
    reset: Option<ScheduledReset>,
    reset_generation: u64,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
}

impl SubmissionController {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        contributions: Arc<dyn ContributionService>,
        campaign_id: impl Into<String>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = Self {
            wallet,
            contributions,
            campaign_id: campaign_id.into(),
            on_success: None,
            amount_input: String::new(),
            phase: Phase::Idle,
            attempt: 0,
            reset: None,
            reset_generation: 0,
            events_tx,
            events_rx,
        };
        debug!(
            campaign_id = %controller.campaign_id,
            state = ?controller.state(),
            "submission controller mounted"
        );
        controller
    }

    /// Invoked once each time a successful contribution resets back to idle.
    pub fn on_success(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn set_amount(&mut self, raw: impl Into<String>) {
        self.amount_input = raw.into();
    }

    /// Live fee preview for the current input.
    pub fn preview(&self) -> Result<FeeSplit, ValidationError> {
        ContributionAmount::parse(&self.amount_input).map(FeeSplit::for_amount)
    }

    /// Current gate result, read from the wallet on every call.
    pub fn gate(&self) -> GateStatus {
        gate::evaluate(&self.wallet.identity())
    }

    pub fn state(&self) -> SubmissionState {
        match self.gate() {
            GateStatus::Blocked(PreconditionError::NoWallet) => SubmissionState::NoWallet,
            GateStatus::Blocked(PreconditionError::WrongNetwork) => SubmissionState::WrongNetwork,
            GateStatus::Ready { .. } => match self.phase {
                Phase::Idle => SubmissionState::Idle,
                Phase::Processing => SubmissionState::Processing,
                Phase::Success => SubmissionState::Success,
                Phase::Failed(reason) => SubmissionState::Failed(reason),
            },
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let identity = self.wallet.identity();
        Snapshot {
            state: self.state(),
            amount_input: self.amount_input.clone(),
            preview: self.preview(),
            account: identity.account_address,
            chain_id: identity.chain_id,
            connecting: self.wallet.is_connecting(),
            submit_enabled: self.can_submit(),
        }
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.state(),
            SubmissionState::Idle | SubmissionState::Failed(_)
        )
    }

    /// Ask the wallet to connect. Only honoured while no wallet is connected.
    pub fn request_connect(&self) -> bool {
        if self.state() != SubmissionState::NoWallet {
            return false;
        }
        self.wallet.request_connect();
        true
    }

    /// Ask the wallet to move to the target chain. Only honoured on the wrong network.
    pub fn request_network_switch(&self) -> bool {
        if self.state() != SubmissionState::WrongNetwork {
            return false;
        }
        self.wallet.request_network_switch(TARGET_CHAIN_ID);
        true
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let account = match self.gate() {
            GateStatus::Ready { account } => account,
            GateStatus::Blocked(err) => {
                debug!(reason = %err, "submit blocked by wallet precondition");
                return SubmitOutcome::Blocked(err);
            }
        };

        if matches!(self.phase, Phase::Processing | Phase::Success) {
            debug!(phase = ?self.phase, "submit ignored");
            return SubmitOutcome::Ignored;
        }

        let amount = match ContributionAmount::parse(&self.amount_input) {
            Ok(amount) => amount,
            Err(err) => {
                self.transition(Phase::Failed(FailureReason::Validation(err)));
                return SubmitOutcome::Rejected(err);
            }
        };

        self.attempt += 1;
        self.transition(Phase::Processing);
        info!(
            campaign_id = %self.campaign_id,
            %amount,
            from = %account,
            attempt = self.attempt,
            "submitting contribution"
        );

        let contributions = Arc::clone(&self.contributions);
        let campaign_id = self.campaign_id.clone();
        let events = self.events_tx.clone();
        let attempt = self.attempt;
        tokio::spawn(async move {
            // Run the backend in its own task so a panic still settles the attempt.
            let work = tokio::spawn(async move {
                contributions
                    .submit_contribution(&campaign_id, amount, &account)
                    .await
            });
            let result = match work.await {
                Ok(result) => result,
                Err(err) => Err(ContributionError::Interrupted(err.to_string())),
            };
            let _ = events.send(ControllerEvent::Settled { attempt, result });
        });

        SubmitOutcome::Started
    }

    /// True while a contribution is in flight or a reset is scheduled.
    pub fn has_pending_work(&self) -> bool {
        self.phase == Phase::Processing || self.reset.is_some()
    }

    /// Wait for the next internal event and apply it.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn next_event(&mut self) -> Option<SubmissionState> {
        if !self.has_pending_work() {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.apply(event);
        Some(self.state())
    }

    /// Apply every event that has already arrived, without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Tear the controller down, cancelling any scheduled reset.
    pub fn teardown(self) {
        drop(self);
    }

    fn apply(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Settled { attempt, result } => {
                if attempt != self.attempt || self.phase != Phase::Processing {
                    debug!(attempt, "discarding stale settlement");
                    return;
                }
                match result {
                    Ok(()) => {
                        info!(campaign_id = %self.campaign_id, attempt, "contribution succeeded");
                        self.amount_input.clear();
                        self.transition(Phase::Success);
                        self.schedule_reset();
                    }
                    Err(err) => {
                        // Detail stays in the logs; the user only sees the generic message.
                        warn!(
                            campaign_id = %self.campaign_id,
                            attempt,
                            error = %err,
                            "contribution failed"
                        );
                        self.transition(Phase::Failed(FailureReason::Submission(
                            SubmissionError::TransactionFailed,
                        )));
                    }
                }
            }
            ControllerEvent::ResetElapsed { generation } => {
                if self.reset.as_ref().map(|r| r.generation) != Some(generation) {
                    debug!(generation, "discarding stale reset");
                    return;
                }
                self.reset = None;
                if self.phase == Phase::Success {
                    self.transition(Phase::Idle);
                    if let Some(callback) = self.on_success.as_mut() {
                        callback();
                    }
                }
            }
        }
    }

    fn schedule_reset(&mut self) {
        self.reset_generation += 1;
        self.reset = Some(ScheduledReset::start(
            self.reset_generation,
            RESET_DELAY,
            self.events_tx.clone(),
        ));
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "submission phase");
        self.phase = next;
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if self.reset.take().is_some() {
            debug!(campaign_id = %self.campaign_id, "cancelled pending reset on teardown");
        }
    }
}
