//! TUI application state types.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::info;

use crate::api::ContributionService;
use crate::config::Config;
use crate::flow::{self, FormView, SubmissionController};
use crate::wallet::{SimulatedWallet, WalletStatus};

/// Chain the `w` key moves the wallet to, to exercise the wrong-network prompt.
pub(crate) const OFF_TARGET_CHAIN_ID: u64 = 1;

pub(crate) struct AnimationState {
    pub tick: u64,
}

impl AnimationState {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        FRAMES[(self.tick as usize / 6) % FRAMES.len()]
    }
}

pub(crate) struct App {
    pub controller: SubmissionController,
    pub wallet: Arc<SimulatedWallet>,
    pub wallet_rx: watch::Receiver<WalletStatus>,
    pub failure_message: String,
    pub completed: Arc<AtomicUsize>,
    pub last_tick: Instant,
    pub animation: AnimationState,
}

impl App {
    /// Build the app. Must be called inside a Tokio runtime context.
    pub fn new(
        cfg: &Config,
        campaign_id: &str,
        contributions: Arc<dyn ContributionService>,
    ) -> Self {
        let wallet = Arc::new(SimulatedWallet::from_config(&cfg.wallet));
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        let controller = SubmissionController::new(wallet.clone(), contributions, campaign_id)
            .on_success(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        Self {
            controller,
            wallet_rx: wallet.subscribe(),
            wallet,
            failure_message: cfg.ui.failure_message.clone(),
            completed,
            last_tick: Instant::now(),
            animation: AnimationState::new(),
        }
    }

    pub fn view(&self) -> FormView {
        flow::project(&self.controller.snapshot(), &self.failure_message)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Log wallet identity changes made outside the flow.
    pub fn observe_wallet(&mut self) {
        if self.wallet_rx.has_changed().unwrap_or(false) {
            let status = self.wallet_rx.borrow_and_update().clone();
            info!(
                account = ?status.identity.account_address,
                chain_id = ?status.identity.chain_id,
                connecting = status.connecting,
                state = ?self.controller.state(),
                "wallet status changed"
            );
        }
    }
}
