//! Campaign Contribute - wallet-gated crowdfunding contributions
//!
//! Drives the contribution flow from the terminal:
//! - Previews the platform fee split for an amount
//! - Runs a headless contribution against a simulated wallet
//! - Offers an interactive form in a fullscreen terminal UI

mod api;
mod config;
mod flow;
mod idempotency;
mod logging;
mod tui;
mod wallet;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use crate::api::{ContributionService, HttpContributions, SimulatedContributions};
use crate::config::Config;
use crate::flow::{
    ContributionAmount, FeeSplit, FormView, FEE_RATE, Notice, PreconditionError, Remedy,
    SubmissionController, SubmissionState, SubmitOutcome, MIN_CONTRIBUTION, TARGET_CHAIN_ID,
};
use crate::wallet::SimulatedWallet;

/// Campaign Contribute - back crowdfunding campaigns from your wallet
#[derive(Parser)]
#[command(name = "contribute")]
#[command(version)]
#[command(about = "Contribute to crowdfunding campaigns with a transparent platform fee")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the platform fee and the amount the campaign receives
    Preview {
        /// Contribution amount (e.g. "1.5")
        #[arg(short, long)]
        amount: String,
    },

    /// Submit a contribution without the interactive UI
    Contribute {
        /// Campaign identifier
        #[arg(short, long)]
        campaign: String,

        /// Contribution amount (e.g. "1.5")
        #[arg(short, long)]
        amount: String,

        /// Wallet account to contribute from (defaults to the configured account)
        #[arg(long)]
        account: Option<String>,

        /// Chain the wallet is on (defaults to the contribution network)
        #[arg(long)]
        chain_id: Option<u64>,

        /// Run as if no wallet were connected
        #[arg(long, default_value_t = false, conflicts_with = "account")]
        disconnected: bool,

        /// Make the simulated backend reject the contribution
        #[arg(long, default_value_t = false)]
        fail: bool,

        /// Exit as soon as the contribution settles instead of waiting for the form reset
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },

    /// Start the fullscreen contribution form
    Tui {
        /// Campaign identifier
        #[arg(short, long)]
        campaign: String,
    },

    /// Show configuration path and active settings
    Config {
        /// Write a default config file if none exists
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config();

    match cli.command {
        Commands::Preview { amount } => {
            logging::init_console(&cfg.logging)?;
            if !print_preview(&amount) {
                std::process::exit(1);
            }
        }
        Commands::Contribute {
            campaign,
            amount,
            account,
            chain_id,
            disconnected,
            fail,
            no_wait,
        } => {
            logging::init_console(&cfg.logging)?;
            if fail {
                cfg.simulation.fail = true;
            }
            let wallet = if disconnected {
                SimulatedWallet::disconnected(cfg.wallet.account.clone(), TARGET_CHAIN_ID)
            } else {
                SimulatedWallet::connected(
                    account.unwrap_or_else(|| cfg.wallet.account.clone()),
                    chain_id.unwrap_or(TARGET_CHAIN_ID),
                )
            };

            let rt = tokio::runtime::Runtime::new()?;
            let succeeded = rt.block_on(run_contribute(
                &cfg,
                Arc::new(wallet),
                &campaign,
                &amount,
                no_wait,
            ));
            if !succeeded {
                std::process::exit(2);
            }
        }
        Commands::Tui { campaign } => {
            let log_path = logging::init_file(&cfg.logging)?;
            let rt = tokio::runtime::Runtime::new()?;
            let contributions = contribution_service(&cfg);
            tui::run_tui(&rt, &cfg, &campaign, contributions)?;
            println!(
                "{} {}",
                "Session log:".bright_black(),
                log_path.display().to_string().bright_black()
            );
        }
        Commands::Config { init } => {
            logging::init_console(&cfg.logging)?;
            if init {
                cfg = config::Config::init()?;
            }
            print_config(&cfg)?;
        }
    }

    Ok(())
}

fn load_config() -> Config {
    match Config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!(
                "{} {}",
                "Could not load config, using defaults:".bright_yellow(),
                format!("{err:#}").bright_yellow()
            );
            Config::default()
        }
    }
}

fn contribution_service(cfg: &Config) -> Arc<dyn ContributionService> {
    if cfg.api.is_remote() {
        tracing::info!(base_url = %cfg.api.base_url, "using HTTP contribution backend");
        Arc::new(HttpContributions::from_config(&cfg.api))
    } else {
        tracing::info!("no API URL configured, using simulated contribution backend");
        Arc::new(SimulatedContributions::from_config(&cfg.simulation))
    }
}

fn print_preview(raw: &str) -> bool {
    match ContributionAmount::parse(raw) {
        Ok(amount) => {
            let preview = FeeSplit::for_amount(amount).preview();
            println!("{}", "Contribution breakdown".bright_cyan().bold());
            println!("  You send:          {}", preview.gross.bold());
            println!("  Platform fee ({}%): {}", FEE_RATE * 100.0, preview.fee.bright_yellow());
            println!("  Campaign gets:     {}", preview.net.bright_green());
            true
        }
        Err(err) => {
            println!(
                "{} {} (minimum {MIN_CONTRIBUTION})",
                "✗".bright_red(),
                err.to_string().bright_red()
            );
            false
        }
    }
}

/// Run one headless contribution. Returns `true` when it succeeded.
async fn run_contribute(
    cfg: &Config,
    wallet: Arc<SimulatedWallet>,
    campaign_id: &str,
    amount: &str,
    no_wait: bool,
) -> bool {
    let resets = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&resets);
    let mut controller =
        SubmissionController::new(wallet, contribution_service(cfg), campaign_id).on_success(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

    controller.set_amount(amount);
    print_view(&controller, cfg);

    match controller.submit() {
        SubmitOutcome::Started => {}
        SubmitOutcome::Rejected(_) => {
            print_view(&controller, cfg);
            return false;
        }
        SubmitOutcome::Blocked(err) => {
            print_blocked(err);
            return false;
        }
        SubmitOutcome::Ignored => return false,
    }
    print_view(&controller, cfg);

    let mut succeeded = false;
    while let Some(state) = controller.next_event().await {
        match state {
            SubmissionState::Success => {
                print_view(&controller, cfg);
                succeeded = true;
                if no_wait {
                    break;
                }
            }
            SubmissionState::Failed(_) => {
                print_view(&controller, cfg);
                break;
            }
            // Back to an empty form after the success banner.
            SubmissionState::Idle => {}
            _ => print_view(&controller, cfg),
        }
    }

    if resets.load(Ordering::SeqCst) > 0 {
        println!("{}", "Ready for another contribution.".bright_black());
    }
    controller.teardown();
    succeeded
}

fn print_view(controller: &SubmissionController, cfg: &Config) {
    let view = flow::project(&controller.snapshot(), &cfg.ui.failure_message);
    match view {
        FormView::ConnectPrompt { .. } => print_blocked(PreconditionError::NoWallet),
        FormView::SwitchNetworkPrompt { .. } => print_blocked(PreconditionError::WrongNetwork),
        FormView::Form {
            amount,
            preview,
            notice,
            ..
        } => match notice {
            None => {
                if let Some(p) = preview {
                    println!(
                        "{} {} → fee {} → campaign {}",
                        "Amount".bright_cyan(),
                        p.gross.bold(),
                        p.fee.bright_yellow(),
                        p.net.bright_green()
                    );
                } else {
                    println!("{} {}", "Amount".bright_cyan(), amount.bold());
                }
            }
            Some(Notice::Processing) => {
                println!("{}", "Processing contribution...".bright_yellow())
            }
            Some(Notice::Success) => {
                println!("{}", "✓ Contribution sent. Thank you!".bright_green().bold())
            }
            Some(Notice::Error(message)) => {
                println!("{} {}", "✗".bright_red(), message.bright_red())
            }
        },
    }
}

fn print_blocked(err: PreconditionError) {
    let hint = match err.remedy() {
        Remedy::ConnectWallet => "Connect a wallet to contribute.".to_string(),
        Remedy::SwitchNetwork(chain_id) => {
            format!("Switch your wallet to chain {chain_id} to contribute.")
        }
    };
    println!("{} {}", err.to_string().bright_red().bold(), hint.bright_yellow());
}

fn print_config(cfg: &Config) -> Result<()> {
    println!(
        "{} {}",
        "Config file:".bright_cyan(),
        config::get_config_path()?
    );
    println!(
        "{} {}",
        "Backend:".bright_cyan(),
        if cfg.api.is_remote() {
            cfg.api.base_url.clone()
        } else {
            format!("simulated ({} ms latency)", cfg.simulation.latency_ms)
        }
    );
    println!(
        "{} {} (chain {} after connect)",
        "Wallet:".bright_cyan(),
        cfg.wallet.account,
        cfg.wallet.chain_id
    );
    println!(
        "{} chain {TARGET_CHAIN_ID}, fee {}%",
        "Contribution network:".bright_cyan(),
        FEE_RATE * 100.0
    );
    Ok(())
}
