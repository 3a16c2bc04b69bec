//! TUI keyboard input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::flow::{SubmissionState, SubmitOutcome};

use super::state::*;

/// Longest amount string the form accepts.
const MAX_AMOUNT_LEN: usize = 24;

/// Apply a key press. Returns `true` when the UI should exit.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('c') => {
            if !app.controller.request_connect() {
                debug!("connect ignored: wallet already connected");
            }
        }
        KeyCode::Char('n') => {
            if !app.controller.request_network_switch() {
                debug!("network switch ignored: not on the wrong network");
            }
        }
        KeyCode::Char('x') => app.wallet.disconnect(),
        KeyCode::Char('w') => app.wallet.set_chain_id(OFF_TARGET_CHAIN_ID),
        KeyCode::Enter => submit(app),
        KeyCode::Backspace if amount_editable(app) => {
            let mut amount = app.controller.amount_input().to_string();
            amount.pop();
            app.controller.set_amount(amount);
        }
        KeyCode::Char(c) if (c.is_ascii_digit() || c == '.') && amount_editable(app) => {
            let mut amount = app.controller.amount_input().to_string();
            if amount.len() < MAX_AMOUNT_LEN {
                amount.push(c);
                app.controller.set_amount(amount);
            }
        }
        _ => {}
    }

    false
}

fn amount_editable(app: &App) -> bool {
    !matches!(
        app.controller.state(),
        SubmissionState::NoWallet | SubmissionState::WrongNetwork | SubmissionState::Processing
    )
}

fn submit(app: &mut App) {
    match app.controller.submit() {
        SubmitOutcome::Started => debug!("contribution started from terminal UI"),
        SubmitOutcome::Rejected(err) => debug!(reason = %err, "amount rejected"),
        SubmitOutcome::Blocked(err) => debug!(reason = %err, "submit blocked"),
        SubmitOutcome::Ignored => debug!("submit ignored"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::api::SimulatedContributions;
    use crate::config::Config;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn quit_keys_end_the_session() {
        let backend = Arc::new(SimulatedContributions::new(Duration::ZERO, false));
        let mut app = App::new(&Config::default(), "camp-1", backend);

        assert!(!handle_key(&mut app, press(KeyCode::Char('1'))));
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))));
        assert!(handle_key(&mut app, press(KeyCode::Esc)));
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)
        ));

        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert!(!handle_key(&mut app, release));
    }
}
