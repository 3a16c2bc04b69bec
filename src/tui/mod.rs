//! Fullscreen terminal UI (TUI).
//!
//! Renders the contribution form as a projection of the submission controller
//! and feeds key presses back to it. The controller's async work runs on the
//! shared runtime; results are pumped into it once per frame.

pub(crate) mod input;
pub(crate) mod screens;
pub(crate) mod state;
pub(crate) mod theme;
pub(crate) mod widgets;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use tracing::info;

use crate::api::ContributionService;
use crate::config::Config;
use crate::flow::FormView;
use state::*;
use theme::Theme;

const FRAME_TIME: Duration = Duration::from_millis(16);

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub(crate) fn run_tui(
    rt: &tokio::runtime::Runtime,
    cfg: &Config,
    campaign_id: &str,
    contributions: Arc<dyn ContributionService>,
) -> Result<()> {
    // Controller tasks and wallet timers are spawned onto this runtime.
    let _rt_guard = rt.enter();
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(cfg, campaign_id, contributions);
    info!(campaign_id, "terminal UI started");

    loop {
        app.pump_controller();
        app.observe_wallet();

        let view = app.view();
        terminal.draw(|f| draw(f.area(), f, &app, &view))?;

        let timeout = FRAME_TIME.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if input::handle_key(&mut app, key) {
                    break;
                }
            }
        }

        if app.last_tick.elapsed() >= FRAME_TIME {
            app.last_tick = Instant::now();
            app.animation.advance();
        }
    }

    info!(completed = app.completed_count(), "terminal UI closed");
    app.controller.teardown();
    Ok(())
}

impl App {
    fn pump_controller(&mut self) {
        if self.controller.pump() > 0 {
            info!(state = ?self.controller.state(), "submission state changed");
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, app: &App, view: &FormView) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),    // content
            Constraint::Length(1), // footer
        ])
        .split(area);

    let snapshot = app.controller.snapshot();
    let wallet = match (&snapshot.account, snapshot.chain_id) {
        (Some(account), Some(chain_id)) => format!("{} on chain {chain_id}", short_address(account)),
        (Some(account), None) => short_address(account),
        _ if snapshot.connecting => "connecting...".to_string(),
        _ => "wallet disconnected".to_string(),
    };
    widgets::header::draw_header(
        layout[0],
        f,
        &theme,
        app.controller.campaign_id(),
        &wallet,
    );

    screens::contribute::draw_contribute(layout[1], f, app, view);

    f.render_widget(Paragraph::new(hint_line(view, &theme)), layout[2]);
}

/// Keys that do something in the current view.
fn key_hints(view: &FormView) -> &'static [(&'static str, &'static str)] {
    match view {
        FormView::ConnectPrompt { connecting: true } => &[("q", "quit")],
        FormView::ConnectPrompt { .. } => &[("c", "connect"), ("q", "quit")],
        FormView::SwitchNetworkPrompt { .. } => {
            &[("n", "switch network"), ("x", "disconnect"), ("q", "quit")]
        }
        FormView::Form {
            submit_enabled: true,
            ..
        } => &[
            ("0-9 .", "amount"),
            ("enter", "contribute"),
            ("w", "other chain"),
            ("x", "disconnect"),
            ("q", "quit"),
        ],
        FormView::Form { .. } => &[("w", "other chain"), ("x", "disconnect"), ("q", "quit")],
    }
}

fn hint_line(view: &FormView, theme: &Theme) -> Line<'static> {
    let spans = key_hints(view).iter().flat_map(|(key, action)| {
        [
            Span::styled(
                format!("[{key}]"),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {action}  "), Style::default().fg(theme.text_dim)),
        ]
    });
    Line::from(spans.collect::<Vec<_>>())
}

fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            short_address("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x5290…9EE7"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn hints_follow_the_view() {
        let keys = |view: &FormView| key_hints(view).iter().map(|(k, _)| *k).collect::<Vec<_>>();

        assert_eq!(keys(&FormView::ConnectPrompt { connecting: false }), ["c", "q"]);
        assert_eq!(keys(&FormView::ConnectPrompt { connecting: true }), ["q"]);

        let mut form = FormView::Form {
            account: "0xabc".to_string(),
            amount: "1".to_string(),
            preview: None,
            notice: None,
            submit_enabled: true,
        };
        assert!(keys(&form).contains(&"enter"));
        if let FormView::Form { submit_enabled, .. } = &mut form {
            *submit_enabled = false;
        }
        assert!(!keys(&form).contains(&"enter"));
    }

    #[test]
    fn hint_line_brackets_keys() {
        let line = hint_line(
            &FormView::SwitchNetworkPrompt {
                current_chain_id: Some(1),
                target_chain_id: 11_155_111,
            },
            &Theme::default(),
        );
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[n] switch network  [x] disconnect  [q] quit  ");
    }
}
