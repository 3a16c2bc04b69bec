//! Contribution form and its guidance prompts.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::flow::{FeePreview, FormView, Notice, FEE_RATE, MIN_CONTRIBUTION};
use crate::tui::state::App;
use crate::tui::theme::Theme;
use crate::tui::widgets::panel::Panel;

pub(crate) fn draw_contribute(area: Rect, f: &mut ratatui::Frame, app: &App, view: &FormView) {
    let theme = Theme::default();
    match view {
        FormView::ConnectPrompt { connecting } => {
            let status = if *connecting {
                format!("{} Waiting for wallet...", app.animation.spinner_char())
            } else {
                "Press C to connect your wallet.".to_string()
            };
            Panel::new("Connect wallet")
                .badge("no wallet", theme.caution)
                .border(theme.caution)
                .line(Line::from(""))
                .line(Line::from(Span::styled(
                    "A connected wallet is required to contribute.",
                    Style::default().fg(theme.text),
                )))
                .line(Line::from(""))
                .line(Line::from(Span::styled(status, Style::default().fg(theme.accent))))
                .render(area, f, &theme);
        }
        FormView::SwitchNetworkPrompt {
            current_chain_id,
            target_chain_id,
        } => {
            let current = current_chain_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Panel::new("Switch network")
                .badge("wrong network", theme.caution)
                .border(theme.caution)
                .line(Line::from(""))
                .line(Line::from(vec![
                    Span::styled("Wallet is on chain ", Style::default().fg(theme.text)),
                    Span::styled(current, Style::default().fg(theme.critical)),
                    Span::styled(
                        ", contributions go through chain ",
                        Style::default().fg(theme.text),
                    ),
                    Span::styled(
                        target_chain_id.to_string(),
                        Style::default().fg(theme.good),
                    ),
                    Span::styled(".", Style::default().fg(theme.text)),
                ]))
                .line(Line::from(""))
                .line(Line::from(Span::styled(
                    "Press N to switch network.",
                    Style::default().fg(theme.accent),
                )))
                .render(area, f, &theme);
        }
        FormView::Form {
            account,
            amount,
            preview,
            notice,
            submit_enabled,
        } => draw_form(
            area,
            f,
            app,
            &theme,
            account,
            amount,
            preview.as_ref(),
            notice.as_ref(),
            *submit_enabled,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_form(
    area: Rect,
    f: &mut ratatui::Frame,
    app: &App,
    theme: &Theme,
    account: &str,
    amount: &str,
    preview: Option<&FeePreview>,
    notice: Option<&Notice>,
    submit_enabled: bool,
) {
    let label = Style::default().fg(theme.text_dim);
    let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);

    let mut panel = Panel::new("Contribute")
        .line(Line::from(vec![
            Span::styled("From      ", label),
            Span::styled(account.to_string(), Style::default().fg(theme.text)),
        ]))
        .line(Line::from(""))
        .line(Line::from(vec![
            Span::styled("Amount    ", label),
            Span::styled(format!("{amount}▏"), value),
        ]))
        .line(Line::from(Span::styled(
            format!("          minimum {MIN_CONTRIBUTION}"),
            Style::default().fg(theme.muted),
        )))
        .line(Line::from(""));

    match preview {
        Some(p) => {
            panel = panel
                .line(Line::from(vec![
                    Span::styled(format!("Fee {:>3}%  ", FEE_RATE * 100.0), label),
                    Span::styled(p.fee.clone(), Style::default().fg(theme.caution)),
                ]))
                .line(Line::from(vec![
                    Span::styled("Campaign  ", label),
                    Span::styled(p.net.clone(), Style::default().fg(theme.good)),
                ]));
        }
        None => {
            panel = panel.line(Line::from(Span::styled(
                "Enter an amount to see the fee breakdown.",
                Style::default().fg(theme.muted),
            )));
        }
    }

    panel = panel.line(Line::from(""));
    if let Some(notice) = notice {
        let color = theme.notice_color(notice);
        let text = match notice {
            Notice::Error(message) => format!("✗ {message}"),
            Notice::Processing => {
                format!("{} Processing contribution...", app.animation.spinner_char())
            }
            Notice::Success => "✓ Contribution sent. Thank you!".to_string(),
        };
        panel = panel.line(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        panel = panel.border(color);
    }

    let completed = app.completed_count();
    if completed > 0 {
        panel = panel.line(Line::from(Span::styled(
            format!("{completed} contribution(s) completed this session"),
            Style::default().fg(theme.muted),
        )));
    }

    let (badge, badge_color) = if submit_enabled {
        ("ready", theme.good)
    } else {
        ("locked", theme.muted)
    };
    panel.badge(badge, badge_color).render(area, f, theme);
}
