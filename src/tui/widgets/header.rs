//! Top header bar with title, campaign and wallet status.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;

pub(crate) fn draw_header(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    campaign_id: &str,
    wallet: &str,
) {
    let header_line = Line::from(vec![
        Span::styled(
            "CONTRIBUTE",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  //  campaign {campaign_id}"),
            Style::default().fg(theme.text_dim),
        ),
        Span::styled(format!("  //  {wallet}"), Style::default().fg(theme.muted)),
    ]);
    let rule = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(theme.border),
    ));

    f.render_widget(Paragraph::new(vec![header_line, rule]), area);
}
