//! Scoreboard panel.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::game::Palette;
use crate::game::scoreboard::standings;
use crate::protocol::Player;

pub fn render(frame: &mut Frame, area: Rect, players: &[Player], palette: &Palette) {
    let rows = standings(players);

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "Waiting for players…",
            Style::default().fg(palette.muted),
        ))]
    } else {
        rows.iter()
            .map(|row| {
                let style = if row.leader {
                    Style::default().fg(palette.accent).bold()
                } else {
                    Style::default().fg(palette.ink)
                };
                let crown = if row.leader { "👑 " } else { "   " };
                Line::from(vec![
                    Span::styled(crown, style),
                    Span::raw(format!("{} ", row.avatar)),
                    Span::styled(row.name.to_string(), style),
                    Span::styled(format!("  {}", row.score), style),
                ])
            })
            .collect()
    };

    let leader = rows.first().is_some_and(|row| row.leader);
    let border = if leader { palette.accent } else { palette.panel };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Scoreboard ")
            .title_style(Style::default().fg(palette.accent))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
