//! Player's game screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::client::state::GameScreen;
use crate::game::Palette;
use crate::protocol::RoomStatus;

use super::{card, scoreboard};

/// Render the player's view of the room.
pub fn render(frame: &mut Frame, area: Rect, game: &GameScreen, palette: &Palette, now_ms: i64) {
    let view = &game.view;

    let chunks = Layout::vertical([
        Constraint::Length(1), // Room line
        Constraint::Min(6),    // Card + scoreboard
    ])
    .margin(1)
    .split(area);

    let room = view.room();
    let pack = room.and_then(|r| r.pack_title.clone()).unwrap_or_default();
    let mut header = vec![
        Span::styled(
            format!("Room {}", game.code),
            Style::default().fg(palette.accent).bold(),
        ),
        Span::styled(format!("  {pack}"), Style::default().fg(palette.ink)),
        Span::styled(
            format!("  Q {} / {}", view.question_number(), room.map_or(0, |r| r.total)),
            Style::default().fg(palette.pill),
        ),
    ];
    if room.is_some_and(|r| r.status == RoomStatus::Question) {
        header.push(Span::styled(
            format!("  ⏳ {}", view.time_left(now_ms)),
            Style::default().fg(palette.pill),
        ));
    }
    if let Some(name) = view.theme().and_then(|t| t.name.as_ref()) {
        header.push(Span::styled(format!("  ({name})"), Style::default().fg(palette.muted)));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let columns = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    if view.question().is_some() {
        card::render(frame, columns[0], view, Some(game.cursor), palette, now_ms);
    } else {
        let who = match &game.avatar {
            Some(avatar) => format!("{avatar} {}", game.name),
            None => game.name.clone(),
        };
        let waiting = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(who, Style::default().fg(palette.ink).bold())),
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for the Game Master to start…",
                Style::default().fg(palette.accent),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.panel)),
        );
        frame.render_widget(waiting, columns[0]);
    }

    let players = room.map(|r| r.players.as_slice()).unwrap_or_default();
    scoreboard::render(frame, columns[1], players, palette);
}
