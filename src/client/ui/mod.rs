//! Terminal views of the client.

mod card;
mod game;
mod join;
mod master;
mod overlay;
mod scoreboard;

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::game::countdown;
use crate::game::Palette;

use super::state::{ClientApp, Screen};

pub const TITLE: &str = "⚡ Test Prep – Multiplayer";

/// Render the client UI for the current screen.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    let palette = app.palette();
    let now_ms = countdown::now_ms();
    frame.render_widget(Block::default().bg(palette.bg), area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(8),    // Screen
        Constraint::Length(1), // Controls
    ])
    .split(area);

    render_header(frame, chunks[0], app, &palette);

    match &app.screen {
        Screen::Master(master) => master::render(frame, chunks[1], master, &palette, now_ms),
        Screen::Join(form) => join::render(frame, chunks[1], form, &palette),
        Screen::Game(game) => game::render(frame, chunks[1], game, &palette, now_ms),
    }

    render_controls(frame, chunks[2], app, &palette);

    if let Some(ambient) = app.theme().and_then(|t| t.ambient.as_ref()) {
        overlay::render_ambient(frame, chunks[1], ambient, app.elapsed(), &palette);
    }

    let now = Instant::now();
    if let Some(bonus) = app.bonus.visible(now) {
        overlay::render_bonus(frame, area, bonus, &palette);
    }
    if let Some(winner) = app.celebration.visible(now) {
        overlay::render_celebration(frame, area, winner, &palette);
    }
    if let Some(message) = &app.alert {
        overlay::render_alert(frame, area, message, &palette);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &ClientApp, palette: &Palette) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(label, Style::default().fg(palette.bg).bg(palette.accent).bold())
        } else {
            Span::styled(label, Style::default().fg(palette.ink))
        }
    };
    let on_master = matches!(app.screen, Screen::Master(_));

    let mute = if app.sound.is_muted() { "🔇" } else { "🔊" };
    let link = if app.connected {
        Span::styled("●", Style::default().fg(palette.good))
    } else {
        Span::styled("●", Style::default().fg(palette.bad))
    };

    let line = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(palette.accent).bold()),
        Span::raw("   "),
        tab(" [F1] Game Master ", on_master),
        Span::raw(" "),
        tab(" [F2] Join ", !on_master),
        Span::raw("   "),
        Span::styled(format!("{mute} [M]"), Style::default().fg(palette.ink)),
        Span::raw("  "),
        link,
        Span::styled(format!(" {}", app.server), Style::default().fg(palette.muted)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.panel)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &ClientApp, palette: &Palette) {
    let hints = match &app.screen {
        Screen::Master(master) if master.view.room().is_some() => {
            "[Enter] Start / Next  ·  [M] mute  ·  [Q] quit"
        }
        Screen::Master(_) => "Tab/arrows to move  ·  ←/→ to change  ·  [Enter] Create room  ·  [Q] quit",
        Screen::Join(_) => "Tab to move  ·  arrows pick avatar  ·  [Enter] Join  ·  [Esc] quit",
        Screen::Game(_) => "j/k or arrows to select  ·  Enter/Space or 1-9 to answer  ·  [Q] quit",
    };

    let widget = Paragraph::new(hints)
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}

/// Rect of `width` x `height` centred in `area`, clipped to it.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Top-left cell of the first occurrence of `needle` in `buffer`.
#[cfg(test)]
pub(crate) fn find_text(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        let symbols: Vec<&str> = (area.left()..area.right())
            .map(|x| buffer.cell((x, y)).map_or("", |cell| cell.symbol()))
            .collect();
        for start in 0..symbols.len() {
            if symbols[start..].concat().starts_with(needle) {
                return Some((area.left() + start as u16, y));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::protocol::{Room, RoomStatus, ServerEvent};
    use crate::route::Route;
    use crate::sound::SoundPlayer;

    fn screen_text(app: &ClientApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_shell_header_and_alert() {
        let mut app = ClientApp::new("http://localhost:3000".to_string(), SoundPlayer::silent());
        app.alert = Some("Choose a pack".to_string());

        let text = screen_text(&app);
        assert!(text.contains("Test Prep"));
        assert!(text.contains("Game Master"));
        assert!(text.contains("http://localhost:3000"));
        assert!(text.contains("Choose a pack"));
    }

    #[test]
    fn test_join_screen_lists_fields() {
        let mut app = ClientApp::new("http://localhost:3000".to_string(), SoundPlayer::silent());
        app.navigate(Route::Join);

        let text = screen_text(&app);
        assert!(text.contains("Room code"));
        assert!(text.contains("Your name"));
    }

    #[test]
    fn test_game_header_timer_only_during_question() {
        let mut app = ClientApp::new("http://localhost:3000".to_string(), SoundPlayer::silent());
        app.navigate(Route::game("ROOM", "Ana", None));
        let mut room = Room {
            code: "ROOM".to_string(),
            pack_title: Some("Capitals".to_string()),
            players: Vec::new(),
            total: 3,
            ix: -1,
            status: RoomStatus::Lobby,
            ends_at: None,
            theme: None,
        };

        app.handle_event(ServerEvent::RoomUpdate(Box::new(room.clone())));
        let text = screen_text(&app);
        assert!(text.contains("Room ROOM"));
        assert!(!text.contains('⏳'));

        room.status = RoomStatus::Question;
        room.ix = 0;
        room.ends_at = Some(countdown::now_ms() + 20_000);
        app.handle_event(ServerEvent::RoomUpdate(Box::new(room)));
        assert!(screen_text(&app).contains('⏳'));
    }

    #[test]
    fn test_centered_is_clipped() {
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(centered(area, 20, 2), Rect::new(0, 1, 10, 2));
    }
}
