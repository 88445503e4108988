//! Game master screen: room setup, then the live room.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::client::state::{MasterScreen, SetupField, SetupForm};
use crate::game::Palette;
use crate::protocol::RoomStatus;

use super::{card, scoreboard};

/// Render the game master screen.
pub fn render(frame: &mut Frame, area: Rect, master: &MasterScreen, palette: &Palette, now_ms: i64) {
    if master.view.room().is_some() {
        render_room(frame, area, master, palette, now_ms);
    } else {
        render_setup(frame, area, &master.setup, palette);
    }
}

fn render_setup(frame: &mut Frame, area: Rect, setup: &SetupForm, palette: &Palette) {
    let focus_style = |field: SetupField| {
        if setup.focus == field {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.ink)
        }
    };
    let marker = |field: SetupField| if setup.focus == field { "> " } else { "  " };

    let pack = match setup.selected_pack() {
        Some(p) => format!("{} ({})", p.title, p.count),
        None => "Select pack".to_string(),
    };
    let available = setup.selected_pack().map_or(0, |p| p.count);

    let mut content = vec![
        Line::from(Span::styled(
            "Create a room",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(marker(SetupField::Pack), focus_style(SetupField::Pack)),
            Span::styled("Pack:        ", focus_style(SetupField::Pack)),
            Span::styled(format!("◀ {pack} ▶"), focus_style(SetupField::Pack)),
        ]),
        Line::from(Span::styled(
            format!("  Available questions: {available}"),
            Style::default().fg(palette.muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(marker(SetupField::Seconds), focus_style(SetupField::Seconds)),
            Span::styled("Seconds per question: ", focus_style(SetupField::Seconds)),
            Span::styled(format!("◀ {} ▶", setup.duration_sec), focus_style(SetupField::Seconds)),
        ]),
        Line::from(vec![
            Span::styled(marker(SetupField::Questions), focus_style(SetupField::Questions)),
            Span::styled("Number of questions:  ", focus_style(SetupField::Questions)),
            Span::styled(
                format!("◀ {} ▶", setup.total_questions),
                focus_style(SetupField::Questions),
            ),
            Span::styled(
                format!("  (max {})", setup.max_questions()),
                Style::default().fg(palette.muted),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(marker(SetupField::Create), focus_style(SetupField::Create)),
            Span::styled("[ Create room ]", focus_style(SetupField::Create)),
        ]),
    ];

    if let Some(error) = &setup.load_error {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("Could not load packs: {error}"),
            Style::default().fg(palette.bad),
        )));
    } else if setup.packs.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            "Loading packs...",
            Style::default().fg(palette.muted),
        )));
    }

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.panel))
            .title(" Game Master ")
            .title_style(Style::default().fg(palette.accent))
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(widget, super::centered(area, 64, 18));
}

fn render_room(frame: &mut Frame, area: Rect, master: &MasterScreen, palette: &Palette, now_ms: i64) {
    let Some(room) = master.view.room() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Chips
        Constraint::Length(1), // Action
        Constraint::Min(6),    // Card + scoreboard
    ])
    .margin(1)
    .split(area);

    let chip = |text: String| Span::styled(format!(" {text} "), Style::default().fg(palette.bg).bg(palette.pill));
    let chips = Line::from(vec![
        chip(format!("Code: {}", room.code)),
        Span::raw(" "),
        chip(room.pack_title.clone().unwrap_or_default()),
        Span::raw(" "),
        chip(format!("Players: {}", room.players.len())),
        Span::raw(" "),
        chip(format!("Total: {}", room.total)),
    ]);
    frame.render_widget(Paragraph::new(chips), chunks[0]);

    let action = match room.status {
        RoomStatus::Lobby => Span::styled(
            "[Enter] Start",
            Style::default().fg(palette.accent).bold(),
        ),
        RoomStatus::Question | RoomStatus::Reveal => Span::styled(
            "[Enter] Next",
            Style::default().fg(palette.accent).bold(),
        ),
        RoomStatus::Ended => Span::styled("Game over", Style::default().fg(palette.muted)),
        RoomStatus::Other(ref status) => {
            Span::styled(status.clone(), Style::default().fg(palette.muted))
        }
    };
    frame.render_widget(Paragraph::new(Line::from(action)), chunks[1]);

    let columns = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[2]);

    if master.view.question().is_some() {
        card::render(frame, columns[0], &master.view, None, palette, now_ms);
    } else {
        let waiting = Paragraph::new("Waiting to start…")
            .alignment(Alignment::Center)
            .fg(palette.muted)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.panel)),
            );
        frame.render_widget(waiting, columns[0]);
    }
    scoreboard::render(frame, columns[1], &room.players, palette);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::client::ui::find_text;
    use crate::game::{Role, RoomView};
    use crate::protocol::{Player, Question, Room, ServerEvent};

    fn room(status: RoomStatus) -> Room {
        Room {
            code: "ROOM".to_string(),
            pack_title: Some("Capitals".to_string()),
            players: vec![Player {
                name: "Ana".to_string(),
                score: 4,
                avatar: None,
            }],
            total: 3,
            ix: 0,
            status,
            ends_at: Some(30_000),
            theme: None,
        }
    }

    fn master(status: RoomStatus) -> MasterScreen {
        let mut view = RoomView::with_rng(Role::GameMaster, fastrand::Rng::with_seed(3));
        view.apply(ServerEvent::RoomUpdate(Box::new(room(status))));
        MasterScreen {
            setup: SetupForm::default(),
            view,
        }
    }

    fn draw(master: &MasterScreen) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), master, &Palette::default(), 0))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_lobby_chips_and_start_action() {
        let buffer = draw(&master(RoomStatus::Lobby));
        for chip in ["Code: ROOM", "Capitals", "Players: 1", "Total: 3"] {
            assert!(find_text(&buffer, chip).is_some(), "missing {chip}");
        }
        assert!(find_text(&buffer, "[Enter] Start").is_some());
        assert!(find_text(&buffer, "Waiting to start…").is_some());
        assert!(find_text(&buffer, "Ana").is_some());
    }

    #[test]
    fn test_question_shows_next_action_and_card() {
        let mut screen = master(RoomStatus::Question);
        screen.view.apply(ServerEvent::QuestionNew(Question {
            front: "Capital of France?".to_string(),
            choices: vec!["Berlin".to_string(), "Paris".to_string()],
        }));
        let buffer = draw(&screen);
        assert!(find_text(&buffer, "[Enter] Next").is_some());
        assert!(find_text(&buffer, "[Enter] Start").is_none());
        assert!(find_text(&buffer, "Capital of France?").is_some());
    }

    #[test]
    fn test_ended_room_has_no_action() {
        let buffer = draw(&master(RoomStatus::Ended));
        assert!(find_text(&buffer, "Game over").is_some());
        assert!(find_text(&buffer, "[Enter]").is_none());
    }
}
