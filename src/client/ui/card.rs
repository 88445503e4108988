//! Question card shared by both roles.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::game::room::{RoomView, Status};
use crate::game::shuffle::ChoiceMark;
use crate::game::Palette;
use crate::protocol::RoomStatus;

/// Render the current question; `cursor` is the player's highlighted choice.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: &RoomView,
    cursor: Option<usize>,
    palette: &Palette,
    now_ms: i64,
) {
    let Some(question) = view.question() else {
        return;
    };
    let room = view.room();
    let total = room.map_or(0, |r| r.total);
    let live = room.is_some_and(|r| r.status == RoomStatus::Question);

    let mut lines = Vec::new();
    // Pills are part of the player's card only.
    if cursor.is_some() {
        let pill = |text: String| {
            Span::styled(format!(" {text} "), Style::default().fg(palette.bg).bg(palette.pill).bold())
        };
        let mut pills = vec![pill(format!("Q {} / {}", view.question_number(), total))];
        if live {
            pills.push(Span::raw(" "));
            pills.push(pill(format!("⏳ {}", view.time_left(now_ms))));
        }
        lines.push(Line::from(pills));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        question.question().front.clone(),
        Style::default().fg(palette.ink).bold(),
    )));
    lines.push(Line::from(""));

    let marks = view.marks();
    for (i, choice) in question.choices().enumerate() {
        let selected = cursor == Some(i);
        let mark = marks.get(i).copied().unwrap_or(ChoiceMark::None);

        let mut style = match mark {
            ChoiceMark::Correct => Style::default().fg(palette.bg).bg(palette.good).bold(),
            ChoiceMark::Wrong => Style::default().fg(palette.bg).bg(palette.bad).bold(),
            ChoiceMark::None if selected => Style::default().fg(palette.accent).bold(),
            ChoiceMark::None => Style::default().fg(palette.ink),
        };
        if view.is_locked() && mark == ChoiceMark::None && !selected {
            style = style.fg(palette.muted);
        }

        let prefix = if selected { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{}) ", i + 1), style),
            Span::styled(choice.to_string(), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(status_line(view, palette, now_ms));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.panel))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn status_line(view: &RoomView, palette: &Palette, now_ms: i64) -> Line<'static> {
    match view.status(now_ms) {
        Status::TimeLeft(seconds) => Line::from(Span::styled(
            format!("Time left: {seconds}s"),
            Style::default().fg(palette.ink),
        )),
        Status::Winner(winner) => Line::from(vec![
            Span::styled("Winner: ", Style::default().fg(palette.ink)),
            Span::styled(winner, Style::default().fg(palette.good).bold()),
        ]),
        Status::NoCorrectAnswer => Line::from(Span::styled(
            "No correct answer.",
            Style::default().fg(palette.muted),
        )),
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::client::ui::find_text;
    use crate::game::Role;
    use crate::protocol::{Ack, Player, Question, Reveal, Room, ServerEvent};

    fn room(status: RoomStatus) -> Room {
        Room {
            code: "ROOM".to_string(),
            pack_title: Some("Capitals".to_string()),
            players: vec![Player {
                name: "Ana".to_string(),
                score: 0,
                avatar: None,
            }],
            total: 3,
            ix: 0,
            status,
            ends_at: Some(30_000),
            theme: None,
        }
    }

    fn question() -> Question {
        Question {
            front: "Capital of France?".to_string(),
            choices: vec![
                "Berlin".to_string(),
                "Paris".to_string(),
                "Rome".to_string(),
                "Madrid".to_string(),
            ],
        }
    }

    fn view_in_question(role: Role) -> RoomView {
        let mut view = RoomView::with_rng(role, fastrand::Rng::with_seed(9));
        view.apply(ServerEvent::RoomUpdate(Box::new(room(RoomStatus::Question))));
        view.apply(ServerEvent::QuestionNew(question()));
        view
    }

    fn player() -> Role {
        Role::Player {
            code: "ROOM".to_string(),
            name: "Ana".to_string(),
        }
    }

    fn draw(view: &RoomView, cursor: Option<usize>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), view, cursor, &Palette::default(), 0))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn bg_of(buffer: &Buffer, needle: &str) -> Color {
        let (x, y) = find_text(buffer, needle).unwrap();
        buffer.cell((x, y)).unwrap().bg
    }

    #[test]
    fn test_choices_follow_shuffled_order() {
        let view = view_in_question(player());
        let buffer = draw(&view, Some(0));

        let shown: Vec<String> = view.question().unwrap().choices().map(str::to_string).collect();
        let rows: Vec<u16> = shown
            .iter()
            .enumerate()
            .map(|(i, choice)| find_text(&buffer, &format!("{}) {choice}", i + 1)).unwrap().1)
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_wrong_then_correct_highlight() {
        let palette = Palette::default();
        let mut view = view_in_question(player());
        let berlin = view.question().unwrap().shuffled_index(0).unwrap();
        let paris = view.question().unwrap().shuffled_index(1).unwrap();

        view.choose(berlin);
        view.on_answer_ack(
            0,
            &Ack {
                ok: true,
                correct: Some(false),
                error: None,
            },
        );
        let buffer = draw(&view, Some(berlin));
        assert_eq!(bg_of(&buffer, &format!("{}) Berlin", berlin + 1)), palette.bad);
        assert_ne!(bg_of(&buffer, &format!("{}) Paris", paris + 1)), palette.good);

        view.apply(ServerEvent::RoomUpdate(Box::new(room(RoomStatus::Reveal))));
        view.apply(ServerEvent::QuestionReveal(Reveal {
            correct_index: Some(1),
            winner: None,
            bonus: None,
        }));
        let buffer = draw(&view, Some(berlin));
        assert_eq!(bg_of(&buffer, &format!("{}) Paris", paris + 1)), palette.good);
        assert_ne!(bg_of(&buffer, &format!("{}) Berlin", berlin + 1)), palette.bad);
        assert!(find_text(&buffer, "No correct answer.").is_some());
    }

    #[test]
    fn test_timer_pill_only_while_question_is_open() {
        let mut view = view_in_question(player());
        let buffer = draw(&view, Some(0));
        assert!(find_text(&buffer, "Q 1 / 3").is_some());
        assert!(find_text(&buffer, "⏳").is_some());

        view.apply(ServerEvent::RoomUpdate(Box::new(room(RoomStatus::Reveal))));
        let buffer = draw(&view, Some(0));
        assert!(find_text(&buffer, "Q 1 / 3").is_some());
        assert!(find_text(&buffer, "⏳").is_none());
    }

    #[test]
    fn test_master_card_has_no_pills() {
        let view = view_in_question(Role::GameMaster);
        let buffer = draw(&view, None);
        assert!(find_text(&buffer, "Capital of France?").is_some());
        assert!(find_text(&buffer, "Q 1 / 3").is_none());
        assert!(find_text(&buffer, "⏳").is_none());
        assert!(find_text(&buffer, "Time left: 30s").is_some());
    }
}
