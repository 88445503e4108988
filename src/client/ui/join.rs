//! Join form.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::client::state::{AVATAR_COLUMNS, AVATARS, JoinField, JoinForm};
use crate::game::Palette;

/// Render the join form.
pub fn render(frame: &mut Frame, area: Rect, form: &JoinForm, palette: &Palette) {
    let label = |field: JoinField, text: &'static str| {
        let style = if form.focus == field {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.ink)
        };
        Span::styled(text, style)
    };
    let cursor = |field: JoinField| if form.focus == field { "_" } else { "" };

    let mut content = vec![
        Line::from(Span::styled(
            "Join a room",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            label(JoinField::Code, "Room code: "),
            Span::styled(form.code.clone(), Style::default().fg(palette.ink).bold()),
            Span::styled(cursor(JoinField::Code), Style::default().fg(palette.accent)),
        ]),
        Line::from(vec![
            label(JoinField::Name, "Your name: "),
            Span::styled(form.name.clone(), Style::default().fg(palette.ink)),
            Span::styled(cursor(JoinField::Name), Style::default().fg(palette.accent)),
        ]),
        Line::from(""),
        Line::from(label(JoinField::Avatar, "Avatar:")),
    ];

    for (row, avatars) in AVATARS.chunks(AVATAR_COLUMNS).enumerate() {
        let spans: Vec<Span> = avatars
            .iter()
            .enumerate()
            .map(|(col, avatar)| {
                let index = row * AVATAR_COLUMNS + col;
                if index == form.avatar {
                    Span::styled(
                        format!("[{avatar}]"),
                        Style::default().fg(palette.accent).bold(),
                    )
                } else {
                    Span::raw(format!(" {avatar} "))
                }
            })
            .collect();
        content.push(Line::from(spans));
    }

    content.push(Line::from(""));
    content.push(Line::from(label(JoinField::Join, "[ Join ]")));

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.panel))
            .title(" Join ")
            .title_style(Style::default().fg(palette.accent))
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(widget, super::centered(area, 48, 15));
}
