//! Overlays drawn on top of the current screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::game::bonus;
use crate::game::theme::Ambient;
use crate::game::Palette;
use crate::protocol::Bonus;

use super::centered;

/// Modal alert, dismissed with Enter.
pub fn render_alert(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let width = (message.chars().count() as u16 + 8).max(30);
    let popup = centered(area, width, 7);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(palette.ink).bold())),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(palette.muted))),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .bg(palette.bg),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

/// Winner banner.
pub fn render_celebration(frame: &mut Frame, area: Rect, winner: &str, palette: &Palette) {
    let title = format!("{} WINS!", winner.to_uppercase());
    let width = (title.chars().count() as u16 + 12).max(28);
    let popup = centered(area, width, 7);

    let content = vec![
        Line::from("🎉 🏆 🎉"),
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(palette.accent).bold())),
        Line::from(""),
        Line::from("⭐ 🌟 ⭐"),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.good))
            .bg(palette.bg),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

/// Point breakdown for the winner, in the top-right corner.
pub fn render_bonus(frame: &mut Frame, area: Rect, bonus: &Bonus, palette: &Palette) {
    let rows = bonus::breakdown(bonus);
    let height = 4 + rows.len() as u16;
    let width = 34.min(area.width);
    let popup = Rect {
        x: area.x + area.width - width,
        y: area.y + 3.min(area.height),
        width,
        height: height.min(area.height.saturating_sub(3)),
    };

    let mut content = vec![Line::from(Span::styled(
        bonus::headline(bonus),
        Style::default().fg(palette.good).bold(),
    ))];
    content.push(Line::from(""));
    content.extend(rows.into_iter().map(|row| {
        Line::from(vec![
            Span::styled(format!("{:<24}", row.label), Style::default().fg(palette.ink)),
            Span::styled(row.value, Style::default().fg(palette.accent).bold()),
        ])
    }));

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.good))
            .title(" Points ")
            .bg(palette.bg),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

/// Ambient particles; only blank cells are drawn on.
pub fn render_ambient(frame: &mut Frame, area: Rect, ambient: &Ambient, elapsed: f32, palette: &Palette) {
    if area.width < 2 || area.height == 0 {
        return;
    }
    let glyph = ambient.kind.glyph();
    let buffer = frame.buffer_mut();

    for (x, y) in ambient.positions(elapsed) {
        let col = area.x + (x * f32::from(area.width - 1)) as u16;
        let row = area.y + (y * f32::from(area.height)) as u16;
        let blank = |x: u16| {
            buffer
                .cell((x, row))
                .is_some_and(|cell| cell.symbol() == " ")
        };
        if col + 1 < area.right() && blank(col) && blank(col + 1) {
            buffer.set_string(col, row, glyph, Style::default().fg(palette.muted));
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::game::theme::{AmbientKind, Particle};

    fn still(kind: AmbientKind, spots: &[(f32, f32)]) -> Ambient {
        Ambient {
            kind,
            particles: spots
                .iter()
                .map(|&(left, top)| Particle {
                    left,
                    top,
                    period: 1.0,
                    delay: 100.0,
                })
                .collect(),
        }
    }

    fn draw(ambient: &Ambient, content: Option<&str>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                if let Some(text) = content {
                    let lines: Vec<Line> = (0..area.height).map(|_| Line::from(text.to_string())).collect();
                    frame.render_widget(Paragraph::new(lines), area);
                }
                render_ambient(frame, area, ambient, 0.0, &Palette::default());
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_particles_land_on_blank_cells() {
        let ambient = still(AmbientKind::Bats, &[(0.5, 0.5)]);
        let buffer = draw(&ambient, None);
        assert_eq!(buffer.cell((9, 5)).unwrap().symbol(), "🦇");
    }

    #[test]
    fn test_particles_never_cover_content() {
        let spots = [(0.0, 0.0), (0.3, 0.2), (0.5, 0.5), (0.9, 0.9)];
        for kind in [AmbientKind::Bats, AmbientKind::Snow] {
            let buffer = draw(&still(kind, &spots), Some(&"x".repeat(20)));
            for cell in buffer.content() {
                assert_eq!(cell.symbol(), "x");
            }
        }
    }

    #[test]
    fn test_particle_skips_cell_next_to_text() {
        // Row 5 reads "abcdefghij" then blanks; the glyph needs two blank cells.
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        let ambient = still(AmbientKind::Snow, &[(0.5, 0.5), (0.5, 0.0)]);
        terminal
            .draw(|frame| {
                let area = frame.area();
                frame.buffer_mut().set_string(0, 5, "abcdefghij", Style::default());
                render_ambient(frame, area, &ambient, 0.0, &Palette::default());
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer.cell((9, 5)).unwrap().symbol(), "j");
        assert_eq!(buffer.cell((10, 5)).unwrap().symbol(), " ");
        assert_eq!(buffer.cell((9, 0)).unwrap().symbol(), AmbientKind::Snow.glyph());
    }
}
