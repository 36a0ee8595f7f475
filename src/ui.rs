use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use speedtype::classify::Classification;
use speedtype::layout::{LayoutParams, TextLayout};
use speedtype::session::TestState;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const LEGEND: &str = "enter/click start · tab/→ new · ← repeat · F1 words · F2 time · F3 numbers · F4 punctuation · ↑/↓ size · esc quit";

fn class_style(class: Classification) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match class {
        Classification::Correct => bold.fg(Color::Green),
        Classification::Wrong => bold.fg(Color::Red),
        Classification::Extra => bold.fg(Color::Red).add_modifier(Modifier::DIM),
        Classification::Pending => bold.add_modifier(Modifier::DIM),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn draw(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);

    let view = app
        .session
        .view(LayoutParams::new(1, usize::from(text_width)));
    let text_rows = if app.session.mode().uses_viewport() {
        app.session.viewport().rows() as u16
    } else {
        (view.lines.len() as u16).max(1)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),         // header
            Constraint::Min(0),            // padding
            Constraint::Length(1),         // countdown / status
            Constraint::Length(1),         // padding
            Constraint::Length(text_rows), // sentence
            Constraint::Length(1),         // padding
            Constraint::Length(3),         // results
            Constraint::Min(0),            // padding
            Constraint::Length(1),         // legend
        ])
        .split(area);

    let dim = Style::default().add_modifier(Modifier::DIM);
    let config = app.session.config();

    let header = format!(
        "{} · numbers {} · punctuation {}",
        config.mode,
        on_off(config.include_numbers),
        on_off(config.include_punctuation)
    );
    f.render_widget(
        Paragraph::new(Span::styled(header, dim)).alignment(Alignment::Center),
        chunks[0],
    );

    let status = if let Some(notice) = &app.notice {
        Span::styled(notice.clone(), Style::default().fg(Color::Yellow))
    } else {
        match (app.session.state(), app.session.seconds_remaining()) {
            (TestState::Idle, _) if !app.session.is_armed() => Span::styled(
                "click the text or press enter, then start typing",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ),
            (_, Some(secs)) => Span::styled(secs.to_string(), dim.add_modifier(Modifier::BOLD)),
            _ => Span::raw(""),
        }
    };
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        chunks[2],
    );

    let text_area = chunks[4];
    app.typing_area = text_area;
    render_text(f, &view, text_area, app.session.state() != TestState::Ended);

    if let Some(metrics) = app.session.metrics() {
        let lines: Vec<Line> = metrics
            .summary_lines()
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().add_modifier(Modifier::BOLD))))
            .collect();
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            chunks[6],
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(LEGEND, dim.add_modifier(Modifier::ITALIC)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[8],
    );
}

fn render_text(f: &mut Frame, view: &TextLayout, area: Rect, show_cursor: bool) {
    // a sentence that fits on one row is centered
    let x_offset = match view.lines.as_slice() {
        [only] => area.width.saturating_sub(only.text().width() as u16) / 2,
        _ => 0,
    };

    let lines: Vec<Line> = view
        .lines
        .iter()
        .map(|line| {
            Line::from(
                line.cells
                    .iter()
                    .map(|cell| Span::styled(cell.shown().to_string(), class_style(cell.class)))
                    .collect::<Vec<Span>>(),
            )
        })
        .collect();

    let text_area = Rect {
        x: area.x + x_offset,
        width: area.width - x_offset,
        ..area
    };
    f.render_widget(Paragraph::new(lines), text_area);

    if show_cursor {
        let x = text_area.x.saturating_add(view.cursor.x as u16);
        let y = text_area.y.saturating_add(view.cursor.y as u16);
        if x < area.right() && y < area.bottom() {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}
