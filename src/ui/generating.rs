use std::time::Instant;

use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Percentage(40),
    ])
    .split(area);

    let elapsed = app
        .generating_since()
        .map(|since| Instant::now().saturating_duration_since(since))
        .unwrap_or_default();
    let spinner = SPINNER[(elapsed.as_millis() / 100) as usize % SPINNER.len()];

    let source = app
        .source()
        .map(|source| source.to_string())
        .unwrap_or_default();

    let content = vec![
        Line::from(Span::styled(
            "QUIZCRAFT",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} Generating {} {} questions... {}s",
                spinner,
                app.count(),
                app.difficulty(),
                elapsed.as_secs()
            ),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(source, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from("esc quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
