use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(72),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let source = app
        .source()
        .map(|source| source.to_string())
        .unwrap_or_else(|| "saved quiz".to_string());

    let (summary, action) = if app.has_questions() {
        (
            format!("{} questions ready", app.total_questions()),
            "to start",
        )
    } else {
        (
            format!("{} {} questions", app.count(), app.difficulty()),
            "to generate",
        )
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZCRAFT",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(source, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(summary, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(action.fg(Color::DarkGray)),
        Line::from(""),
        Line::from("g regenerate  ·  n new quiz  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, columns[1]);
}
