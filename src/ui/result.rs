use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.calculate_score();
    let total = app.total_questions();
    let percentage = app.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app, score, total, percentage, grade_color);
    render_question_breakdown(frame, chunks[2], app, app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    score: usize,
    total: usize,
    percentage: f64,
    grade_color: Color,
) {
    let unanswered = total - app.answered_count();
    let mut details = format!("{} hints used", app.hints_used());
    if unanswered > 0 {
        details.push_str(&format!("  ·  {} unanswered", unanswered));
    }

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", score, total, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(details, Style::default().fg(Color::DarkGray))),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App, scroll: usize) {
    let lines: Vec<Line> = app
        .answers()
        .iter()
        .zip(app.questions().iter())
        .enumerate()
        .map(|(index, (answer, question))| {
            let (symbol, color) = match answer {
                Some(answer) if answer.is_correct => ("+", Color::Green),
                Some(_) => ("-", Color::Red),
                None => ("·", Color::DarkGray),
            };
            let hint_marker = if answer.is_some_and(|a| a.hint_used) {
                " ?"
            } else {
                "  "
            };

            let preview = truncate_question(&question.question);

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(preview, Style::default().fg(Color::Gray)),
                Span::styled(hint_marker, Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retake  ·  n new quiz  ·  q quit  ·  ? hint used")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_colors() {
        assert_eq!(get_grade_color(100.0), Color::Green);
        assert_eq!(get_grade_color(75.0), Color::Cyan);
        assert_eq!(get_grade_color(50.0), Color::Yellow);
        assert_eq!(get_grade_color(20.0), Color::Red);
    }

    #[test]
    fn test_truncate_question() {
        assert_eq!(truncate_question("short"), "short");
        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        let preview = truncate_question(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
    }
}
