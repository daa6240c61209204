//! Transcript of the topic dialogue.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::conversation::Speaker;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let conversation = app.conversation();

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "QUIZCRAFT",
            Style::default().fg(Color::Cyan).bold(),
        ))
        .alignment(Alignment::Center),
        chunks[0],
    );

    let lines: Vec<Line> = conversation
        .transcript()
        .iter()
        .flat_map(|turn| {
            let (who, color) = match turn.speaker {
                Speaker::Assistant => ("quiz", Color::Cyan),
                Speaker::User => (" you", Color::Yellow),
            };
            [
                Line::from(vec![
                    Span::styled(format!("{} │ ", who), Style::default().fg(Color::DarkGray)),
                    Span::styled(turn.text.as_str(), Style::default().fg(color)),
                ]),
                Line::from(""),
            ]
        })
        .collect();

    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });
    let scroll = bottom_scroll(&transcript, chunks[1]);
    frame.render_widget(transcript.scroll((scroll, 0)), chunks[1]);

    let (indicator, color) = if conversation.is_listening() {
        ("● listening", Color::Green)
    } else {
        ("○ waiting", Color::DarkGray)
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(conversation.pending(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(color)
            .title(Span::styled(indicator, Style::default().fg(color)))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(input, chunks[2]);

    let controls = Paragraph::new("type to answer  ·  pause or enter to send  ·  esc quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}

/// Scroll offset that keeps the last wrapped row of `paragraph` in view.
fn bottom_scroll(paragraph: &Paragraph, area: Rect) -> u16 {
    let rows = paragraph.line_count(area.width);
    u16::try_from(rows.saturating_sub(area.height as usize)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_scroll_counts_wrapped_rows() {
        let area = Rect::new(0, 0, 10, 4);
        let paragraph = Paragraph::new(Line::from("x".repeat(100))).wrap(Wrap { trim: false });

        // One logical line, ten rows once wrapped.
        assert_eq!(bottom_scroll(&paragraph, area), 6);
    }

    #[test]
    fn test_short_transcript_does_not_scroll() {
        let area = Rect::new(0, 0, 40, 10);
        let paragraph = Paragraph::new(vec![Line::from("hello"), Line::from("")])
            .wrap(Wrap { trim: false });
        assert_eq!(bottom_scroll(&paragraph, area), 0);
    }
}
