use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Question, UserAnswer};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let question = app.current_question();
    let answer = app.current_answer();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.question);
    render_options(frame, chunks[2], question, app.selected_option(), answer);
    render_feedback(frame, chunks[3], app, question, answer);
    render_controls(frame, chunks[4], app);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let progress = format!(
        "{}/{}  ·  {} answered",
        app.current_question_number(),
        app.total_questions(),
        app.answered_count()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: usize,
    answer: Option<&UserAnswer>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == selected;
        let style = match answer {
            Some(_) if index == question.correct_answer_index => {
                Style::default().fg(Color::Green).bold()
            }
            Some(answer) if index == answer.selected_index => Style::default().fg(Color::Red).bold(),
            Some(_) => Style::default().fg(Color::DarkGray),
            None if is_selected => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_feedback(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    question: &Question,
    answer: Option<&UserAnswer>,
) {
    let mut lines = Vec::new();

    if let Some(answer) = answer {
        let verdict = if answer.is_correct {
            Span::styled("Correct!", Style::default().fg(Color::Green).bold())
        } else {
            Span::styled(
                format!("Incorrect. The answer is {}.", question.correct_option()),
                Style::default().fg(Color::Red).bold(),
            )
        };
        lines.push(Line::from(verdict));
        if app.advance_pending() {
            lines.push(Line::from("Next question coming up...".fg(Color::DarkGray)));
        } else if app.is_last_question() {
            lines.push(Line::from("Press enter to see your results.".fg(Color::DarkGray)));
        }
        lines.push(Line::from(""));
    }

    if app.hint_visible() && !question.hint.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Hint: ", Style::default().fg(Color::Yellow).bold()),
            Span::styled(question.hint.as_str(), Style::default().fg(Color::Yellow)),
        ]));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.current_answer().is_some() {
        "←/→ previous/next  ·  f finish  ·  q quit"
    } else {
        "j/k navigate  ·  enter answer  ·  h hint  ·  ←/→ previous/next  ·  f finish  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
