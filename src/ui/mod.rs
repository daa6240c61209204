mod conversation;
mod generating;
mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block, widgets::Paragraph};

use crate::app::{App, NotificationKind};
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let [body, status] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    match app.state {
        AppState::Conversation => conversation::render(frame, body, app),
        AppState::Welcome => welcome::render(frame, body, app),
        AppState::Generating => generating::render(frame, body, app),
        AppState::Quiz => quiz::render(frame, body, app),
        AppState::Result => result::render(frame, body, app),
    }

    render_notification(frame, status, app);
}

fn render_notification(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notification) = app.notification() else {
        return;
    };

    let (label, color) = match notification.kind {
        NotificationKind::Info => ("info", Color::Green),
        NotificationKind::Error => ("error", Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", label), Style::default().fg(Color::Black).bg(color)),
        Span::styled(format!(" {}", notification.message), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
