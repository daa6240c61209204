//! # quizcraft
//!
//! Generate multiple-choice quizzes from a document, a web page or a topic
//! with a large language model, then take them in the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizcraft::{App, Difficulty, GeneratorConfig, QuizError, QuizGenerator, Session, SourceSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = GeneratorConfig::resolve(None, None)?;
//!     let generator = QuizGenerator::new(config)?;
//!
//!     let source = SourceSpec::Topic("the water cycle".to_string());
//!     let app = App::new(Some(source), 5, Difficulty::Medium);
//!
//!     Session::new(app, Some(generator), None).run().await
//! }
//! ```

mod app;
pub mod config;
pub mod conversation;
mod data;
pub mod generator;
pub mod logging;
mod models;
pub mod source;
pub mod terminal;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{error, info};
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{score_percentage, App, Notification, NotificationKind};
pub use config::{ConfigError, GeneratorConfig};
pub use data::{load_questions_from_json, save_questions_to_json, LoadError};
pub use generator::{GenerationError, GenerationRequest, QuizGenerator};
pub use models::{AppState, Difficulty, Question, UserAnswer};
pub use source::{SourceError, SourceSpec};

/// How long the UI waits for a key before running timers again.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

type GenerationResult = Result<Vec<Question>, GenerationError>;

/// A running quiz: the app state plus whatever it needs to generate
/// questions.
pub struct Session {
    app: App,
    generator: Option<QuizGenerator>,
    save_path: Option<PathBuf>,
}

impl Session {
    /// `generator` may be absent when a saved quiz is loaded without an API
    /// key; generating then fails with a notification.
    pub fn new(app: App, generator: Option<QuizGenerator>, save_path: Option<PathBuf>) -> Self {
        Self {
            app,
            generator,
            save_path,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Take over the terminal and run until the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut terminal = terminal::init()?;
        let result = self.event_loop(&mut terminal).await;
        self.app.close_conversation();
        terminal::restore()?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut terminal::AppTerminal) -> Result<(), QuizError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<GenerationResult>();

        loop {
            terminal.draw(|frame| ui::render(frame, &self.app))?;

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && handle_input(&mut self.app, key.code, Instant::now())
                    {
                        break;
                    }
                }
            }

            self.app.tick(Instant::now());

            if let Some(request) = self.app.take_generation_request() {
                self.spawn_generation(request, tx.clone());
            }

            while let Ok(result) = rx.try_recv() {
                self.on_generated(result);
            }
        }

        Ok(())
    }

    fn spawn_generation(
        &mut self,
        request: GenerationRequest,
        tx: mpsc::UnboundedSender<GenerationResult>,
    ) {
        let Some(generator) = self.generator.clone() else {
            self.app
                .generation_failed(ConfigError::MissingApiKey.to_string(), Instant::now());
            return;
        };

        info!("Generating from {}", request.source);
        tokio::spawn(async move {
            let result = generator.generate(&request).await;
            // The receiver is gone once the user has quit.
            let _ = tx.send(result);
        });
    }

    fn on_generated(&mut self, result: GenerationResult) {
        let now = Instant::now();
        match result {
            Ok(questions) => {
                let save_error = self
                    .save_path
                    .as_ref()
                    .and_then(|path| save_questions_to_json(path, &questions).err());
                self.app.generation_succeeded(questions, now);

                if let Some(e) = save_error {
                    error!("{}", e);
                    self.app
                        .notify(NotificationKind::Error, format!("Could not save quiz: {}", e), now);
                }
            }
            Err(e) => {
                error!("{}", e);
                self.app.generation_failed(e.to_string(), now);
            }
        }
    }
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match app.state {
        AppState::Conversation => handle_conversation_input(app, key, now),
        AppState::Welcome => handle_welcome_input(app, key, now),
        AppState::Generating => matches!(key, KeyCode::Esc),
        AppState::Quiz => handle_quiz_input(app, key, now),
        AppState::Result => handle_result_input(app, key, now),
    }
}

fn handle_conversation_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Char(c) => {
            app.conversation_input(c, now);
            false
        }
        KeyCode::Backspace => {
            app.conversation_backspace(now);
            false
        }
        KeyCode::Enter => {
            app.conversation_submit(now);
            false
        }
        KeyCode::Esc => {
            app.close_conversation();
            true
        }
        _ => false,
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Enter => {
            if app.has_questions() {
                app.start_quiz();
            } else {
                app.request_generation(now);
            }
            false
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            app.request_generation(now);
            false
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.new_quiz(now);
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.current_answer().is_some() && app.is_last_question() {
                app.finish_quiz();
            } else {
                app.submit_answer(now);
            }
            false
        }
        KeyCode::Left | KeyCode::Char('p') => {
            app.previous_question();
            false
        }
        KeyCode::Right | KeyCode::Char('n') => {
            app.next_question();
            false
        }
        KeyCode::Char('h') | KeyCode::Char('?') => {
            app.show_hint();
            false
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.finish_quiz();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.new_quiz(now);
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}
