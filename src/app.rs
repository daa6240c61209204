use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::conversation::{Conversation, TopicRequest};
use crate::generator::{GenerationRequest, DEFAULT_QUESTIONS};
use crate::models::{AppState, Difficulty, Question, UserAnswer, NUM_OPTIONS};
use crate::source::SourceSpec;

/// Delay between answering a question and moving on to the next one.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(2);
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

pub struct App {
    pub state: AppState,
    /// Source given on the command line; survives "new quiz".
    initial_source: Option<SourceSpec>,
    source: Option<SourceSpec>,
    count: usize,
    difficulty: Difficulty,
    conversation: Conversation,
    questions: Vec<Question>,
    current_question_index: usize,
    selected_option: usize,
    answers: Vec<Option<UserAnswer>>,
    hints_shown: Vec<bool>,
    advance_at: Option<Instant>,
    result_scroll: usize,
    pending_request: Option<GenerationRequest>,
    generating_since: Option<Instant>,
    notification: Option<Notification>,
}

impl App {
    /// Start from a source given up front, or from the topic dialogue when
    /// there is none.
    pub fn new(source: Option<SourceSpec>, count: usize, difficulty: Difficulty) -> Self {
        let mut app = Self::empty(count, difficulty);
        app.initial_source = source.clone();
        app.source = source;

        if app.source.is_some() {
            app.state = AppState::Welcome;
        } else {
            app.conversation.start(Instant::now());
        }
        app
    }

    /// Start with a ready-made set of questions.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let mut app = Self::empty(DEFAULT_QUESTIONS, Difficulty::default());
        app.state = AppState::Welcome;
        app.load_questions(questions);
        app
    }

    fn empty(count: usize, difficulty: Difficulty) -> Self {
        Self {
            state: AppState::Conversation,
            initial_source: None,
            source: None,
            count,
            difficulty,
            conversation: Conversation::new(),
            questions: Vec::new(),
            current_question_index: 0,
            selected_option: 0,
            answers: Vec::new(),
            hints_shown: Vec::new(),
            advance_at: None,
            result_scroll: 0,
            pending_request: None,
            generating_since: None,
            notification: None,
        }
    }

    pub fn source(&self) -> Option<&SourceSpec> {
        self.source.as_ref()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_question_index]
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question_number(&self) -> usize {
        self.current_question_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions.len()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<UserAnswer>] {
        &self.answers
    }

    pub fn current_answer(&self) -> Option<&UserAnswer> {
        self.answers
            .get(self.current_question_index)
            .and_then(Option::as_ref)
    }

    pub fn hint_visible(&self) -> bool {
        self.hints_shown
            .get(self.current_question_index)
            .copied()
            .unwrap_or(false)
    }

    pub fn advance_pending(&self) -> bool {
        self.advance_at.is_some()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn generating_since(&self) -> Option<Instant> {
        self.generating_since
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    // -- notifications -----------------------------------------------------

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    // -- topic dialogue ----------------------------------------------------

    pub fn conversation_input(&mut self, c: char, now: Instant) {
        let mut text = self.conversation.pending().to_string();
        text.push(c);
        if let Some(request) = self.conversation.on_transcript(&text, false, now) {
            self.begin_topic(request, now);
        }
    }

    pub fn conversation_backspace(&mut self, now: Instant) {
        let mut text = self.conversation.pending().to_string();
        text.pop();
        if let Some(request) = self.conversation.on_transcript(&text, false, now) {
            self.begin_topic(request, now);
        }
    }

    pub fn conversation_submit(&mut self, now: Instant) {
        let text = self.conversation.pending().to_string();
        if let Some(request) = self.conversation.on_transcript(&text, true, now) {
            self.begin_topic(request, now);
        }
    }

    /// Stop the dialogue for good, e.g. when the user leaves.
    pub fn close_conversation(&mut self) {
        self.conversation.close();
    }

    fn begin_topic(&mut self, request: TopicRequest, now: Instant) {
        info!(
            "Topic dialogue finished: {} ({} {} questions)",
            request.topic, request.count, request.difficulty
        );
        self.source = Some(SourceSpec::Topic(request.topic));
        self.count = request.count;
        self.difficulty = request.difficulty;
        self.request_generation(now);
    }

    // -- generation --------------------------------------------------------

    /// Queue a generation request for the current source. Ignored while one
    /// is already in flight.
    pub fn request_generation(&mut self, now: Instant) {
        if self.state == AppState::Generating {
            return;
        }
        let Some(source) = self.source.clone() else {
            warn!("Generation requested without a source");
            return;
        };

        self.pending_request = Some(GenerationRequest::new(source, self.count, self.difficulty));
        self.generating_since = Some(now);
        self.state = AppState::Generating;
    }

    pub fn take_generation_request(&mut self) -> Option<GenerationRequest> {
        self.pending_request.take()
    }

    pub fn generation_succeeded(&mut self, questions: Vec<Question>, now: Instant) {
        if questions.is_empty() {
            self.generation_failed("the model returned no questions".to_string(), now);
            return;
        }
        let total = questions.len();
        self.generating_since = None;
        self.load_questions(questions);
        self.state = AppState::Welcome;
        self.notify(
            NotificationKind::Info,
            format!("{} questions ready", total),
            now,
        );
    }

    pub fn generation_failed(&mut self, message: String, now: Instant) {
        warn!("Generation failed: {}", message);
        self.generating_since = None;
        self.pending_request = None;
        self.state = AppState::Welcome;
        self.notify(NotificationKind::Error, message, now);
    }

    fn load_questions(&mut self, questions: Vec<Question>) {
        let total = questions.len();
        self.questions = questions;
        self.answers = vec![None; total];
        self.hints_shown = vec![false; total];
        self.current_question_index = 0;
        self.selected_option = 0;
        self.advance_at = None;
        self.result_scroll = 0;
    }

    // -- quiz taking -------------------------------------------------------

    pub fn select_next_option(&mut self) {
        if self.current_answer().is_none() {
            self.selected_option = (self.selected_option + 1) % NUM_OPTIONS;
        }
    }

    pub fn select_previous_option(&mut self) {
        if self.current_answer().is_none() {
            self.selected_option = (self.selected_option + NUM_OPTIONS - 1) % NUM_OPTIONS;
        }
    }

    pub fn start_quiz(&mut self) {
        if self.questions.is_empty() {
            return;
        }
        self.state = AppState::Quiz;
        self.go_to(0);
    }

    /// Record the selected option for the current question. A question can
    /// only be answered once.
    pub fn submit_answer(&mut self, now: Instant) {
        if self.state != AppState::Quiz || self.current_answer().is_some() {
            return;
        }

        let index = self.current_question_index;
        let question = &self.questions[index];
        let answer = UserAnswer {
            question_index: index,
            selected_index: self.selected_option,
            is_correct: question.is_correct(self.selected_option),
            hint_used: self.hints_shown[index],
        };
        debug!("Answered question {} with {:?}", index + 1, answer);
        self.answers[index] = Some(answer);

        if !self.is_last_question() {
            self.advance_at = Some(now + AUTO_ADVANCE_DELAY);
        }
    }

    pub fn show_hint(&mut self) {
        if let Some(shown) = self.hints_shown.get_mut(self.current_question_index) {
            *shown = true;
        }
    }

    pub fn next_question(&mut self) {
        if !self.is_last_question() {
            self.go_to(self.current_question_index + 1);
        }
    }

    pub fn previous_question(&mut self) {
        if self.current_question_index > 0 {
            self.go_to(self.current_question_index - 1);
        }
    }

    fn go_to(&mut self, index: usize) {
        self.advance_at = None;
        self.current_question_index = index;
        self.selected_option = self
            .answers
            .get(index)
            .and_then(|answer| answer.map(|a| a.selected_index))
            .unwrap_or(0);
    }

    pub fn finish_quiz(&mut self) {
        if self.state != AppState::Quiz {
            return;
        }
        self.advance_at = None;
        self.result_scroll = 0;
        self.state = AppState::Result;
        info!(
            "Quiz finished: {}/{} correct, {} hints used",
            self.calculate_score(),
            self.total_questions(),
            self.hints_used()
        );
    }

    pub fn calculate_score(&self) -> usize {
        self.answers
            .iter()
            .flatten()
            .filter(|answer| answer.is_correct)
            .count()
    }

    pub fn percentage(&self) -> f64 {
        score_percentage(self.calculate_score(), self.total_questions())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    pub fn hints_used(&self) -> usize {
        self.answers
            .iter()
            .flatten()
            .filter(|answer| answer.hint_used)
            .count()
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.questions.len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Take the same quiz again.
    pub fn restart(&mut self) {
        let questions = std::mem::take(&mut self.questions);
        self.load_questions(questions);
        self.state = AppState::Welcome;
    }

    /// Drop the current questions and go back to choosing a source.
    pub fn new_quiz(&mut self, now: Instant) {
        self.load_questions(Vec::new());
        self.source = self.initial_source.clone();

        if self.source.is_some() {
            self.state = AppState::Welcome;
        } else {
            self.conversation = Conversation::new();
            self.conversation.start(now);
            self.state = AppState::Conversation;
        }
    }

    /// Advance timers: notification expiry, the topic dialogue and the
    /// auto-advance after an answer.
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }

        match self.state {
            AppState::Conversation => {
                if let Some(request) = self.conversation.tick(now) {
                    self.begin_topic(request, now);
                }
            }
            AppState::Quiz => {
                if self.advance_at.is_some_and(|at| now >= at) {
                    self.advance_at = None;
                    self.next_question();
                }
            }
            _ => {}
        }
    }
}

/// Share of correct answers in percent; zero for an empty quiz.
pub fn score_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
