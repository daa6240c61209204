mod answer;
mod question;

pub use answer::UserAnswer;
pub use question::{Difficulty, Question, NUM_OPTIONS};

/// Top-level screen the app is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Collecting a topic through the spoken-topic dialogue.
    Conversation,
    /// Source chosen (and possibly questions ready), waiting for the user.
    Welcome,
    /// A generation request is in flight.
    Generating,
    /// Answering questions.
    Quiz,
    /// Score and per-question breakdown.
    Result,
}
