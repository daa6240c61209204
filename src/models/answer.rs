use serde::{Deserialize, Serialize};

/// A recorded answer to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_index: usize,
    pub selected_index: usize,
    pub is_correct: bool,
    /// The hint was revealed before this answer was submitted.
    pub hint_used: bool,
}
