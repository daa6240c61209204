use std::fmt;

use serde::{Deserialize, Serialize};

/// Every question carries exactly this many options.
pub const NUM_OPTIONS: usize = 4;

/// A multiple-choice question with a single correct option.
///
/// Field names follow the camelCase shape the model is asked to produce, so
/// generated batches and saved quiz files share one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: [String; NUM_OPTIONS],
    pub correct_answer_index: usize,
    pub hint: String,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer_index]
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer_index
    }
}

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}
