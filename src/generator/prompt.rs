use crate::models::Difficulty;
use crate::source::SourceMaterial;

const RESPONSE_FORMAT: &str = r#"Respond with a JSON array only, no prose and no code fences. Each element must be an object of this shape:
{"question": "...", "options": ["...", "...", "...", "..."], "correctAnswerIndex": 0, "hint": "..."}
Rules:
- "options" has exactly 4 distinct strings and exactly one of them is correct.
- "correctAnswerIndex" is the 0-based index of the correct option; vary it across questions.
- "hint" nudges toward the answer without giving it away."#;

/// Build the single free-text prompt sent with a generation request.
pub fn build_prompt(source: &SourceMaterial, count: usize, difficulty: Difficulty) -> String {
    let subject = match source {
        SourceMaterial::Document { name, text } => format!(
            "based on the following content of the document \"{}\":\n\n\"\"\"\n{}\n\"\"\"",
            name, text
        ),
        SourceMaterial::Link { url, text } => format!(
            "based on the following content of the web page {}:\n\n\"\"\"\n{}\n\"\"\"",
            url, text
        ),
        SourceMaterial::Topic(topic) => format!("about the topic \"{}\".", topic),
    };

    format!(
        "Generate exactly {} multiple-choice questions of {} difficulty {}\n\n{}",
        count, difficulty, subject, RESPONSE_FORMAT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_prompt() {
        let prompt = build_prompt(
            &SourceMaterial::Topic("photosynthesis".to_string()),
            7,
            Difficulty::Hard,
        );
        assert!(prompt.starts_with("Generate exactly 7 multiple-choice questions of hard difficulty"));
        assert!(prompt.contains("\"photosynthesis\""));
        assert!(prompt.contains("correctAnswerIndex"));
    }

    #[test]
    fn test_document_prompt_embeds_text() {
        let source = SourceMaterial::Document {
            name: "notes.txt".to_string(),
            text: "Mitochondria are the powerhouse of the cell.".to_string(),
        };
        let prompt = build_prompt(&source, 3, Difficulty::Easy);
        assert!(prompt.contains("notes.txt"));
        assert!(prompt.contains("Mitochondria are the powerhouse"));
        assert!(prompt.contains("easy difficulty"));
    }

    #[test]
    fn test_link_prompt_names_url() {
        let source = SourceMaterial::Link {
            url: "https://example.org/rust".to_string(),
            text: "Ownership rules".to_string(),
        };
        let prompt = build_prompt(&source, 5, Difficulty::Medium);
        assert!(prompt.contains("https://example.org/rust"));
        assert!(prompt.contains("Ownership rules"));
    }
}
