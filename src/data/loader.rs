use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;
use thiserror::Error;

use crate::generator::{validate_questions, ShapeError};
use crate::models::Question;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Shape { path: PathBuf, source: ShapeError },
}

/// Load a saved quiz. The file is checked with the same rules as a freshly
/// generated batch.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = validate_questions(&value).map_err(|source| LoadError::Shape {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

pub fn save_questions_to_json<P: AsRef<Path>>(path: P, questions: &[Question]) -> Result<(), LoadError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(questions).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, json).map_err(io_error)?;

    info!("Saved {} questions to {}", questions.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: usize) -> Question {
        Question {
            question: text.to_string(),
            options: [
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "delta".to_string(),
            ],
            correct_answer_index: correct,
            hint: "Greek letters".to_string(),
        }
    }

    #[test]
    fn test_save_then_load_keeps_questions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.json");
        let questions = vec![question("First letter?", 0), question("Fourth letter?", 3)];

        save_questions_to_json(&path, &questions).unwrap();
        let loaded = load_questions_from_json(&path).unwrap();
        assert_eq!(loaded, questions);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("correctAnswerIndex"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_questions_from_json("/definitely/not/here.json");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{").unwrap();
        assert!(matches!(
            load_questions_from_json(&path),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_quiz_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();
        match load_questions_from_json(&path) {
            Err(LoadError::Shape { source, .. }) => assert_eq!(source, ShapeError::Empty),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
