//! HTTP side of a generation request.

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::{API_KEY_HEADER, GeneratorConfig};
use crate::models::Question;
use crate::source;

use super::parse::{extract_json_array, validate_questions};
use super::prompt::build_prompt;
use super::{GenerationError, GenerationRequest};

/// Talks to the model. Cheap to clone; the HTTP client is shared.
#[derive(Clone)]
pub struct QuizGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl QuizGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Resolve the source, send one generation request and return the
    /// validated questions.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>, GenerationError> {
        let material = source::resolve(&self.client, &request.source).await?;
        let prompt = build_prompt(&material, request.count, request.difficulty);

        info!(
            "Requesting {} {} questions from {} ({})",
            request.count,
            request.difficulty,
            self.config.model,
            material.label()
        );
        debug!("Prompt is {} chars", prompt.chars().count());

        let response = self
            .client
            .post(self.config.generate_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Model replied {} with {} bytes", status, body.len());

        let questions = parse_generation_response(status, &body, request.count)?;
        info!("Generated {} questions", questions.len());
        Ok(questions)
    }
}

/// JSON body of a `generateContent` call carrying a single text prompt.
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ]
    })
}

/// Turn a raw HTTP reply into questions, keeping at most `count`.
pub fn parse_generation_response(
    status: StatusCode,
    body: &str,
    count: usize,
) -> Result<Vec<Question>, GenerationError> {
    let payload: Option<Value> = serde_json::from_str(body).ok();

    if !status.is_success() {
        return Err(api_error(status, payload.as_ref()));
    }

    let payload = payload
        .ok_or_else(|| GenerationError::MalformedResponse("body is not JSON".to_string()))?;

    let text = payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| {
            let reason = payload["candidates"][0]["finishReason"]
                .as_str()
                .or_else(|| payload["promptFeedback"]["blockReason"].as_str())
                .unwrap_or("no text in the first candidate");
            GenerationError::MalformedResponse(reason.to_string())
        })?;

    let array = extract_json_array(text).ok_or(GenerationError::NoQuestions)?;
    let value: Value = serde_json::from_str(array)?;
    let mut questions = validate_questions(&value)?;

    if questions.len() > count {
        debug!("Model returned {} questions, keeping {}", questions.len(), count);
        questions.truncate(count);
    } else if questions.len() < count {
        warn!("Asked for {} questions but the model returned {}", count, questions.len());
    }

    Ok(questions)
}

fn api_error(status: StatusCode, payload: Option<&Value>) -> GenerationError {
    let error = payload.map(|p| &p["error"]);
    let api_status = error.and_then(|e| e["status"].as_str());

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == Some("RESOURCE_EXHAUSTED") {
        warn!("Model API rate limit hit ({})", status);
        return GenerationError::RateLimited;
    }

    let message = error
        .and_then(|e| e["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    warn!("Model API error {}: {}", status, message);
    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::models::Difficulty;
    use crate::source::SourceSpec;

    fn reply_with_text(text: &str) -> String {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ], "role": "model" } }
            ]
        })
        .to_string()
    }

    fn question_json(n: usize) -> String {
        format!(
            r#"{{"question": "Question {}?", "options": ["a", "b", "c", "d"], "correctAnswerIndex": {}, "hint": "think"}}"#,
            n,
            n % 4
        )
    }

    fn batch(n: usize) -> String {
        let items: Vec<String> = (0..n).map(question_json).collect();
        format!("```json\n[{}]\n```", items.join(","))
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_key() {
        let generator = QuizGenerator::new(GeneratorConfig {
            api_key: "SECRET-KEY-123".to_string(),
            model: "m".to_string(),
            endpoint: "http://127.0.0.1:1/v1beta".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let request = GenerationRequest::new(
            SourceSpec::Topic("volcanoes".to_string()),
            3,
            Difficulty::Easy,
        );

        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
        let message = err.to_string();
        assert!(!message.contains("SECRET-KEY-123"), "{}", message);
        assert!(!message.contains("key="), "{}", message);
        assert!(!format!("{:?}", err).contains("SECRET-KEY-123"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_parses_questions_from_candidate_text() {
        let body = reply_with_text(&batch(3));
        let questions = parse_generation_response(StatusCode::OK, &body, 3).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].question, "Question 2?");
        assert_eq!(questions[2].correct_answer_index, 2);
    }

    #[test]
    fn test_extra_questions_are_truncated() {
        let body = reply_with_text(&batch(6));
        let questions = parse_generation_response(StatusCode::OK, &body, 4).unwrap();
        assert_eq!(questions.len(), 4);
    }

    #[test]
    fn test_fewer_questions_are_accepted() {
        let body = reply_with_text(&batch(2));
        let questions = parse_generation_response(StatusCode::OK, &body, 5).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let body = json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}});
        let result = parse_generation_response(StatusCode::TOO_MANY_REQUESTS, &body.to_string(), 5);
        assert!(matches!(result, Err(GenerationError::RateLimited)));

        let result = parse_generation_response(StatusCode::TOO_MANY_REQUESTS, "", 5);
        assert!(matches!(result, Err(GenerationError::RateLimited)));
    }

    #[test]
    fn test_resource_exhausted_body_is_rate_limited() {
        let body = json!({"error": {"code": 403, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}});
        let result = parse_generation_response(StatusCode::FORBIDDEN, &body.to_string(), 5);
        assert!(matches!(result, Err(GenerationError::RateLimited)));
    }

    #[test]
    fn test_api_error_message_is_surfaced() {
        let body = json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}});
        match parse_generation_response(StatusCode::BAD_REQUEST, &body.to_string(), 5) {
            Err(GenerationError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_without_body_uses_reason() {
        match parse_generation_response(StatusCode::INTERNAL_SERVER_ERROR, "oops", 5) {
            Err(GenerationError::Api { message, .. }) => {
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_is_malformed() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string();
        match parse_generation_response(StatusCode::OK, &body, 5) {
            Err(GenerationError::MalformedResponse(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("unexpected result: {:?}", other),
        }

        let result = parse_generation_response(StatusCode::OK, "<html>", 5);
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
    }

    #[test]
    fn test_reply_without_array() {
        let body = reply_with_text("I could not find enough material.");
        let result = parse_generation_response(StatusCode::OK, &body, 5);
        assert!(matches!(result, Err(GenerationError::NoQuestions)));
    }

    #[test]
    fn test_broken_array_json() {
        let body = reply_with_text("[{\"question\": \"unterminated\"]");
        let result = parse_generation_response(StatusCode::OK, &body, 5);
        assert!(matches!(result, Err(GenerationError::InvalidJson(_))));
    }

    #[test]
    fn test_shape_error_propagates() {
        let body = reply_with_text(r#"[{"question": "q", "options": ["a"], "correctAnswerIndex": 0, "hint": ""}]"#);
        let result = parse_generation_response(StatusCode::OK, &body, 5);
        assert!(matches!(result, Err(GenerationError::Shape(_))));
    }
}
