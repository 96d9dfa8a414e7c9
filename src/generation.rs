// src/generation.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::models::quiz::QuizQuestion;

/// Generated quizzes always carry exactly this many questions, each with
/// exactly four options. The external service is instructed accordingly
/// and its output is validated against the same shape.
pub const QUESTIONS_PER_QUIZ: usize = 5;
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug)]
pub enum GenerationError {
    /// The external call failed (network, HTTP status, missing payload).
    Upstream(String),

    /// The call exceeded its configured deadline.
    Timeout,

    /// The service answered, but not with a parsable, well-shaped
    /// question array.
    Format(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Upstream(msg) => write!(f, "generation upstream error: {msg}"),
            GenerationError::Timeout => write!(f, "generation call timed out"),
            GenerationError::Format(msg) => write!(f, "generation format error: {msg}"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// The sole boundary to the external generative-AI service. Everything
/// else in the system depends only on this capability, so tests swap in a
/// deterministic fake.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, content: &str) -> Result<Vec<QuizQuestion>, GenerationError>;
}

// Wire shapes for the Gemini generateContent endpoint.

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Generator backed by Google's Gemini API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    async fn call(&self, prompt: &str) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest {
                contents: vec![Content {
                    parts: vec![Part {
                        text: prompt.to_string(),
                    }],
                }],
            })
            .send()
            .await
    }
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    async fn generate(&self, content: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
        let prompt = build_prompt(content);

        let response = match self.call(&prompt).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(GenerationError::Timeout),
            Err(e) if e.is_connect() => {
                // One bounded retry on transient network failure.
                tracing::warn!("Generation call failed to connect, retrying once: {}", e);
                self.call(&prompt).await.map_err(|e| {
                    if e.is_timeout() {
                        GenerationError::Timeout
                    } else {
                        GenerationError::Upstream(e.to_string())
                    }
                })?
            }
            Err(e) => return Err(GenerationError::Upstream(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!(
                "generation endpoint answered {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                GenerationError::Format("response contained no generated text".to_string())
            })?;

        parse_questions(&text)
    }
}

/// Instruction prompt embedding the host's pasted study content. Mirrors
/// the constraints the validator enforces: a bare JSON array of exactly 5
/// objects, no prose, no markdown fences.
fn build_prompt(content: &str) -> String {
    format!(
        "Generate exactly {QUESTIONS_PER_QUIZ} multiple choice questions based on the following content.\n\n\
         Content: {content}\n\n\
         Return ONLY a valid JSON array with no additional text, markdown formatting, or code blocks. \
         The response must start with [ and end with ].\n\n\
         Use this exact format:\n\
         [\n\
           {{\n\
             \"question\": \"What is...\",\n\
             \"options\": [\"A) First option\", \"B) Second option\", \"C) Third option\", \"D) Fourth option\"],\n\
             \"correctAnswer\": 0\n\
           }}\n\
         ]\n\n\
         Where correctAnswer is the index (0-3) of the correct option. \
         Generate {QUESTIONS_PER_QUIZ} questions now:"
    )
}

/// Parses the raw model output into validated questions. Fence stripping
/// happens first, so a fenced and an unfenced response are
/// indistinguishable to the caller.
fn parse_questions(raw: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
    let cleaned = strip_code_fences(raw);

    let questions: Vec<QuizQuestion> = serde_json::from_str(cleaned)
        .map_err(|e| GenerationError::Format(format!("response is not a question array: {e}")))?;

    validate_questions(&questions)?;

    Ok(questions)
}

/// Removes a wrapping markdown code fence (with or without a language
/// tag) that the service sometimes adds despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json" etc.) up to the first newline.
        text = rest.split_once('\n').map_or("", |(_, body)| body);
        text = text.trim_end();
        if let Some(body) = text.strip_suffix("```") {
            text = body;
        }
    }

    text.trim()
}

fn validate_questions(questions: &[QuizQuestion]) -> Result<(), GenerationError> {
    if questions.len() != QUESTIONS_PER_QUIZ {
        return Err(GenerationError::Format(format!(
            "expected {} questions, got {}",
            QUESTIONS_PER_QUIZ,
            questions.len()
        )));
    }

    for (index, question) in questions.iter().enumerate() {
        if question.question.trim().is_empty() {
            return Err(GenerationError::Format(format!(
                "question {index} has empty text"
            )));
        }
        if question.options.len() != OPTIONS_PER_QUESTION {
            return Err(GenerationError::Format(format!(
                "question {index} has {} options, expected {}",
                question.options.len(),
                OPTIONS_PER_QUESTION
            )));
        }
        if !(0..OPTIONS_PER_QUESTION as i64).contains(&question.correct_answer) {
            return Err(GenerationError::Format(format!(
                "question {index} has correct answer index {} out of range",
                question.correct_answer
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_array_json() -> String {
        let questions: Vec<serde_json::Value> = (0..5)
            .map(|i| {
                serde_json::json!({
                    "question": format!("What is {}?", i),
                    "options": ["A) a", "B) b", "C) c", "D) d"],
                    "correctAnswer": i % 4,
                })
            })
            .collect();
        serde_json::to_string(&questions).unwrap()
    }

    #[test]
    fn fence_stripping_is_transparent() {
        let bare = sample_array_json();
        let fenced = format!("```json\n{bare}\n```");

        let from_bare = parse_questions(&bare).unwrap();
        let from_fenced = parse_questions(&fenced).unwrap();

        assert_eq!(from_bare, from_fenced);
        assert_eq!(from_bare.len(), QUESTIONS_PER_QUIZ);
    }

    #[test]
    fn fence_without_language_tag_is_stripped() {
        let fenced = format!("```\n{}\n```", sample_array_json());
        assert!(parse_questions(&fenced).is_ok());
    }

    #[test]
    fn prose_response_is_a_format_error() {
        let err = parse_questions("Here are your questions!").unwrap_err();
        assert!(matches!(err, GenerationError::Format(_)));
    }

    #[test]
    fn wrong_question_count_is_rejected() {
        let three: Vec<serde_json::Value> = (0..3)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Q{}", i),
                    "options": ["A) a", "B) b", "C) c", "D) d"],
                    "correctAnswer": 0,
                })
            })
            .collect();
        let err = parse_questions(&serde_json::to_string(&three).unwrap()).unwrap_err();
        assert!(matches!(err, GenerationError::Format(_)));
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        let mut questions: Vec<serde_json::Value> =
            serde_json::from_str(&sample_array_json()).unwrap();
        questions[2]["options"] = serde_json::json!(["A) a", "B) b"]);
        let err = parse_questions(&serde_json::to_string(&questions).unwrap()).unwrap_err();
        assert!(matches!(err, GenerationError::Format(_)));
    }

    #[test]
    fn out_of_range_answer_index_is_rejected() {
        let mut questions: Vec<serde_json::Value> =
            serde_json::from_str(&sample_array_json()).unwrap();
        questions[0]["correctAnswer"] = serde_json::json!(4);
        let err = parse_questions(&serde_json::to_string(&questions).unwrap()).unwrap_err();
        assert!(matches!(err, GenerationError::Format(_)));
    }

    #[test]
    fn prompt_embeds_the_study_content() {
        let prompt = build_prompt("Mitochondria are the powerhouse of the cell.");
        assert!(prompt.contains("Mitochondria are the powerhouse of the cell."));
        assert!(prompt.contains("exactly 5 multiple choice questions"));
        assert!(prompt.contains("correctAnswer"));
    }
}
