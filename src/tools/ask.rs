use schemars::JsonSchema;
use serde::Deserialize;

/// Maximum question length in characters.
pub const MAX_QUESTION_CHARS: usize = 2000;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AskRequest {
    /// Free-form question, e.g. "비 오는 날 회식하기 좋은 곳 추천해줘".
    pub question: String,
}

impl AskRequest {
    pub fn validate(&self) -> Result<&str, String> {
        let q = self.question.trim();
        if q.is_empty() {
            return Err("question must not be empty".to_string());
        }
        if q.chars().count() > MAX_QUESTION_CHARS {
            return Err(format!(
                "question too long (max {MAX_QUESTION_CHARS} characters)"
            ));
        }
        Ok(q)
    }
}
