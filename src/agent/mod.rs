//! Conversational agent: a hosted chat model given a read-only venue snapshot.

pub mod http;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::aggregate::AggregatedVenue;
use crate::error::LunchError;
use crate::history;
use crate::record::HistoryEntry;

use self::http::{ChatClient, ChatRequest};

/// Cap on the serialized venue snapshot embedded in the prompt.
pub const MAX_SNAPSHOT_BYTES: usize = 256 * 1024;

/// How many history entries are shown to the model.
pub const PROMPT_HISTORY_ENTRIES: usize = 7;

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const DEFAULT_AGENT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Clone)]
pub struct AgentConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub provider: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One user message plus the snapshot it is asked against.
pub struct AgentRequest<'a> {
    pub question: &'a str,
    pub venues: &'a [AggregatedVenue],
    pub history: &'a [HistoryEntry],
    /// Calendar day shown to the model, `YYYY-MM-DD`.
    pub today: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub output: String,
    pub model: String,
}

pub struct ConversationalAgent {
    config: AgentConfig,
    client: ChatClient,
}

impl ConversationalAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            client: ChatClient::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask one question. Exactly one upstream call per invocation.
    pub async fn ask(&self, req: &AgentRequest<'_>) -> Result<AgentReply, LunchError> {
        let system_prompt = system_prompt(req.today, req.history);
        let prompt = user_prompt(req.question, req.venues)?;

        let output = self
            .client
            .complete(&ChatRequest {
                base_url: &self.config.base_url,
                api_key: &self.config.api_key,
                provider: &self.config.provider,
                model: &self.config.model,
                system_prompt: &system_prompt,
                prompt: &prompt,
                temperature: 0.0,
                deadline: Instant::now() + self.config.timeout,
            })
            .await?;

        Ok(AgentReply {
            output,
            model: self.config.model.clone(),
        })
    }
}

/// Persona, today's date, and the most recent meals.
pub fn system_prompt(today: &str, entries: &[HistoryEntry]) -> String {
    let today = korean_date(today);
    let recent = history::recent(entries, PROMPT_HISTORY_ENTRIES);
    let history_text = if recent.is_empty() {
        "아직 기록된 식사가 없습니다.".to_string()
    } else {
        recent
            .iter()
            .map(|e| format!("- {}: {} ({})", e.date, e.name, e.menu))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "너는 우리 팀의 점심/카페 추천 도우미야. 오늘 날짜는 {today}이야.\n\
         아래 JSON은 팀이 직접 등록한 식당 목록이고 평점은 리뷰 평균이야. \
         목록에 없는 식당을 지어내지 마.\n\n\
         [최근 우리 팀 식사 기록]\n{history_text}\n\n\
         최근에 먹은 메뉴는 피해서 추천하고, 한국어로 대답해."
    )
}

/// `2026-10-19` as `2026년 10월 19일`; anything unparseable is passed through.
fn korean_date(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y년 %m월 %d일").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Question plus the venue snapshot as JSON, trimmed to [`MAX_SNAPSHOT_BYTES`].
pub fn user_prompt(question: &str, venues: &[AggregatedVenue]) -> Result<String, LunchError> {
    let mut kept = venues.len();
    let mut snapshot = serde_json::to_string(venues)
        .map_err(|e| LunchError::Other(format!("failed to serialize venues: {e}")))?;
    while snapshot.len() > MAX_SNAPSHOT_BYTES && kept > 0 {
        kept /= 2;
        snapshot = serde_json::to_string(&venues[..kept])
            .map_err(|e| LunchError::Other(format!("failed to serialize venues: {e}")))?;
    }
    if kept < venues.len() {
        tracing::warn!(
            total = venues.len(),
            kept,
            "venue snapshot truncated for agent prompt"
        );
    }

    Ok(format!(
        "<venues count=\"{kept}\">\n{snapshot}\n</venues>\n\n질문: {question}"
    ))
}
