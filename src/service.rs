//! Request-level operations shared by the MCP tools.
//!
//! Each call takes a fresh snapshot from the store, computes, and optionally
//! writes back. Nothing is cached between calls.

use crate::agent::{AgentReply, AgentRequest, ConversationalAgent};
use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::LunchError;
use crate::history::{self, HistorySummary};
use crate::options::{Mode, OptionLists};
use crate::query::query;
use crate::record::{HistoryEntry, VenueRecord};
use crate::store::Store;
use crate::suggest::{Suggestions, suggestions};
use crate::tools::history::{HistoryResponse, MarkEatenRequest};
use crate::tools::recommend::{RecommendRequest, RecommendResponse};
use crate::tools::venues::RegisterVenueRequest;

pub struct Lunchbox {
    store: Store,
    options: OptionLists,
    agent: Option<ConversationalAgent>,
}

impl Lunchbox {
    pub fn new(store: Store, options: OptionLists, agent: Option<ConversationalAgent>) -> Self {
        Self {
            store,
            options,
            agent,
        }
    }

    pub fn from_config(config: Config) -> Self {
        let store = Store::new(config.store, config.list_sheet, config.history_sheet);
        tracing::info!(backend = store.backend_name(), "store configured");
        let agent = config.agent.map(ConversationalAgent::new);
        Self::new(store, config.options, agent)
    }

    pub fn options(&self) -> &OptionLists {
        &self.options
    }

    pub fn agent_model(&self) -> Option<&str> {
        self.agent.as_ref().map(|a| a.model())
    }

    /// Filtered, aggregated venues with recent visits flagged.
    pub async fn recommend(&self, req: &RecommendRequest) -> Result<RecommendResponse, LunchError> {
        let filters = req.filters().map_err(LunchError::Validation)?;
        let venues = aggregate(&self.store.load().await);
        let log = self.store.history().entries().await;
        let results = query(&venues, &filters, &self.options, &log);
        Ok(RecommendResponse {
            mode: filters.mode,
            count: results.len(),
            results,
        })
    }

    /// Append one review row. Returns the sheet's new row count.
    pub async fn register(&self, req: &RegisterVenueRequest) -> Result<usize, LunchError> {
        let record = req.to_record();
        let name = record.name.clone();
        let rows = self.store.append(record, &self.options).await?;
        tracing::info!(venue = %name, rows, "venue registered");
        Ok(rows)
    }

    /// Overwrite the venue sheet after validating every row. Rows are
    /// usually edited copies of `list`, so an unrated 0.0 is kept as-is.
    pub async fn replace(&self, records: &[VenueRecord]) -> Result<usize, LunchError> {
        for (i, record) in records.iter().enumerate() {
            record.validate_stored(&self.options).map_err(|e| match e {
                LunchError::Validation(msg) => LunchError::Validation(format!("row {}: {msg}", i + 1)),
                other => other,
            })?;
        }
        self.store.save(records).await?;
        Ok(records.len())
    }

    /// Raw rows in storage order.
    pub async fn list(&self) -> Vec<VenueRecord> {
        self.store.load().await
    }

    /// Log a visit to a registered venue on `today`.
    pub async fn mark_eaten(
        &self,
        req: &MarkEatenRequest,
        today: &str,
    ) -> Result<HistoryEntry, LunchError> {
        let name = req.name.trim();
        let venues = aggregate(&self.store.load().await);
        let venue = venues
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| LunchError::NotFound(format!("venue '{name}'")))?;
        self.store
            .history()
            .mark_eaten(venue, req.author.as_deref(), req.note.as_deref(), today)
            .await
    }

    /// Summary plus entries newest first, optionally capped at `limit`.
    pub async fn history(&self, limit: Option<usize>) -> HistoryResponse {
        let log = self.store.history().entries().await;
        let summary: HistorySummary = history::summarize(&log);
        let mut entries = history::by_date_desc(&log);
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        HistoryResponse { summary, entries }
    }

    /// One agent call over the current snapshot. The agent never writes.
    pub async fn ask(&self, question: &str, today: &str) -> Result<AgentReply, LunchError> {
        let agent = self.agent.as_ref().ok_or_else(|| {
            LunchError::Other("conversational agent is not configured".to_string())
        })?;
        let venues = aggregate(&self.store.load().await);
        if venues.is_empty() {
            return Err(LunchError::Other(
                "no venue data yet, register a venue first".to_string(),
            ));
        }
        let log = self.store.history().entries().await;
        agent
            .ask(&AgentRequest {
                question,
                venues: &venues,
                history: &log,
                today,
            })
            .await
    }

    pub async fn suggestions(&self, mode: Mode) -> Suggestions {
        suggestions(&self.store.load().await, &self.options, mode)
    }
}
