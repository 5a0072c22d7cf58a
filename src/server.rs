use std::sync::Arc;
use std::time::Instant;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::config::Config;
use crate::error::LunchError;
use crate::history;
use crate::options::OptionLists;
use crate::response::{ToolMetadata, ToolResponse};
use crate::service::Lunchbox;
use crate::tools::ask::AskRequest;
use crate::tools::history::{HistoryRequest, MarkEatenRequest};
use crate::tools::options::{OptionsRequest, OptionsResponse};
use crate::tools::recommend::RecommendRequest;
use crate::tools::venues::{RegisterVenueRequest, ReplaceVenuesRequest};

#[derive(Clone)]
pub struct LunchServer {
    lunchbox: Arc<Lunchbox>,
    tool_router: ToolRouter<Self>,
}

/// Bad input becomes an MCP invalid-params error; everything else is reported
/// inside the envelope so the client can show it.
fn respond(
    tool_name: &str,
    start: Instant,
    result: Result<ToolResponse, LunchError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(response) => Ok(response.into_call_tool_result()),
        Err(e @ (LunchError::Validation(_) | LunchError::NotFound(_))) => {
            Err(McpError::invalid_params(e.user_message(), None))
        }
        Err(e) => {
            tracing::warn!("{tool_name} failed: {e}");
            Ok(ToolResponse::error(
                e.user_message(),
                ToolMetadata::new(tool_name, start.elapsed().as_secs_f64()),
            )
            .into_call_tool_result())
        }
    }
}

#[tool_router]
impl LunchServer {
    pub fn new(config: Config) -> Self {
        Self::with_lunchbox(Lunchbox::from_config(config))
    }

    pub fn with_lunchbox(lunchbox: Lunchbox) -> Self {
        Self {
            lunchbox: Arc::new(lunchbox),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "recommend",
        description = "Recommend lunch spots or cafes from the team's reviews. Filters are ANDed: mode, category, max distance, menu and vibe keywords (substring match, any of). Recently visited venues are kept and flagged with recently_visited.",
        annotations(read_only_hint = true)
    )]
    async fn recommend(
        &self,
        Parameters(req): Parameters<RecommendRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = self.lunchbox.recommend(&req).await.map(|resp| {
            ToolResponse::json(
                &resp,
                ToolMetadata::new("recommend", start.elapsed().as_secs_f64()),
            )
        });
        respond("recommend", start, result)
    }

    #[tool(
        name = "register_venue",
        description = "Register a review of a restaurant or cafe. Name, category and rating are required; use `options` for valid category, price, distance and other choices."
    )]
    async fn register_venue(
        &self,
        Parameters(req): Parameters<RegisterVenueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = self.lunchbox.register(&req).await.map(|rows| {
            ToolResponse::success(
                format!("'{}' registered ({rows} rows in sheet)", req.name.trim()),
                ToolMetadata::new("register_venue", start.elapsed().as_secs_f64()),
            )
        });
        respond("register_venue", start, result)
    }

    #[tool(
        name = "replace_venues",
        description = "Overwrite the whole venue sheet with the given rows (bulk edit). Read rows with `list_venues` first; concurrent edits are not merged."
    )]
    async fn replace_venues(
        &self,
        Parameters(req): Parameters<ReplaceVenuesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = self.lunchbox.replace(&req.venues).await.map(|rows| {
            ToolResponse::success(
                format!("saved {rows} rows"),
                ToolMetadata::new("replace_venues", start.elapsed().as_secs_f64()),
            )
        });
        respond("replace_venues", start, result)
    }

    #[tool(
        name = "list_venues",
        description = "List every raw review row in storage order.",
        annotations(read_only_hint = true)
    )]
    async fn list_venues(&self) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let rows = self.lunchbox.list().await;
        let response = ToolResponse::json(
            &rows,
            ToolMetadata::new("list_venues", start.elapsed().as_secs_f64()),
        );
        Ok(response.into_call_tool_result())
    }

    #[tool(
        name = "mark_eaten",
        description = "Log that the team ate at a registered venue today. Recent visits are flagged by `recommend`."
    )]
    async fn mark_eaten(
        &self,
        Parameters(req): Parameters<MarkEatenRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let today = history::today();
        let result = self.lunchbox.mark_eaten(&req, &today).await.map(|entry| {
            ToolResponse::success(
                format!("[{}] '{}' saved to history", entry.date, entry.name),
                ToolMetadata::new("mark_eaten", start.elapsed().as_secs_f64()),
            )
        });
        respond("mark_eaten", start, result)
    }

    #[tool(
        name = "history",
        description = "Meal history: total count, most visited venue, last visit date, and entries newest first.",
        annotations(read_only_hint = true)
    )]
    async fn history(
        &self,
        Parameters(req): Parameters<HistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let resp = self.lunchbox.history(req.limit).await;
        let response = ToolResponse::json(
            &resp,
            ToolMetadata::new("history", start.elapsed().as_secs_f64()),
        );
        Ok(response.into_call_tool_result())
    }

    #[tool(
        name = "ask",
        description = "Ask the lunch assistant a free-form question. It sees the aggregated venue list and recent meals, and answers in Korean. Read-only.",
        annotations(read_only_hint = true)
    )]
    async fn ask(
        &self,
        Parameters(req): Parameters<AskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let question = req
            .validate()
            .map_err(|msg| McpError::invalid_params(msg, None))?;
        let start = Instant::now();
        let today = history::today();
        let result = self.lunchbox.ask(question, &today).await.map(|reply| {
            ToolResponse::success(
                reply.output,
                ToolMetadata::new("ask", start.elapsed().as_secs_f64()),
            )
        });
        respond("ask", start, result)
    }

    #[tool(
        name = "options",
        description = "Valid choices for categories, price, distance, capacity, reservation, waiting, closed days and rating, plus keyword suggestions drawn from existing reviews.",
        annotations(read_only_hint = true)
    )]
    async fn options(
        &self,
        Parameters(req): Parameters<OptionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let mode = req.mode.unwrap_or_default();
        let resp = OptionsResponse {
            options: self.lunchbox.options(),
            rating_steps: OptionLists::rating_steps(),
            suggestions: self.lunchbox.suggestions(mode).await,
        };
        let response = ToolResponse::json(
            &resp,
            ToolMetadata::new("options", start.elapsed().as_secs_f64()),
        );
        Ok(response.into_call_tool_result())
    }
}

#[tool_handler]
impl ServerHandler for LunchServer {
    fn get_info(&self) -> ServerInfo {
        let agent_line = match self.lunchbox.agent_model() {
            Some(model) => format!("`ask` is backed by {model}."),
            None => "`ask` is unavailable (no API key configured).".to_string(),
        };
        ServerInfo {
            server_info: Implementation {
                name: "lunchbox".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "Lunchbox: the team's lunch and cafe recommender.\n\n\
                 Workflow:\n\
                 1. Call `options` for valid categories and keyword suggestions.\n\
                 2. Call `recommend` with mode/category/distance/menu/vibe filters.\n\
                    Venues flagged recently_visited were eaten at recently; mention it.\n\
                 3. After the meal, call `mark_eaten` with the venue name.\n\
                 4. `register_venue` adds a review; `history` shows the meal log.\n\n\
                 {agent_line}"
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
