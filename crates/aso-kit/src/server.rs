//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes the keyword engine over the MCP protocol, making it
//! available to AI assistants via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer over the same core library the
//! CLI commands use. Each `#[tool]` method delegates to `aso_kit_core` and
//! returns the report as pretty-printed JSON text.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use aso_kit_core::analysis::{self, Check};
use aso_kit_core::config::Config;
use aso_kit_core::model::{AppText, Keyword, Store};
use aso_kit_core::record::AppRecord;
use aso_kit_core::{density, migrate, optimize, priority, repetition};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for tools that only need a keyword list.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct KeywordsParams {
    /// Keyword records.
    pub keywords: Vec<Keyword>,
}

/// Parameters for the `keyword_density` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DensityParams {
    /// App metadata and keywords.
    pub record: AppRecord,
    /// Measure this keyword alone instead of the record's keyword set.
    pub keyword: Option<String>,
}

/// Parameters for the `check_repetition` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RepetitionParams {
    /// App metadata and keywords.
    pub record: AppRecord,
    /// Check one store only. Omit for both.
    pub store: Option<Store>,
}

/// Parameters for the `analyze_record` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeParams {
    /// App metadata and keywords.
    pub record: AppRecord,
    /// Checks to run. Omit for all.
    pub checks: Option<Vec<Check>>,
}

/// Parameters for the `migrate_record` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MigrateParams {
    /// App record to migrate.
    pub record: AppRecord,
}

/// MCP server exposing the keyword engine.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    config: Config,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default policies and input limit.
    pub fn new() -> Self {
        Self::with_config(
            Config::default(),
            Some(aso_kit_core::DEFAULT_MAX_INPUT_BYTES),
        )
    }

    /// Create a server using loaded configuration.
    pub fn with_config(config: Config, max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config,
            max_input_bytes,
        }
    }

    /// Refuse payloads above the configured input limit.
    fn check_size<T: Serialize>(&self, value: &T) -> Result<(), McpError> {
        let Some(max) = self.max_input_bytes else {
            return Ok(());
        };
        let size = serde_json::to_vec(value)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
            .len();
        if size > max {
            return Err(McpError::invalid_params(
                format!("input too large: {size} bytes (limit: {max} bytes)"),
                None,
            ));
        }
        Ok(())
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score and tier keywords.
    #[tool(
        description = "Score keywords by category, search volume, difficulty and relevance. Returns each keyword with score, priority tier (high/medium/low) and KEI, in input order."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn prioritize_keywords(
        &self,
        Parameters(params): Parameters<KeywordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "prioritize_keywords",
            keywords = params.keywords.len(),
            "executing MCP tool"
        );
        self.check_size(&params.keywords)?;

        let scored = priority::prioritize(&params.keywords, &self.config.priority);
        let json = to_json(&scored)?;

        tracing::info!(tool = "prioritize_keywords", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Keyword density in app metadata.
    #[tool(
        description = "Measure keyword density (percent of words) in app store metadata, for the record's keyword set or one keyword."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn keyword_density(
        &self,
        Parameters(params): Parameters<DensityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "keyword_density", keyword = ?params.keyword, "executing MCP tool");
        self.check_size(&params.record)?;

        let app: &AppText = &params.record.text;
        let json = match params.keyword {
            Some(ref keyword) => to_json(&density::keyword_density(keyword, app))?,
            None => to_json(&density::density_of_keyword_set(
                &params.record.keywords,
                app,
            ))?,
        };

        tracing::info!(tool = "keyword_density", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Cross-field repetition.
    #[tool(
        description = "Find terms repeated across a store's indexed metadata fields. Returns issues with severity and a 0-100 compliance score per store."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_repetition(
        &self,
        Parameters(params): Parameters<RepetitionParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "check_repetition", store = ?params.store, "executing MCP tool");
        self.check_size(&params.record)?;

        let record = &params.record;
        let policy = &self.config.repetition;
        let json = match params.store {
            Some(store) => to_json(&repetition::check_repetition(
                store,
                &record.text,
                &record.keywords,
                policy,
            ))?,
            None => to_json(&repetition::check_all(&record.text, &record.keywords, policy))?,
        };

        tracing::info!(tool = "check_repetition", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Field allocation.
    #[tool(
        description = "Allocate keywords into App Store and Google Play metadata fields under character budgets. Returns the buckets, the ready-to-paste iOS keywords field and each keyword's placement."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn optimize_keywords(
        &self,
        Parameters(params): Parameters<KeywordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "optimize_keywords",
            keywords = params.keywords.len(),
            "executing MCP tool"
        );
        self.check_size(&params.keywords)?;

        let set = optimize::optimize(
            &params.keywords,
            &self.config.priority,
            &self.config.repetition,
            &self.config.budgets,
        );
        let json = to_json(&set)?;

        tracing::info!(
            tool = "optimize_keywords",
            placed = set.placements.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Full analysis.
    #[tool(
        description = "Run priority, repetition, density and optimize checks over an app record and return the combined report."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_record(
        &self,
        Parameters(params): Parameters<AnalyzeParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_record", checks = ?params.checks, "executing MCP tool");
        self.check_size(&params.record)?;

        let report =
            analysis::run_full_analysis(&params.record, &self.config, params.checks.as_deref());
        let json = to_json(&report)?;

        tracing::info!(tool = "analyze_record", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Legacy app-name migration.
    #[tool(
        description = "Rewrite legacy demo app names using the configured rename table. Returns the rewrites and the migrated record."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn migrate_record(
        &self,
        Parameters(params): Parameters<MigrateParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "migrate_record", "executing MCP tool");
        self.check_size(&params.record)?;

        let migration = migrate::apply_legacy_renames(params.record, &self.config.migrations);
        let json = to_json(&serde_json::json!({
            "rewrites": migration.rewrites,
            "record": migration.record,
        }))?;

        tracing::info!(tool = "migrate_record", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use tools to prioritize keywords, check repetition and density, and allocate keywords into app store metadata fields.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
