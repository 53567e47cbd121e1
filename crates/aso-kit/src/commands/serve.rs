//! Serve command: MCP server on stdio.

use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use aso_kit_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // stdio is the only transport; nothing to configure yet
}

/// Run the MCP server until the client disconnects.
///
/// Logs go to stderr and the optional log file; stdout carries the protocol.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    info!(max_input_bytes = ?max_input_bytes, "starting MCP server on stdio");

    let service = ProjectServer::with_config(config, max_input_bytes)
        .serve(rmcp::transport::stdio())
        .await?;
    let reason = service.waiting().await?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
