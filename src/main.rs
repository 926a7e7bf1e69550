//! MCP Relay
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                   MCP RELAY                    │
//!                    │                                                │
//!   Caller request   │  ┌─────────┐   ┌──────────┐   ┌────────────┐   │
//!   ─────────────────┼─▶│  http   │──▶│  relay   │──▶│ forwarder  │───┼──▶ Upstream
//!                    │  │ server  │   │ envelope │   │ basic auth │   │    (POST
//!                    │  └─────────┘   └──────────┘   └─────┬──────┘   │    {base}/{endpoint})
//!                    │                                     │          │
//!   Caller response  │  ┌─────────┐   ┌──────────┐         │          │
//!   ◀────────────────┼──│response │◀──│ outcome  │◀────────┘          │
//!                    │  └─────────┘   └──────────┘                    │
//!                    │                                                │
//!                    │  config · observability · lifecycle · docs     │
//!                    └────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use mcp_relay::cli::Cli;
use mcp_relay::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    startup::run(config).await?;
    Ok(())
}
