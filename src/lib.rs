//! # Resume Harness
//!
//! Question answering over a single structured résumé, served to AI tools
//! over MCP and a JSON HTTP API, and usable from the `resume` CLI.
//!
//! The retrieval pipeline itself (strategies, aggregator, formatter,
//! evaluation) lives in `resume-harness-core`; this crate wires it to
//! configuration, logging, the tool registry and the transports.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ resume JSON  │──▶│ core: retrieve → │──▶│ ToolRegistry │
//! │ (load once)  │   │ aggregate→format │   │  + QueryLog  │
//! └──────────────┘   └──────────────────┘   └──────┬───────┘
//!                                                  │
//!                        ┌─────────────────────────┤
//!                        ▼                         ▼
//!                   ┌──────────┐           ┌───────────────┐
//!                   │   CLI    │           │ HTTP  +  /mcp │
//!                   │ (resume) │           │ (axum, rmcp)  │
//!                   └──────────┘           └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | tracing subscriber setup |
//! | [`store`] | Résumé loading |
//! | [`analytics`] | Append-only query log |
//! | [`params`] | Tool parameter validation |
//! | [`traits`] | `Tool` trait, context and built-in tools |
//! | [`resources`] | `resume://` text projections |
//! | [`prompts`] | Prompt templates |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | HTTP server |
//! | [`query`] | CLI query commands |
//! | [`evaluate`] | CLI evaluation command |

pub mod analytics;
pub mod config;
pub mod evaluate;
pub mod logging;
pub mod mcp;
pub mod params;
pub mod prompts;
pub mod query;
pub mod resources;
pub mod server;
pub mod store;
pub mod traits;

#[cfg(test)]
mod testing;
