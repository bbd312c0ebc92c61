//! Research Assistant
//!
//! Keyword-driven literature search: a language model proposes search
//! keywords for a topic, each keyword is searched on the Semantic Scholar
//! Graph API, and the nested results are flattened into one deduplicated
//! column-oriented table. Abstracts can be summarized concurrently, papers
//! stored in a Zilliz (Milvus) vector database, and a conversational
//! assistant answers questions from stored documents and web search.
//!
//! # Features
//!
//! - **Pipeline**: keywords → paged search → flatten → summarize → store
//! - **MCP tools**: 9 tools over stdio or HTTP, plus a REST endpoint
//! - **Rate-limited and cached**: respects Semantic Scholar limits, 5-minute TTL cache
//! - **Best effort**: a failing keyword is logged and skipped
//!
//! # Example
//!
//! ```no_run
//! use research_assistant::{config::Config, pipeline::ResearchRequest, tools::ToolContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let ctx = ToolContext::from_config(&config)?;
//!
//!     let report = ctx.pipeline.run(&ResearchRequest::new("Extended reality in marketing")).await?;
//!     println!("Found {} papers", report.paper_count());
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod formatters;
pub mod keywords;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod summarize;
pub mod table;
pub mod tools;
pub mod vector;
pub mod websearch;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{AssistantError, ClientError};
pub use pipeline::{ResearchPipeline, ResearchReport, ResearchRequest};
pub use table::PaperTable;
