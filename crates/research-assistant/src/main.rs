//! Research Assistant - Entry Point
//!
//! Runs the research pipeline and helpers from the command line, or serves
//! them as MCP tools over stdio or HTTP.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use research_assistant::{
    config::Config,
    export::export_table,
    formatters,
    models::{ExportFormat, ResponseFormat},
    pipeline::ResearchRequest,
    server::McpServer,
    tools::ToolContext,
};

#[derive(Parser, Debug)]
#[command(name = "research-assistant")]
#[command(about = "Keyword-driven research assistant over Semantic Scholar")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", global = true)]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate keywords, search every keyword and print the paper table
    Research(ResearchArgs),

    /// Generate search keywords only
    Keywords {
        /// Research topic
        topic: String,

        /// Project description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Run the second, filtering round
        #[arg(long)]
        filter: bool,
    },

    /// Search the web with DuckDuckGo
    Web {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(long, short, default_value = "10")]
        num_results: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: ResponseFormat,
    },

    /// Chat with the assistant (interactive when no question is given)
    Ask {
        /// Single question to answer
        question: Option<String>,
    },

    /// Serve the tools over MCP
    Serve {
        /// Transport mode
        #[arg(long, value_enum, default_value = "stdio")]
        transport: Transport,

        /// HTTP server port (only used with --transport http)
        #[arg(long, default_value = "8000", env = "PORT")]
        port: u16,
    },
}

#[derive(Args, Debug)]
struct ResearchArgs {
    /// Research topic
    topic: String,

    /// Project description
    #[arg(long, short, default_value = "")]
    description: String,

    /// Fields of study, comma-separated (defaults to the nine built-in fields)
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Keywords searched at most
    #[arg(long, default_value = "10")]
    max_keywords: usize,

    /// Papers collected per keyword
    #[arg(long, default_value = "100")]
    results_per_keyword: i32,

    /// Run the second keyword-filtering round
    #[arg(long)]
    filter: bool,

    /// Summarize every abstract
    #[arg(long)]
    summarize: bool,

    /// Store the papers in the vector database
    #[arg(long)]
    store: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: ResponseFormat,

    /// Also write the table to this file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Format of the exported file
    #[arg(long, value_enum, default_value = "csv")]
    export_format: ExportFormat,
}

impl ResearchArgs {
    fn to_request(&self) -> ResearchRequest {
        let mut request = ResearchRequest::new(&self.topic);
        request.description.clone_from(&self.description);
        if !self.fields.is_empty() {
            request.fields_of_study.clone_from(&self.fields);
        }
        request.max_keywords = self.max_keywords;
        request.results_per_keyword = self.results_per_keyword;
        request.filter_keywords = self.filter;
        request.summarize = self.summarize;
        request.store_documents = self.store;
        request
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// Plain HTTP (JSON-RPC and REST)
    Http,
}

/// Logs go to stderr so stdout stays clean for results and stdio MCP.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(key) = cli.api_key {
        config.set_api_key(key);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        has_api_key = config.has_api_key(),
        has_llm_key = config.has_llm_key(),
        vector_db = config.vector_db.is_some(),
        "Starting research assistant"
    );

    let ctx = ToolContext::from_config(&config)?;

    match cli.command {
        Command::Research(args) => {
            ctx.require_llm()?;
            let report = ctx.pipeline.run(&args.to_request()).await?;

            if let Some(path) = &args.export {
                let contents = export_table(&report.table, args.export_format, true);
                tokio::fs::write(path, contents).await?;
                tracing::info!(path = %path.display(), rows = report.paper_count(), "Exported table");
            }

            if args.format.is_json() {
                println!("{}", serde_json::to_string_pretty(&formatters::compact_report(&report))?);
            } else {
                println!("{}", formatters::format_report_markdown(&report));
            }
        }
        Command::Keywords { topic, description, filter } => {
            ctx.require_llm()?;
            let mut keywords = ctx.keywords.generate(&topic, &description).await?;
            if filter {
                keywords = ctx.keywords.filter(&topic, &description, &keywords).await?;
            }
            for keyword in keywords {
                println!("{keyword}");
            }
        }
        Command::Web { query, num_results, format } => {
            let results = ctx.web.search(&query, num_results).await?;
            if format.is_json() {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", formatters::format_web_results_markdown(&query, &results));
            }
        }
        Command::Ask { question } => {
            ctx.require_llm()?;
            match question {
                Some(question) => {
                    let answer = ctx.assistant.ask(&question).await?;
                    println!("{}", formatters::format_answer_markdown(&answer));
                }
                None => chat_loop(&ctx).await?,
            }
        }
        Command::Serve { transport, port } => {
            let server = McpServer::new(ctx);
            match transport {
                Transport::Stdio => server.run_stdio().await?,
                Transport::Http => server.run_http(port).await?,
            }
        }
    }

    Ok(())
}

/// Read questions from stdin until EOF or `exit`.
async fn chat_loop(ctx: &ToolContext) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Hi, I am {}. Ask me about your research (type 'exit' to quit).", ctx.assistant.name());

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }

        match ctx.assistant.ask(question).await {
            Ok(answer) => println!("{}", formatters::format_answer_markdown(&answer)),
            Err(e) => eprintln!("{}", e.to_user_message()),
        }
    }

    Ok(())
}
