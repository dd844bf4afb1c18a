use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tutor_core::{OpenRouterClient, QuestionBank, TutorConfig};
use tutor_server::http_server;

#[derive(Parser, Debug)]
#[command(name = "tutor-daemon", about = "Math tutor web server")]
struct Args {
    /// Path to config file (defaults to ./tutor.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Path to the question bank JSON file
    #[arg(short, long)]
    question_bank: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Default model when the page does not choose one
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// OpenRouter API key
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Show replies as plain text instead of rendering Markdown
    #[arg(long)]
    no_markdown: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting tutor daemon");

    // Load config from file and environment
    let mut config = match TutorConfig::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    // Update config from CLI args
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(path) = args.question_bank {
        config.question_bank = path;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }
    if let Some(model) = args.model {
        config.gateway.default_model = model;
    }
    if let Some(api_key) = args.api_key {
        config.gateway.api_key = Some(api_key);
    }
    if args.no_markdown {
        config.render_markdown = false;
    }

    // The bank is fixed reference data; nothing can be served without it
    let bank = match QuestionBank::load(&config.question_bank) {
        Ok(bank) => bank,
        Err(e) => {
            error!(error = %e, "Failed to load question bank");
            return Err(anyhow::anyhow!("Failed to load question bank: {}", e));
        }
    };

    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; /static will return 404",
            config.static_dir.display()
        );
    }

    // Initialize chat-completion client
    let client = match OpenRouterClient::new(config.gateway.clone()) {
        Ok(client) => {
            info!(
                endpoint = %config.gateway.endpoint,
                model = %config.gateway.default_model,
                "Initialized chat-completion client"
            );
            client
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize chat-completion client");
            return Err(anyhow::anyhow!("Failed to initialize client: {}", e));
        }
    };

    http_server::run_server(config, Arc::new(client), bank).await?;

    info!("Tutor daemon shutting down");
    Ok(())
}
