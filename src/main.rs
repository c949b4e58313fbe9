//! Giftchat - chat with a gift-finding assistant from the terminal.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use giftchat::cli;
use giftchat::config::{Settings, XdgDirs};
use giftchat::HttpAssistantClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Giftchat - find the perfect gift 🎁
#[derive(Parser, Debug)]
#[command(name = "giftchat")]
#[command(version, about, long_about = None)]
struct Args {
    /// Assistant chat endpoint (overrides the settings file)
    #[arg(long, env = "GIFTCHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Give up on a reply after this many seconds (default: wait)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Settings file to use instead of the XDG default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Send a single message, print the reply and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    /// Settings file, then command-line overrides.
    fn settings(&self) -> Settings {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| XdgDirs::new().settings_path());
        let mut settings = Settings::load_or_default(&path);

        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout {
            settings.request_timeout_secs = Some(secs);
        }
        settings
    }
}

fn init_tracing(args: &Args) {
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn" // Quiet by default for normal use
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if args.debug || args.verbose {
        tracing::info!("Debug logging enabled");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        init_tracing(&args);

        let settings = args.settings();
        tracing::debug!(endpoint = %settings.endpoint, timeout = ?settings.request_timeout(), "Settings resolved");

        let client = HttpAssistantClient::with_timeout(&settings.endpoint, settings.request_timeout())
            .with_context(|| format!("Cannot use endpoint {:?}", settings.endpoint))?;
        let defaults = settings.to_session_defaults();

        if let Some(prompt) = &args.prompt {
            cli::run_single_prompt(client, defaults, prompt).await
        } else {
            cli::run_interactive(client, defaults).await
        }
    })
}
