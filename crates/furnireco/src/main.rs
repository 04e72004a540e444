use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use furnireco::config::{
  self, BACKEND_URL_ENV, DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_K,
  TIMEOUT_SECS_ENV, TOP_K_ENV,
};
use furnireco::notice::{self, Notifier, TerminalNotifier};
use furnireco::pages::{AnalyticsPage, LoadOutcome, SearchOutcome, SearchPage};
use furnireco::shell::AppShell;
use furnireco::{ClientConfig, RecoClient, RecommendationBackend};

#[derive(Parser)]
#[command(name = "furnireco")]
#[command(about = "FurniReco - find furniture by describing it\nSearch recommendations and browse dataset analytics from the terminal")]
#[command(version)]
struct Cli {
  /// Base URL of the recommendation backend
  #[arg(long, global = true, env = BACKEND_URL_ENV, default_value = DEFAULT_BACKEND_URL)]
  backend_url: String,

  /// Seconds to wait for the backend before giving up
  #[arg(long, global = true, env = TIMEOUT_SECS_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout_secs: u64,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ask for recommendations matching a description
  Search {
    /// What you are looking for (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
    /// Number of recommendations to request
    #[arg(short = 'k', long, env = TOP_K_ENV, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Print normalized records as JSON instead of cards
    #[arg(long)]
    json: bool,
  },
  /// Show brand, price and category charts for the dataset
  Analytics,
  /// Browse both pages interactively
  Shell {
    /// Number of recommendations to request per search
    #[arg(short = 'k', long, env = TOP_K_ENV, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
  },
  /// Check that the backend is reachable
  Health,
}

fn init_logging(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("furnireco=debug,warn")
    } else {
      EnvFilter::new("furnireco=warn,error")
    }
  });

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

async fn search(
  backend: Arc<dyn RecommendationBackend>,
  notifier: Arc<dyn Notifier>,
  terms: &[String],
  top_k: usize,
  json: bool,
) -> Result<ExitCode> {
  let top_k = config::validate_top_k(top_k)?;
  let page = SearchPage::new(backend, notifier).with_top_k(top_k);
  let query = terms.join(" ");

  match page.search(&query).await {
    SearchOutcome::Failed => return Ok(ExitCode::FAILURE),
    SearchOutcome::Skipped => {
      notice::warn("Nothing to search for. Describe what you are looking for.");
      return Ok(ExitCode::FAILURE);
    }
    SearchOutcome::Updated(_) | SearchOutcome::Superseded => {}
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&page.records())?);
  } else {
    page.render();
  }
  Ok(ExitCode::SUCCESS)
}

async fn analytics(
  backend: Arc<dyn RecommendationBackend>,
  notifier: Arc<dyn Notifier>,
) -> Result<ExitCode> {
  let page = AnalyticsPage::new(backend, notifier);
  let outcome = page.ensure_loaded().await;
  page.render();

  Ok(if outcome == LoadOutcome::Failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

async fn health(client: &RecoClient) -> Result<ExitCode> {
  match client.health_check().await {
    Ok(message) => {
      notice::success(&format!("Backend at {} is up: {}", client.config().base_url, message));
      Ok(ExitCode::SUCCESS)
    }
    Err(err) => {
      tracing::error!(error = %err, "health check failed");
      notice::error(&format!("Backend at {} is not reachable: {}", client.config().base_url, err));
      Ok(ExitCode::FAILURE)
    }
  }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let client_config = ClientConfig::new(&cli.backend_url, cli.timeout_secs)?;
  let client = Arc::new(RecoClient::new(client_config).context("Failed to set up the backend client")?);
  let backend: Arc<dyn RecommendationBackend> = client.clone();
  let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

  match cli.command {
    Command::Search { terms, top_k, json } => search(backend, notifier, &terms, top_k, json).await,
    Command::Analytics => analytics(backend, notifier).await,
    Command::Shell { top_k } => {
      let top_k = config::validate_top_k(top_k)?;
      let mut shell = AppShell::new(backend, notifier, top_k);
      shell.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Health => health(&client).await,
  }
}
