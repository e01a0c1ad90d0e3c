//! roracle-ui - RORacle workbench
//!
//! Resolves scholarly affiliation strings to ROR organizations through the
//! RORacle API and reports precision/recall of its labelled test datasets.
//! Serves the views as JSON (`serve`) or runs them once from the command line.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roracle_common::config::{ConfigResolver, ResolvedConfig};
use roracle_common::{FilterMode, SessionContext};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roracle_ui::views::{load_catalog, load_results, load_tests, TestsSelection, TestsView};
use roracle_ui::{build_router, AppState, RoracleClient};

/// Command-line arguments for roracle-ui
#[derive(Parser, Debug)]
#[command(name = "roracle-ui")]
#[command(about = "Affiliation lookup and test reporting for the RORacle API")]
#[command(version)]
struct Args {
    /// RORacle API base URL (overrides RORACLE_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the views as a JSON API
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Look up affiliation strings, one per line
    Lookup {
        /// Input file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also write results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List test datasets
    Datasets,
    /// Show test results and metrics
    Tests {
        /// Dataset to show (first dataset when omitted)
        #[arg(short, long, conflicts_with = "test_id")]
        dataset: Option<String>,

        /// Show a single test
        #[arg(short, long)]
        test_id: Option<i64>,

        /// all, passing or failing
        #[arg(short, long, default_value = "all")]
        filter: FilterMode,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = ConfigResolver::new()
        .with_api_url(args.api_url.clone())
        .with_config_path(args.config.clone());
    let loaded = resolver.load();
    let log_level = match &loaded {
        Ok(Some(toml)) => toml.logging.level.clone(),
        _ => "info".to_string(),
    };

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "roracle_ui={level},roracle_common={level},tower_http={level}",
                    level = log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting roracle-ui v{}", env!("CARGO_PKG_VERSION"));

    let toml = match loaded {
        Ok(Some(toml)) => toml,
        Ok(None) => {
            info!("No config file found, using defaults");
            Default::default()
        }
        Err(e) => {
            warn!("Failed to load config ({}), using defaults", e);
            Default::default()
        }
    };
    let config = resolver.resolve(toml);

    let client = RoracleClient::new(&config.api_base_url, config.request_timeout)
        .context("Failed to create RORacle API client")?;

    match args.command {
        Command::Serve { bind } => serve(client, &config, bind).await,
        Command::Lookup { input, csv } => lookup(&client, &config, input, csv).await,
        Command::Datasets => datasets(&client).await,
        Command::Tests {
            dataset,
            test_id,
            filter,
        } => {
            let selection = match (test_id, dataset) {
                (Some(id), _) => TestsSelection::Single(id),
                (None, Some(name)) => TestsSelection::Dataset(name),
                (None, None) => TestsSelection::DefaultDataset,
            };
            tests(&client, selection, filter).await
        }
    }
}

async fn serve(client: RoracleClient, config: &ResolvedConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.bind_address.clone());
    let state = AppState::new(Arc::new(client), config.lookup_concurrency);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn lookup(
    client: &RoracleClient,
    config: &ResolvedConfig,
    input: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let session = SessionContext::new(text);
    let view = load_results(client, &session, config.lookup_concurrency).await?;

    println!(
        "Affiliations: {}  Organizations: {}  Avg. per affiliation: {:.2}",
        view.summary.affiliation_count,
        view.summary.organization_count,
        view.summary.average_per_affiliation
    );
    for result in &view.results {
        println!();
        println!("{}", result.affiliation);
        if result.organizations.is_empty() {
            println!("  No organizations found");
        }
        for org in &result.organizations {
            println!("  {}  {}  ({})", org.id, org.primary_name(), org.location);
        }
    }

    if let Some(path) = csv {
        std::fs::write(&path, view.to_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote CSV to {}", path.display());
    }

    Ok(())
}

async fn datasets(client: &RoracleClient) -> Result<()> {
    let catalog = load_catalog(client).await?;
    for dataset in &catalog {
        println!("{} ({} tests)", dataset.name, dataset.count);
    }
    Ok(())
}

async fn tests(client: &RoracleClient, selection: TestsSelection, filter: FilterMode) -> Result<()> {
    let view = load_tests(client, &selection).await?;
    print_tests(&view, filter);
    Ok(())
}

fn print_tests(view: &TestsView, filter: FilterMode) {
    let m = &view.metrics;
    if let Some(name) = &view.dataset {
        println!("Dataset: {}", name);
    }
    println!(
        "Tests: {}  Passing: {}  Failing: {}  Precision: {:.1}%  Recall: {:.1}%",
        m.total,
        m.passing,
        m.failing,
        m.precision * 100.0,
        m.recall * 100.0
    );
    if view.bucket_disagreements > 0 {
        println!(
            "Warning: {} test(s) placed in a bucket that contradicts their match sets",
            view.bucket_disagreements
        );
    }

    let shown = view.filtered(filter);
    if shown.is_empty() {
        println!("No test results found for the selected filter.");
        return;
    }

    for record in shown {
        println!();
        println!(
            "[{}] Test ID: {} - Dataset: {}",
            if record.is_passing() { "PASS" } else { "FAIL" },
            record.test_id,
            record.dataset_name
        );
        println!("{}", record.affiliation);
        for (kind, org) in record.pills() {
            println!("  {:?}: {} <{}>", kind, org.primary_name(), org.id);
        }
        if let Some(message) = record.empty_message() {
            println!("  {}", message);
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
