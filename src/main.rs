//! Grader HTTP server entrypoint.
//!
//! `grader` serves the HTTP gateway. `grader --eval <rows.jsonl> [--model M]...
//! [--out DIR]` scores a labelled file with each model instead, prints one
//! summary line per model and optionally writes the per-model dumps.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use grader::config::Config;
use grader::eval::{evaluate, load_rows, mean_abs_diff, write_outputs};
use grader::gateway::{HandlerState, cors_layer, create_router_with_state};
use grader::{GenaiCompletionClient, GradingService, GuidelineScorer, MemoryStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Survey answer grader.
#[derive(Debug, Parser)]
#[command(name = "grader", version, about)]
struct Cli {
    /// Probe /healthz on the configured port and exit 0 when healthy.
    #[arg(long, conflicts_with = "eval")]
    health_check: bool,

    /// Score a labelled JSONL file instead of serving HTTP.
    #[arg(long, value_name = "PATH")]
    eval: Option<PathBuf>,

    /// Model to evaluate; repeat to compare several. Defaults to GRADER_LLM_MODEL.
    #[arg(long = "model", value_name = "NAME", requires = "eval")]
    models: Vec<String>,

    /// Directory for raw_<model>.jsonl and summary_gold.csv.
    #[arg(long, value_name = "DIR", requires = "eval")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.health_check {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    if let Some(path) = cli.eval {
        return run_eval(&config, &path, cli.models, cli.out.as_deref()).await;
    }

    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        model = %config.completion.model,
        "Grader starting"
    );

    let client = GenaiCompletionClient::from_config(&config.completion).map(Arc::new);
    if client.is_none() {
        tracing::warn!("No completion credentials configured, scoring with the length heuristic");
    }

    let service = GradingService::new(
        Arc::new(MemoryStore::new()),
        config.scoring,
        client,
        config.completion.semantic_references,
    );
    let app = create_router_with_state(HandlerState::new(service))
        .layer(cors_layer(&config.allowed_origins));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Grader shutdown complete");
    Ok(())
}

async fn run_eval(
    config: &Config,
    path: &Path,
    models: Vec<String>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let rows = load_rows(path)?;
    let base = GenaiCompletionClient::from_config(&config.completion);

    let models = if models.is_empty() {
        vec![config.completion.model.clone()]
    } else {
        models
    };

    let mut reports = Vec::with_capacity(models.len());
    for model in &models {
        let client = base.as_ref().map(|c| Arc::new(c.with_model(model)));
        let scorer = GuidelineScorer::new(config.scoring, client);
        let report = evaluate(model, &scorer, &rows).await;
        println!("{}", report.summary_line());
        reports.push(report);
    }

    if let Some((reference, others)) = reports.split_first() {
        for other in others {
            match mean_abs_diff(reference, other) {
                Some(diff) => println!(
                    "Mean abs diff [{}] vs [{}]: {:.4}",
                    other.model, reference.model, diff
                ),
                None => println!(
                    "Mean abs diff [{}] vs [{}]: n/a",
                    other.model, reference.model
                ),
            }
        }
    }

    if let Some(dir) = out {
        write_outputs(dir, &rows, &reports)?;
        println!("Reports saved to: {}", dir.display());
    }
    Ok(())
}

/// Probes `/healthz` on the configured port; exit code 0 when healthy.
async fn run_health_check() -> i32 {
    let port = std::env::var("GRADER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
