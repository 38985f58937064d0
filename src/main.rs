use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use loansight::config::AppConfig;
use loansight::error::AppError;
use loansight::loans::{
    loan_router, ApplicantRecord, Credentials, InMemoryRepository, LoanApiContext,
    LoanApplicationService, PolicyKind, ScoreOutcome, ScoringEngine, SessionStore,
};
use loansight::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Loan Approval Scorer",
    about = "Run the loan approval scoring service or score a record from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score an applicant record and print the factor breakdown
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Path to a JSON file holding the applicant record
    #[arg(long)]
    file: Option<PathBuf>,
    /// Inline JSON applicant record (alternative to --file)
    #[arg(long)]
    json: Option<String>,
    /// Force a policy instead of detecting it from the record's fields
    #[arg(long, value_parser = parse_policy)]
    policy: Option<PolicyKind>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Score(args) => run_score(args),
    }
}

fn parse_policy(raw: &str) -> Result<PolicyKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "basic" => Ok(PolicyKind::Basic),
        "extended" => Ok(PolicyKind::Extended),
        other => Err(format!(
            "unknown policy '{other}' (expected 'basic' or 'extended')"
        )),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryRepository::default());
    let context = Arc::new(LoanApiContext {
        service: LoanApplicationService::new(repository),
        sessions: SessionStore::new(Credentials {
            username: config.auth.username.clone(),
            password: config.auth.password.clone(),
        }),
    });

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(loan_router(context))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan approval scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = match (args.file, args.json) {
        (Some(path), None) => std::fs::read_to_string(path)?,
        (None, Some(inline)) => inline,
        _ => {
            return Err(AppError::Input(
                "provide exactly one of --file or --json".to_string(),
            ))
        }
    };

    let record: ApplicantRecord = serde_json::from_str(&raw)?;
    let kind = args.policy.unwrap_or_else(|| PolicyKind::detect(&record));
    let outcome = ScoringEngine::new().score(&record, kind);

    render_score(&outcome);
    Ok(())
}

fn render_score(outcome: &ScoreOutcome) {
    println!("Loan approval score");
    println!("Policy: {}", outcome.policy.label());

    println!("\nFactor contributions");
    for component in &outcome.components {
        println!(
            "- {}: +{:.2} ({})",
            component.factor, component.weight, component.notes
        );
    }

    println!("\nApproval probability: {}%", outcome.probability_display());
    println!("Decision: {}", outcome.decision.summary());
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
