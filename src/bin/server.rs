use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_rs::{
    AppState, PaginationConfig, ai::GeminiClient, build_router, graceful_shutdown,
    logging_middleware,
};

/// The JSON API server for fintrack_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Where to write the debug-level log.
    #[arg(long, default_value = "debug.log")]
    log_file: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_file);

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let gemini = match env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => Some(GeminiClient::new(api_key)),
        _ => {
            tracing::warn!("GEMINI_API_KEY is not set, the AI routes will report an error");
            None
        }
    };

    let connection =
        Connection::open(&args.db_path).expect("Could not open the application database");
    let state = AppState::new(connection, &secret, gemini, PaginationConfig::default())
        .expect("Could not initialize the application database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = with_http_tracing(build_router(state));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

/// Send everything at or above the `RUST_LOG` filter (`info` when unset) to
/// stdout, and a full debug-level copy to `log_path`.
fn setup_logging(log_path: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(env_filter)
                .and_then(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(Arc::new(log_file)),
                )
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

/// Wrap the router in a per-request trace span plus the body-logging
/// middleware.
fn with_http_tracing(router: Router) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let matched_path = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            tracing::debug_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                matched_path,
            )
        })
        // 5xx responses are already logged when the error is built.
        .on_failure(());

    router
        .layer(trace_layer)
        .layer(middleware::from_fn(logging_middleware))
}
