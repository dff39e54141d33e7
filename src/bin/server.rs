use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use outlay_rs::{AppState, ServerConfig, build_router, graceful_shutdown, logging_middleware};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level);

    if let Err(error) = config.validate() {
        tracing::error!("invalid configuration: {error}");
        std::process::exit(1);
    }

    let connection = Connection::open(&config.db_path)
        .unwrap_or_else(|error| panic!("Could not open {}: {error}", config.db_path.display()));
    let state = AppState::new(connection, &config.secret, &config.timezone)
        .expect("Could not create the database tables");

    let app = with_request_spans(build_router(state)).layer(middleware::from_fn(logging_middleware));

    #[cfg(debug_assertions)]
    let app = app.layer(LiveReloadLayer::new());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = config.socket_addr();
    tracing::info!("listening on http://{addr}, today is dated in {}", config.timezone);

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|error| {
        eprintln!("Ignoring log filter {filter:?} ({error}), using \"info\"");
        EnvFilter::new("info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

/// Wrap each request in a span named after its route. Failures are left to
/// the handlers, which log them with more context.
fn with_request_spans(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request| {
                let route = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::debug_span!("request", method = %request.method(), uri = %request.uri(), route)
            })
            .on_failure(()),
    )
}
