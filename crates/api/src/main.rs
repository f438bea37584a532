use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notewell_api::config::ServerConfig;
use notewell_api::router::build_app_router;
use notewell_api::shutdown::{self, PgRevisionFlush, ShutdownCoordinator};
use notewell_api::state::AppState;
use notewell_api::{background, ws};
use notewell_core::lifecycle::Lifecycle;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notewell_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Lifecycle ---
    let lifecycle = Arc::new(Lifecycle::new());
    let realtime = Arc::new(ws::RealtimeManager::new());
    let server_cancel = CancellationToken::new();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(
        host = %config.host,
        port = %config.port,
        server_url = %config.server_url,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = notewell_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    // --- Signals ---
    // Until the listener is bound, a signal exits right away.
    let coordinator = Arc::new(ShutdownCoordinator::new(
        Arc::clone(&lifecycle),
        Arc::clone(&realtime),
        Arc::new(PgRevisionFlush::new(pool.clone())),
        config.lock_path.clone(),
        Duration::from_secs(config.shutdown_timeout_secs),
        server_cancel.clone(),
    ));
    let signal_handle = tokio::spawn(shutdown::exit_on_signal(coordinator));

    notewell_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    notewell_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Background tasks ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&realtime));

    let saver_cancel = server_cancel.child_token();
    let saver_handle = tokio::spawn(background::revision_saver::run(
        pool.clone(),
        saver_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        realtime,
        lifecycle: Arc::clone(&lifecycle),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    if lifecycle.mark_running() {
        tracing::info!(%addr, "Server running");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(server_cancel.cancelled_owned())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections");

    saver_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), saver_handle).await;
    heartbeat_handle.abort();

    // The signal task exits the process once revisions are saved.
    let _ = signal_handle.await;
}
