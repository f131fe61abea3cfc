use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_core::TodoService;
use todo_server::{config::Config, database, PostgresTodoRepository};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info,todo_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("failed to load configuration")?;
    info!("configuration loaded");

    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!(host = %config.database.host, dbname = %config.database.dbname, "database connected");

    database::init_schema(&pool)
        .await
        .context("failed to initialize schema")?;
    info!("database schema initialized");

    let service = TodoService::new(Arc::new(PostgresTodoRepository::new(pool.clone())));

    let port = config.server.port()?;
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!(addr = %listener.local_addr()?, "server listening");
    info!("health check: http://localhost:{port}/health");
    info!("api endpoint: http://localhost:{port}/api/v1/todos");

    todo_server::run(listener, service, shutdown_signal()).await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
