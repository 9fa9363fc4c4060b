use std::future::Future;
use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tokio::net::TcpListener;
use tracing::info;

use service::company::repo::seaorm::SeaOrmCompanyRepository;
use service::company::repository::CompanyRepository;

use crate::errors::StartupError;
use crate::grpc::CompanyGrpc;
use crate::routes;

/// Connect, migrate, bind and serve until SIGINT/SIGTERM.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db_cfg = models::db::DatabaseConfig::from_settings(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    info!(event = "migrations_applied", "schema up to date");

    let repo: Arc<dyn CompanyRepository> = Arc::new(SeaOrmCompanyRepository::new(db));
    let app = routes::build_router(CompanyGrpc::from_repo(repo))?;

    let bind = cfg.server.bind_addr();
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {bind}: {e}")))?;
    let addr = listener.local_addr().map_err(anyhow::Error::from)?;
    info!(%addr, event = "listening", "company gRPC server listening");

    serve(listener, app, common::env::shutdown_signal()).await?;
    info!(event = "drained", "in-flight requests finished");
    Ok(())
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
