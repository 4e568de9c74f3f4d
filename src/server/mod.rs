pub mod config;
pub mod middleware;

use crate::{
    config::Config,
    dashboard::DashboardService,
    database::{DatabaseManager, DatabaseManagerImpl, StoreHealthChecker, TransactionStore},
    error::AppError,
    health::HealthService,
    routes::{create_dashboard_routes, create_health_routes},
    server::middleware::{request_id_middleware, request_response_logger},
    shutdown::shutdown_signal,
};
use axum::{Router, middleware::from_fn};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub dashboard: Arc<DashboardService>,
    pub health_service: Arc<HealthService>,
    /// Present when the store is backed by SeaORM, used for migrations
    pub database: Option<Arc<dyn DatabaseManager>>,
}

impl Server {
    /// Connect to the configured database and wire up the services
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let database = Arc::new(DatabaseManagerImpl::new_from_config(&config.database).await?);
        let store: Arc<dyn TransactionStore> = Arc::new(database.transactions());

        let mut server = Self::with_store(config, store).await;
        server.database = Some(database);
        Ok(server)
    }

    /// Build a server over an already constructed store
    pub async fn with_store(config: Config, store: Arc<dyn TransactionStore>) -> Self {
        let health_service = Arc::new(HealthService::new());
        health_service
            .register(Arc::new(StoreHealthChecker::new(store.clone())))
            .await;

        let dashboard = Arc::new(DashboardService::new(store, config.dashboard.clone()));

        Self {
            config: Arc::new(config),
            dashboard,
            health_service,
            database: None,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if let Some(database) = &self.database {
            if self.config.database.migration_on_startup {
                database.migrate().await?;
            }
        }

        let app = self.create_app();

        let listener = TcpListener::bind((self.config.server.host.as_str(), self.config.server.port))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Internal(format!("Failed to read local address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Creates the application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .merge(create_dashboard_routes())
            .merge(create_health_routes())
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(from_fn(request_response_logger));
        }
        app.layer(from_fn(request_id_middleware))
    }
}
