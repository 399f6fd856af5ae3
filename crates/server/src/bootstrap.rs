use std::sync::Arc;

use axum::Router;
use storefront_core::config::AppConfig;
use storefront_core::CatalogStore;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    pub store: Arc<CatalogStore>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not bind `{address}`: {source}")]
    Bind { address: String, source: std::io::Error },
    #[error("server terminated unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    let store = if config.catalog.seed_sample_data {
        CatalogStore::seeded()
    } else {
        CatalogStore::empty()
    };

    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        seeded = config.catalog.seed_sample_data,
        "in-memory catalog initialized"
    );

    Application { config, store: Arc::new(store) }
}

impl Application {
    pub fn router(&self) -> Router {
        api::router(self.store.clone())
            .merge(health::router(self.store.clone()))
            .layer(TraceLayer::new_for_http())
    }

    pub async fn bind(&self) -> Result<TcpListener, BootstrapError> {
        let address = self.config.server.socket_address();
        TcpListener::bind(&address)
            .await
            .map_err(|source| BootstrapError::Bind { address: address.clone(), source })
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), BootstrapError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local_address =
            listener.local_addr().map(|address| address.to_string()).unwrap_or_default();
        info!(
            event_name = "system.server.listening",
            correlation_id = "bootstrap",
            bind_address = %local_address,
            "catalog api listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(BootstrapError::Serve)
    }
}
