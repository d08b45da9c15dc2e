//! Server Module
//!
//! HTTP front end over a loaded [`AppContext`].

mod config;
mod context;
mod handler;

pub use config::Config;
pub use context::AppContext;
pub use handler::{parse_query, ApiError, AskRequest, AskResponse, ErrorBody, QUERY_NOT_PROVIDED};

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Routes with the shared context attached
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/ask", post(handler::ask))
        .route("/health", get(handler::health))
        .with_state(context)
}

/// askbase HTTP server
pub struct Server {
    config: Config,
    context: Arc<AppContext>,
}

impl Server {
    /// Create a server over an already bootstrapped context
    pub fn new(config: Config, context: AppContext) -> Self {
        Self {
            config,
            context: Arc::new(context),
        }
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr).await?;

        info!("askbase server listening on {}", addr);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let metrics_context = self.context.clone();
        axum::serve(listener, router(self.context))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped. {}", metrics_context.metrics().summary());
        Ok(())
    }

    /// Get a reference to the shared context
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
