//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use crate::api;
use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests and tooling)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        // Start background tasks
        let mut tasks = BackgroundTasks::new();
        spawn_session_sweeper(&mut tasks, state.clone());

        let app = api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!("Order server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        if tokio::time::timeout(grace, tasks.shutdown()).await.is_err() {
            tracing::warn!("Background tasks did not stop within {:?}", grace);
        }
        Ok(())
    }
}

/// 定时清理过期访客会话
fn spawn_session_sweeper(tasks: &mut BackgroundTasks, state: ServerState) {
    let token = tasks.shutdown_token();
    let interval = Duration::from_millis(state.config.session_sweep_interval_ms);

    tasks.spawn("session_sweeper", TaskKind::Periodic, async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    match state.sessions.sweep_expired() {
                        Ok(0) => {}
                        Ok(removed) => {
                            tracing::info!(removed, "Swept expired guest sessions");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Session sweep failed");
                        }
                    }
                }
            }
        }
    });
}
