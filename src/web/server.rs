//! HTTP server for filedepot.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{DepotError, Result};

use super::handlers::AppState;
use super::router::create_app;

/// HTTP server for the API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| DepotError::Config(format!("invalid server address: {}", e)))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind the listener, returning it with the actual bound address.
    pub async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        Ok((listener, local_addr))
    }

    /// Serve requests on `listener` until `shutdown` completes.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_app(self.app_state, &self.cors_origins);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Bind and run the web server until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (listener, local_addr) = self.bind().await?;
        tracing::info!("Web server listening on http://{}", local_addr);
        self.serve(listener, shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileStorage, TaskQueue};
    use crate::Database;
    use tempfile::TempDir;

    fn create_test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
        }
    }

    async fn create_test_state(temp_dir: &TempDir) -> AppState {
        let db = Database::open_in_memory().await.unwrap();
        let storage = FileStorage::new(temp_dir.path().join("uploaded")).unwrap();
        let (tasks, _handle) = TaskQueue::start(db.clone());
        AppState::new(db, storage, tasks)
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let temp_dir = TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_test_state(&temp_dir).await)
            .unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_address() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            host: "not an address".to_string(),
            ..create_test_config()
        };

        let result = WebServer::new(&config, create_test_state(&temp_dir).await);
        assert!(matches!(result, Err(DepotError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_serves_health_and_shuts_down() {
        let temp_dir = TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_test_state(&temp_dir).await)
            .unwrap();
        let (listener, addr) = server.bind().await.unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async {
            let _ = stop_rx.await;
        }));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
