//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;

use grader::completion::MockCompletionClient;
use grader::gateway::{HandlerState, create_router_with_state};
use grader::store::MemoryStore;
use grader::{GradingService, ScoringConfig};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server on an ephemeral port backed by an empty [`MemoryStore`].
///
/// With `client = None` every score comes from the length heuristic.
pub async fn spawn_test_server(
    client: Option<MockCompletionClient>,
) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let service = GradingService::new(
        Arc::new(MemoryStore::new()),
        ScoringConfig::default(),
        client.map(Arc::new),
        false,
    );
    let app = create_router_with_state(HandlerState::new(service));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    Ok(TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
