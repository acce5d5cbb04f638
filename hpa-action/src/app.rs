use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::StreamExt;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{BroadcastStream, SignalStream};
use tokio_stream::StreamMap;

use crate::config::Config;
use crate::database::Database;
use crate::server::AppServer;

/// The application object for when the controller is running as a server.
pub struct App {
    /// The application's runtime config.
    _config: Arc<Config>,

    /// A channel used for triggering graceful shutdown.
    shutdown_tx: broadcast::Sender<()>,
    /// A channel used for triggering graceful shutdown.
    shutdown_rx: BroadcastStream<()>,

    /// The join handle of the context update gRPC server.
    server_handle: JoinHandle<()>,
}

impl App {
    /// Create a new instance.
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        // Open this controller's view of the platform stores.
        let db = Database::new(config.clone()).await.context("error opening database")?;

        let server_handle = AppServer::new(config.clone(), db, shutdown_tx.clone())
            .await?
            .spawn()
            .context("error setting up context update gRPC server")?;

        Ok(Self {
            _config: config,
            shutdown_tx,
            shutdown_rx: BroadcastStream::new(shutdown_rx),
            server_handle,
        })
    }

    pub fn spawn(self) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> Result<()> {
        let mut signals = StreamMap::new();
        signals.insert("sigterm", SignalStream::new(signal(SignalKind::terminate()).context("error building signal stream")?));
        signals.insert("sigint", SignalStream::new(signal(SignalKind::interrupt()).context("error building signal stream")?));

        loop {
            tokio::select! {
                Some((_, sig)) = signals.next() => {
                    tracing::debug!(signal = ?sig, "signal received, beginning graceful shutdown");
                    let _ = self.shutdown_tx.send(());
                    break;
                }
                _ = self.shutdown_rx.next() => break,
            }
        }

        // Begin shutdown routine.
        tracing::debug!("HPA action controller is shutting down");
        if let Err(err) = self.server_handle.await {
            tracing::error!(error = ?err, "error joining context update gRPC server task");
        }

        tracing::debug!("HPA action controller shutdown complete");
        Ok(())
    }
}
