//! Application server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tonic::transport::{Identity, Server, ServerTlsConfig};
use tonic::{Request, Response};

use crate::action;
use crate::appcontext::KvContextStore;
use crate::catalog::KvIntentCatalog;
use crate::config::Config;
use crate::database::Database;
use crate::error::{AppError, RpcResult};
use crate::grpc;

/// Application server.
pub struct AppServer {
    /// The application's runtime config.
    config: Arc<Config>,
    /// The intent catalog adapter.
    catalog: KvIntentCatalog,
    /// The app context store adapter.
    context: KvContextStore,

    /// A channel used for triggering graceful shutdown.
    shutdown: broadcast::Sender<()>,
}

impl AppServer {
    /// Create a new instance.
    pub async fn new(config: Arc<Config>, db: Database, shutdown: broadcast::Sender<()>) -> Result<Self> {
        let catalog = KvIntentCatalog::new(&db).await?;
        let context = KvContextStore::new(&db).await?;
        Ok(Self { config, catalog, context, shutdown })
    }

    /// Spawn this controller which also creates the context update gRPC server.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let addr = format!("0.0.0.0:{}", self.config.grpc_port).parse().context("failed to parse listener address")?;
        let (shutdown, mut shutdown_rx) = (self.shutdown.clone(), self.shutdown.subscribe());

        let mut builder = Server::builder();
        if self.config.tls_enabled() {
            let (cert, key) = self.config.tls_credentials()?;
            builder = builder
                .tls_config(ServerTlsConfig::new().identity(Identity::from_pem(cert, key)))
                .context("error configuring TLS for context update gRPC server")?;
        }

        let service = grpc::ContextUpdateServer::new(self);
        let fut = builder.add_service(service).serve_with_shutdown(addr, async move {
            let _res = shutdown_rx.recv().await;
        });
        Ok(tokio::spawn(async move {
            if let Err(err) = fut.await {
                tracing::error!(error = ?err, "error from context update gRPC server");
            }
            let _res = shutdown.send(());
        }))
    }
}

#[tonic::async_trait]
impl grpc::ContextUpdate for AppServer {
    /// Apply the named intent's resource requirements to the app context.
    ///
    /// Application-level failures are reported in the response envelope, never as a
    /// transport error, so callers can tell a broken transform from a broken transport.
    async fn update_app_context(&self, request: Request<grpc::ContextUpdateRequest>) -> RpcResult<Response<grpc::ContextUpdateResponse>> {
        let req = request.into_inner();
        tracing::info!(intent = %req.intent_name, appcontext = %req.app_context, "received update app context request");

        if req.app_context.is_empty() {
            tracing::warn!(intent = %req.intent_name, "update app context request carries no app context ID");
            return Ok(Response::new(grpc::ContextUpdateResponse {
                app_context_updated: false,
                app_context_update_message: AppError::InvalidRequest.to_string(),
            }));
        }

        match action::update_app_context(&self.catalog, &self.context, &req.intent_name, &req.app_context).await {
            Ok(()) => Ok(Response::new(grpc::ContextUpdateResponse {
                app_context_updated: true,
                app_context_update_message: format!("Successful application of intent {} to {}", req.intent_name, req.app_context),
            })),
            Err(err) => {
                tracing::error!(error = ?err, intent = %req.intent_name, appcontext = %req.app_context, "error applying intent to app context");
                Ok(Response::new(grpc::ContextUpdateResponse {
                    app_context_updated: false,
                    app_context_update_message: format!("{:#}", err),
                }))
            }
        }
    }
}
