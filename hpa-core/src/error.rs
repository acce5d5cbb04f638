//! HPA error abstractions.

use thiserror::Error;

/// Application error variants.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request carried no app context ID.
    #[error("invalid request error")]
    InvalidRequest,
    /// The requested app context does not exist.
    #[error("app context {0} not found")]
    ContextNotFound(String),
    /// The app has no clusters attached in the app context.
    #[error("no clusters found for app {app} in app context {ctx}")]
    ClustersNotFound { ctx: String, app: String },
    /// The named resource handle does not exist in the app context.
    #[error("resource {resource} of app {app} not found on cluster {cluster}")]
    ResourceNotFound { app: String, cluster: String, resource: String },
    /// The manifest held by a resource handle could not be decoded.
    #[error("error decoding workload manifest: {0}")]
    MalformedManifest(String),
    /// The targeted workload's metadata name does not match the consumer spec.
    #[error("consumer-spec Name mis-match, expected workload {expected} found {found}")]
    NameMismatch { expected: String, found: String },
    /// The targeted container does not exist in the workload's pod template.
    #[error("consumer-spec container-name mis-match, container {container} not found in {observed:?}")]
    ContainerMismatch { container: String, observed: Vec<String> },
}
