//! Collaborator interfaces over the app context store and the HPA intent catalog.
//!
//! The action controller only ever reads intents and rewrites manifest bytes held by
//! resource handles, so these traits expose exactly that surface and nothing more.
//! Production code binds them to the platform's stores; tests bind them to a scratch
//! database. No implementation detail of either store leaks into the transformation core.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{App, CompositeAppMeta, CompositeCoord, HpaConsumer, HpaIntent, HpaRequirement};

/// Read/write access to one app context, addressed by its opaque context ID.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Load the composite-app meta record of the context.
    async fn load_meta(&self, ctx_id: &str) -> Result<CompositeAppMeta>;

    /// The clusters attached to the given app in the context.
    async fn cluster_names(&self, ctx_id: &str, app: &str) -> Result<Vec<String>>;

    /// The resource names held by the given app/cluster pair.
    async fn resource_names(&self, ctx_id: &str, app: &str, cluster: &str) -> Result<Vec<String>>;

    /// The manifest bytes held by the named resource handle.
    async fn resource_value(&self, ctx_id: &str, app: &str, cluster: &str, resource: &str) -> Result<Vec<u8>>;

    /// Overwrite the manifest bytes held by the named resource handle.
    ///
    /// The handle must already exist; this controller never creates resource handles.
    async fn update_resource_value(&self, ctx_id: &str, app: &str, cluster: &str, resource: &str, value: Vec<u8>) -> Result<()>;
}

/// Read-only enumeration of the HPA intent catalog.
#[async_trait]
pub trait IntentCatalog: Send + Sync {
    /// All apps of the composite application.
    async fn apps(&self, coord: &CompositeCoord) -> Result<Vec<App>>;

    /// All HPA intents of the deployment intent group which target the given app.
    async fn intents(&self, coord: &CompositeCoord, app: &str) -> Result<Vec<HpaIntent>>;

    /// All consumers declared under the given intent.
    async fn consumers(&self, coord: &CompositeCoord, intent: &str) -> Result<Vec<HpaConsumer>>;

    /// All resource requirements declared under the given consumer.
    async fn resources(&self, coord: &CompositeCoord, intent: &str, consumer: &str) -> Result<Vec<HpaRequirement>>;
}
