//! App context access adapter.
//!
//! An app context is a tree of composite → app → cluster → resource nodes keyed under
//! `/context/{id}/`. The key shapes here mirror the writes of the placement surface and
//! must match them bit-for-bit; this controller never forges new keys, it only reads the
//! hierarchy and overwrites manifest values held by existing resource handles.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::database::{Database, Tree};
use crate::error::AppError;
use hpa_core::model::CompositeAppMeta;
use hpa_core::store::ContextStore;

/// The key of a context's composite-app meta record.
pub(crate) fn meta_key(ctx_id: &str) -> String {
    format!("/context/{}/meta/", ctx_id)
}

/// The key prefix under which an app's clusters are stored.
pub(crate) fn cluster_prefix(ctx_id: &str, app: &str) -> String {
    format!("/context/{}/app/{}/cluster/", ctx_id, app)
}

/// The key prefix under which a cluster's resources are stored.
pub(crate) fn resource_prefix(ctx_id: &str, app: &str, cluster: &str) -> String {
    format!("/context/{}/app/{}/cluster/{}/resource/", ctx_id, app, cluster)
}

/// The key of a resource handle.
pub(crate) fn resource_key(ctx_id: &str, app: &str, cluster: &str, resource: &str) -> String {
    format!("{}{}/", resource_prefix(ctx_id, app, cluster), resource)
}

/// List the direct child node names under the given key prefix.
///
/// Grandchildren carry additional `/` separated segments and are skipped, so listing a
/// cluster prefix yields cluster names without the resource handles stored below them.
async fn child_names(tree: Tree, prefix: String) -> Result<Vec<String>> {
    Database::spawn_blocking(move || -> Result<Vec<String>> {
        let mut names = Vec::new();
        for kv in tree.scan_prefix(prefix.as_bytes()) {
            let (key, _val) = kv.context("error iterating context store keys")?;
            let key = std::str::from_utf8(&key).context("non-utf8 key in context store")?;
            let rest = &key[prefix.len()..];
            if let Some(name) = rest.strip_suffix('/') {
                if !name.is_empty() && !name.contains('/') {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    })
    .await?
}

/// The production `ContextStore` binding over the platform's KV store.
pub struct KvContextStore {
    tree: Tree,
}

impl KvContextStore {
    /// Create a new instance.
    pub async fn new(db: &Database) -> Result<Self> {
        let tree = db.get_appcontext_tree().await?;
        Ok(Self { tree })
    }
}

#[async_trait]
impl ContextStore for KvContextStore {
    async fn load_meta(&self, ctx_id: &str) -> Result<CompositeAppMeta> {
        let (tree, key) = (self.tree.clone(), meta_key(ctx_id));
        let val = Database::spawn_blocking(move || tree.get(key.as_bytes()))
            .await?
            .context("error reading composite-app meta")?;
        let val = val.ok_or_else(|| AppError::ContextNotFound(ctx_id.to_string()))?;
        serde_json::from_slice(&val).context("error decoding composite-app meta record")
    }

    async fn cluster_names(&self, ctx_id: &str, app: &str) -> Result<Vec<String>> {
        let names = child_names(self.tree.clone(), cluster_prefix(ctx_id, app)).await?;
        if names.is_empty() {
            return Err(AppError::ClustersNotFound { ctx: ctx_id.to_string(), app: app.to_string() }.into());
        }
        Ok(names)
    }

    async fn resource_names(&self, ctx_id: &str, app: &str, cluster: &str) -> Result<Vec<String>> {
        child_names(self.tree.clone(), resource_prefix(ctx_id, app, cluster)).await
    }

    async fn resource_value(&self, ctx_id: &str, app: &str, cluster: &str, resource: &str) -> Result<Vec<u8>> {
        let (tree, key) = (self.tree.clone(), resource_key(ctx_id, app, cluster, resource));
        let val = Database::spawn_blocking(move || tree.get(key.as_bytes()))
            .await?
            .context("error reading resource value")?;
        let val = val.ok_or_else(|| AppError::ResourceNotFound {
            app: app.to_string(),
            cluster: cluster.to_string(),
            resource: resource.to_string(),
        })?;
        Ok(val.to_vec())
    }

    async fn update_resource_value(&self, ctx_id: &str, app: &str, cluster: &str, resource: &str, value: Vec<u8>) -> Result<()> {
        let (tree, key) = (self.tree.clone(), resource_key(ctx_id, app, cluster, resource));
        let (app, cluster, resource) = (app.to_string(), cluster.to_string(), resource.to_string());
        Database::spawn_blocking(move || -> Result<()> {
            if tree.get(key.as_bytes()).context("error reading resource value")?.is_none() {
                return Err(AppError::ResourceNotFound { app, cluster, resource }.into());
            }
            tree.insert(key.as_bytes(), value).context("error updating resource value")?;
            tree.flush().context("error flushing context store")?;
            Ok(())
        })
        .await?
    }
}
