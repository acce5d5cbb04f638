//! HPA intent catalog adapter.
//!
//! Catalog records are JSON documents keyed by the composite hierarchy
//! `/projects/{p}/composite-apps/{ca}/{v}/...`, written by the HPA placement surface.
//! This adapter enumerates them; it never creates, updates or deletes records.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::database::{Database, Tree};
use hpa_core::model::{App, CompositeCoord, HpaConsumer, HpaIntent, HpaRequirement};
use hpa_core::store::IntentCatalog;

/// The key prefix under which the apps of a composite are stored.
pub(crate) fn apps_prefix(coord: &CompositeCoord) -> String {
    format!("/projects/{}/composite-apps/{}/{}/apps/", coord.project, coord.composite_app, coord.version)
}

/// The key prefix under which the HPA intents of a deployment intent group are stored.
pub(crate) fn intents_prefix(coord: &CompositeCoord) -> String {
    format!(
        "/projects/{}/composite-apps/{}/{}/deployment-intent-groups/{}/hpa-intents/",
        coord.project, coord.composite_app, coord.version, coord.deployment_intent_group
    )
}

/// The key prefix under which an intent's consumers are stored.
pub(crate) fn consumers_prefix(coord: &CompositeCoord, intent: &str) -> String {
    format!("{}{}/consumers/", intents_prefix(coord), intent)
}

/// The key prefix under which a consumer's resource requirements are stored.
pub(crate) fn resources_prefix(coord: &CompositeCoord, intent: &str, consumer: &str) -> String {
    format!("{}{}/resources/", consumers_prefix(coord, intent), consumer)
}

/// Decode the direct child records under the given key prefix, in store order.
async fn child_records<T: DeserializeOwned + Send + 'static>(tree: Tree, prefix: String) -> Result<Vec<T>> {
    Database::spawn_blocking(move || -> Result<Vec<T>> {
        let mut records = Vec::new();
        for kv in tree.scan_prefix(prefix.as_bytes()) {
            let (key, val) = kv.context("error iterating catalog keys")?;
            let key = std::str::from_utf8(&key).context("non-utf8 key in catalog")?;
            let rest = &key[prefix.len()..];
            match rest.strip_suffix('/') {
                Some(name) if !name.is_empty() && !name.contains('/') => {
                    let record = serde_json::from_slice(&val).with_context(|| format!("error decoding catalog record {}", key))?;
                    records.push(record);
                }
                _ => continue,
            }
        }
        Ok(records)
    })
    .await?
}

/// The production `IntentCatalog` binding over the platform's KV store.
pub struct KvIntentCatalog {
    tree: Tree,
}

impl KvIntentCatalog {
    /// Create a new instance.
    pub async fn new(db: &Database) -> Result<Self> {
        let tree = db.get_catalog_tree().await?;
        Ok(Self { tree })
    }
}

#[async_trait]
impl IntentCatalog for KvIntentCatalog {
    async fn apps(&self, coord: &CompositeCoord) -> Result<Vec<App>> {
        child_records(self.tree.clone(), apps_prefix(coord)).await
    }

    async fn intents(&self, coord: &CompositeCoord, app: &str) -> Result<Vec<HpaIntent>> {
        let intents: Vec<HpaIntent> = child_records(self.tree.clone(), intents_prefix(coord)).await?;
        Ok(intents.into_iter().filter(|intent| intent.spec.app_name == app).collect())
    }

    async fn consumers(&self, coord: &CompositeCoord, intent: &str) -> Result<Vec<HpaConsumer>> {
        child_records(self.tree.clone(), consumers_prefix(coord, intent)).await
    }

    async fn resources(&self, coord: &CompositeCoord, intent: &str, consumer: &str) -> Result<Vec<HpaRequirement>> {
        child_records(self.tree.clone(), resources_prefix(coord, intent, consumer)).await
    }
}
