//! Test fixtures for seeding the catalog and app context trees.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::appcontext;
use crate::catalog;
use crate::config::Config;
use crate::database::Database;
use hpa_core::model::{
    AllocatableSpec, App, CompositeAppMeta, CompositeCoord, HpaConsumer, HpaConsumerSpec, HpaIntent, HpaIntentSpec, HpaRequirement,
    HpaRequirementSpec, Metadata, NonAllocatableSpec, ResourceSpec,
};

pub const PROJECT: &str = "p";
pub const COMPOSITE_APP: &str = "ca";
pub const VERSION: &str = "v1";
pub const DIG: &str = "dig";
pub const CTX_ID: &str = "5345674458787728";

pub const APP_CLIENT: &str = "client";
pub const CLUSTER_1: &str = "provider1-cluster1";
pub const DEPLOYMENT_1: &str = "r1-http-client";
pub const CONTAINER_1: &str = "http-client-1";
pub const INTENT_1: &str = "hpa-intent-1";
pub const CONSUMER_1: &str = "hpa-consumer-1";
pub const REQUIREMENT_1: &str = "hpa-alloc-resource-1";

pub const DEPLOYMENT_SPEC: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: r1-http-client
spec:
  replicas: 1
  template:
    metadata:
      labels:
        app: http-client
    spec:
      containers:
        - name: http-client-1
"#;

/// Create a tempdir-backed database for a test.
pub async fn setup_db() -> Result<(Arc<Config>, tempfile::TempDir, Database)> {
    let (config, tmpdir) = Config::new_test()?;
    let db = Database::new(config.clone()).await?;
    Ok((config, tmpdir, db))
}

pub fn composite_coord() -> CompositeCoord {
    CompositeCoord {
        project: PROJECT.into(),
        composite_app: COMPOSITE_APP.into(),
        version: VERSION.into(),
        deployment_intent_group: DIG.into(),
    }
}

pub fn composite_meta() -> CompositeAppMeta {
    CompositeAppMeta {
        project: PROJECT.into(),
        composite_app: COMPOSITE_APP.into(),
        version: VERSION.into(),
        deployment_intent_group: DIG.into(),
        release: "r1".into(),
        namespace: "n1".into(),
        level: "default".into(),
    }
}

fn metadata(name: &str) -> Metadata {
    Metadata {
        name: name.into(),
        description: "test record".into(),
        ..Default::default()
    }
}

pub fn consumer(name: &str, workload: &str, container: &str, replicas: i64) -> HpaConsumer {
    HpaConsumer {
        metadata: metadata(name),
        spec: HpaConsumerSpec {
            api_version: "apps/v1".into(),
            kind: "Deployment".into(),
            replicas,
            name: workload.into(),
            container_name: container.into(),
        },
    }
}

pub fn allocatable(name: &str, requests: i64, limits: i64) -> ResourceSpec {
    ResourceSpec::Allocatable(AllocatableSpec {
        name: name.into(),
        requests,
        limits,
        units: None,
    })
}

pub fn non_allocatable(key: &str, value: &str) -> ResourceSpec {
    ResourceSpec::NonAllocatable(NonAllocatableSpec { key: key.into(), value: value.into() })
}

/// Write the composite-app meta record of an app context.
pub async fn setup_context(db: &Database, ctx_id: &str, meta: &CompositeAppMeta) -> Result<()> {
    let tree = db.get_appcontext_tree().await?;
    tree.insert(appcontext::meta_key(ctx_id).as_bytes(), serde_json::to_vec(meta)?)
        .context("error seeding composite-app meta")?;
    Ok(())
}

/// Attach a cluster to an app in the app context.
pub async fn add_cluster(db: &Database, ctx_id: &str, app: &str, cluster: &str) -> Result<()> {
    let tree = db.get_appcontext_tree().await?;
    let key = format!("{}{}/", appcontext::cluster_prefix(ctx_id, app), cluster);
    tree.insert(key.as_bytes(), "").context("error seeding cluster node")?;
    Ok(())
}

/// Place a manifest under a resource handle in the app context.
pub async fn add_resource(db: &Database, ctx_id: &str, app: &str, cluster: &str, resource: &str, manifest: &str) -> Result<()> {
    let tree = db.get_appcontext_tree().await?;
    tree.insert(appcontext::resource_key(ctx_id, app, cluster, resource).as_bytes(), manifest.as_bytes())
        .context("error seeding resource value")?;
    Ok(())
}

/// Read back the manifest bytes held by a resource handle.
pub async fn resource_bytes(db: &Database, ctx_id: &str, app: &str, cluster: &str, resource: &str) -> Result<Vec<u8>> {
    let tree = db.get_appcontext_tree().await?;
    let val = tree
        .get(appcontext::resource_key(ctx_id, app, cluster, resource).as_bytes())
        .context("error reading resource value")?
        .context("resource handle not found")?;
    Ok(val.to_vec())
}

/// Register an app under the composite in the catalog.
pub async fn put_app(db: &Database, coord: &CompositeCoord, name: &str) -> Result<()> {
    let tree = db.get_catalog_tree().await?;
    let record = App { metadata: metadata(name) };
    let key = format!("{}{}/", catalog::apps_prefix(coord), name);
    tree.insert(key.as_bytes(), serde_json::to_vec(&record)?).context("error seeding app record")?;
    Ok(())
}

/// Register an HPA intent targeting the given app.
pub async fn put_intent(db: &Database, coord: &CompositeCoord, name: &str, app_name: &str) -> Result<()> {
    let tree = db.get_catalog_tree().await?;
    let record = HpaIntent {
        metadata: metadata(name),
        spec: HpaIntentSpec { app_name: app_name.into() },
    };
    let key = format!("{}{}/", catalog::intents_prefix(coord), name);
    tree.insert(key.as_bytes(), serde_json::to_vec(&record)?).context("error seeding intent record")?;
    Ok(())
}

/// Register a consumer under the given intent.
pub async fn put_consumer(db: &Database, coord: &CompositeCoord, intent: &str, record: &HpaConsumer) -> Result<()> {
    let tree = db.get_catalog_tree().await?;
    let key = format!("{}{}/", catalog::consumers_prefix(coord, intent), &record.metadata.name);
    tree.insert(key.as_bytes(), serde_json::to_vec(record)?).context("error seeding consumer record")?;
    Ok(())
}

/// Register a resource requirement under the given consumer.
pub async fn put_requirement(db: &Database, coord: &CompositeCoord, intent: &str, consumer: &str, name: &str, resource: ResourceSpec) -> Result<()> {
    let tree = db.get_catalog_tree().await?;
    let record = HpaRequirement {
        metadata: metadata(name),
        spec: HpaRequirementSpec { mandatory: true, weight: 1, resource },
    };
    let key = format!("{}{}/", catalog::resources_prefix(coord, intent, consumer), name);
    tree.insert(key.as_bytes(), serde_json::to_vec(&record)?).context("error seeding requirement record")?;
    Ok(())
}

/// Seed the default scene used by the end-to-end tests: one composite with one app, one
/// intent, one named consumer with a cpu requirement, and a context holding one cluster
/// with one Deployment.
pub async fn seed_default(db: &Database) -> Result<()> {
    let coord = composite_coord();
    setup_context(db, CTX_ID, &composite_meta()).await?;
    add_cluster(db, CTX_ID, APP_CLIENT, CLUSTER_1).await?;
    add_resource(db, CTX_ID, APP_CLIENT, CLUSTER_1, &format!("{}+Deployment", DEPLOYMENT_1), DEPLOYMENT_SPEC).await?;

    put_app(db, &coord, APP_CLIENT).await?;
    put_intent(db, &coord, INTENT_1, APP_CLIENT).await?;
    put_consumer(db, &coord, INTENT_1, &consumer(CONSUMER_1, DEPLOYMENT_1, CONTAINER_1, 0)).await?;
    put_requirement(db, &coord, INTENT_1, CONSUMER_1, REQUIREMENT_1, allocatable("cpu", 1, 1)).await?;
    Ok(())
}
