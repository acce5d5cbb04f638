//! The intent-to-manifest transformation engine.
//!
//! Applying an intent walks composite → app → intent → consumer → requirement → cluster →
//! workload and rewrites the scheduling constraints and resource asks of every targeted
//! Deployment manifest in the app context. The traversal is flattened into a list of work
//! items up front so that mutation, error propagation and write ordering all happen in one
//! linear loop.
//!
//! Failure handling is deliberately asymmetric. A catalog subtree that cannot be read means
//! another pipeline stage has not run yet, so it contributes no work and the call still
//! succeeds. A missing cluster, a missing or malformed manifest, or a consumer that does not
//! match its manifest is a broken contract and aborts the call with the error; writes
//! performed before the failure remain in place.


use std::collections::BTreeMap;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{PodSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::error::AppError;
use crate::manifest::ManifestView;
use hpa_core::model::{CompositeCoord, HpaConsumerSpec, ResourceSpec};
use hpa_core::store::{ContextStore, IntentCatalog};
use hpa_core::RESOURCE_NAME_SEPARATOR;

/// The workload kind this controller rewrites.
const KIND_DEPLOYMENT: &str = "Deployment";

/// The resource name whose intent quantities are expressed in megabytes.
const RESOURCE_MEMORY: &str = "memory";

/// One pending manifest mutation.
struct WorkItem {
    app: String,
    cluster: String,
    resource_name: String,
    consumer: HpaConsumerSpec,
    requirement: ResourceSpec,
}

/// Whether a context resource name refers to the given manifest kind.
///
/// Resource names follow the `<base>+<kind>` convention, so uppercased containment is the
/// only discrimination needed.
pub(crate) fn has_kind(resource_name: &str, kind: &str) -> bool {
    resource_name.to_uppercase().contains(&kind.to_uppercase())
}

/// Apply all HPA intents bound to the given app context.
pub async fn update_app_context(catalog: &dyn IntentCatalog, context: &dyn ContextStore, intent_name: &str, ctx_id: &str) -> Result<()> {
    tracing::info!(intent = %intent_name, appcontext = %ctx_id, "applying HPA intents to app context");

    let meta = context.load_meta(ctx_id).await.context("error loading app context meta")?;
    let coord = meta.coord();

    let items = collect_work_items(catalog, context, &coord, ctx_id).await?;
    tracing::debug!(
        project = %coord.project,
        composite_app = %coord.composite_app,
        deployment_intent_group = %coord.deployment_intent_group,
        items = items.len(),
        "collected work items",
    );
    for item in &items {
        apply_work_item(context, ctx_id, item).await?;
    }

    tracing::info!(intent = %intent_name, appcontext = %ctx_id, updated = items.len(), "HPA intents applied to app context");
    Ok(())
}

/// Flatten the catalog traversal into the ordered list of manifest mutations to perform.
///
/// An unreadable catalog subtree contributes no work items; cluster and resource-name
/// listing failures in the context are fatal.
async fn collect_work_items(catalog: &dyn IntentCatalog, context: &dyn ContextStore, coord: &CompositeCoord, ctx_id: &str) -> Result<Vec<WorkItem>> {
    let apps = match catalog.apps(coord).await {
        Ok(apps) => apps,
        Err(err) => {
            tracing::error!(error = ?err, composite_app = %coord.composite_app, "error listing apps of composite, nothing to do");
            return Ok(Vec::new());
        }
    };

    let mut items = Vec::new();
    for app in &apps {
        let intents = match catalog.intents(coord, &app.metadata.name).await {
            Ok(intents) => intents,
            Err(err) => {
                tracing::error!(error = ?err, app = %app.metadata.name, "error listing HPA intents of app, skipping app");
                continue;
            }
        };
        for intent in &intents {
            let consumers = match catalog.consumers(coord, &intent.metadata.name).await {
                Ok(consumers) => consumers,
                Err(err) => {
                    tracing::error!(error = ?err, intent = %intent.metadata.name, "error listing consumers of intent, skipping intent");
                    continue;
                }
            };
            for consumer in &consumers {
                let requirements = match catalog.resources(coord, &intent.metadata.name, &consumer.metadata.name).await {
                    Ok(requirements) => requirements,
                    Err(err) => {
                        tracing::error!(error = ?err, consumer = %consumer.metadata.name, "error listing resources of consumer, skipping consumer");
                        continue;
                    }
                };
                for requirement in &requirements {
                    let clusters = context
                        .cluster_names(ctx_id, &intent.spec.app_name)
                        .await
                        .with_context(|| format!("error fetching clusters of app {} from app context", &intent.spec.app_name))?;
                    for cluster in &clusters {
                        let targets = if consumer.spec.name.is_empty() {
                            // No workload named: target every Deployment the cluster holds.
                            let names = context
                                .resource_names(ctx_id, &intent.spec.app_name, cluster)
                                .await
                                .with_context(|| format!("error fetching resource names of cluster {} from app context", cluster))?;
                            names.into_iter().filter(|name| has_kind(name, KIND_DEPLOYMENT)).collect()
                        } else {
                            vec![format!("{}{}{}", &consumer.spec.name, RESOURCE_NAME_SEPARATOR, KIND_DEPLOYMENT)]
                        };
                        for resource_name in targets {
                            items.push(WorkItem {
                                app: intent.spec.app_name.clone(),
                                cluster: cluster.clone(),
                                resource_name,
                                consumer: consumer.spec.clone(),
                                requirement: requirement.spec.resource.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
    Ok(items)
}

/// Apply a single work item: read, decode, mutate, encode, write back.
async fn apply_work_item(context: &dyn ContextStore, ctx_id: &str, item: &WorkItem) -> Result<()> {
    let raw = context
        .resource_value(ctx_id, &item.app, &item.cluster, &item.resource_name)
        .await
        .with_context(|| format!("error fetching resource {} of cluster {} from app context", &item.resource_name, &item.cluster))?;
    let mut view = ManifestView::decode(&raw).with_context(|| format!("error decoding manifest of resource {}", &item.resource_name))?;

    // A manifest without metadata, spec or template is not a target of this controller.
    if view.metadata().is_none() || view.spec().is_none() || view.template().is_none() {
        tracing::warn!(resource = %item.resource_name, cluster = %item.cluster, "manifest is missing metadata, spec or template, skipping");
        return Ok(());
    }

    let mut consumer = item.consumer.clone();
    if consumer.name.is_empty() {
        // The item was selected by kind, not by name; adopt the manifest's own name so the
        // mutator's identity check passes.
        consumer.name = view.metadata_name().unwrap_or_default().to_string();
    }

    apply_requirement(&mut view, &consumer, &item.requirement)
        .with_context(|| format!("error adding resource requirement to workload spec of {}", &item.resource_name))?;

    let encoded = view.encode().context("error encoding mutated manifest")?;
    context
        .update_resource_value(ctx_id, &item.app, &item.cluster, &item.resource_name, encoded)
        .await
        .with_context(|| format!("error updating resource {} of cluster {} in app context", &item.resource_name, &item.cluster))?;

    tracing::debug!(resource = %item.resource_name, cluster = %item.cluster, app = %item.app, "manifest updated");
    Ok(())
}

/// Apply one resource requirement to one decoded Deployment manifest.
///
/// The caller has already verified that `metadata`, `spec` and `spec.template` exist.
pub(crate) fn apply_requirement(view: &mut ManifestView, consumer: &HpaConsumerSpec, requirement: &ResourceSpec) -> Result<(), AppError> {
    // Replica override applies only when the manifest already carries a replica count.
    if view.replicas().is_some() && consumer.replicas > 0 {
        view.set_replicas(consumer.replicas);
    }

    let workload_name = view.metadata_name().unwrap_or_default().to_string();
    if consumer.name.is_empty() || consumer.name != workload_name {
        return Err(AppError::NameMismatch { expected: consumer.name.clone(), found: workload_name });
    }

    let mut template = view.pod_template()?.unwrap_or_default();
    let pod_spec = template.spec.get_or_insert_with(PodSpec::default);
    match requirement {
        ResourceSpec::NonAllocatable(label) => {
            pod_spec.node_selector.get_or_insert_with(BTreeMap::new).insert(label.key.clone(), label.value.clone());
        }
        ResourceSpec::Allocatable(ask) => {
            let observed: Vec<String> = pod_spec.containers.iter().map(|container| container.name.clone()).collect();
            let container = pod_spec
                .containers
                .iter_mut()
                .find(|container| container.name == consumer.container_name)
                .ok_or_else(|| AppError::ContainerMismatch { container: consumer.container_name.clone(), observed })?;

            // Intent quantities for memory arrive in megabytes and are stored in bytes.
            let (mut requests, mut limits) = (ask.requests, ask.limits);
            if ask.name == RESOURCE_MEMORY {
                requests *= 1_000_000;
                limits *= 1_000_000;
            }

            let resources = container.resources.get_or_insert_with(ResourceRequirements::default);
            resources.requests.get_or_insert_with(BTreeMap::new).insert(ask.name.clone(), Quantity(requests.to_string()));
            if ask.limits > 0 {
                resources.limits.get_or_insert_with(BTreeMap::new).insert(ask.name.clone(), Quantity(limits.to_string()));
            }
        }
    }
    view.set_pod_template(&template)?;

    Ok(())
}
