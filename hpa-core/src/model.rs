//! Data model of the HPA intent catalog.
//!
//! These records are written by the HPA placement surface (API handlers and the placement
//! controller) and are read-only for the action controller. The serde shapes here are the
//! catalog's wire contract and must not drift from what the writers produce.

use serde::{Deserialize, Serialize};

/// The coordinate of a composite application scoped to one deployment intent group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeCoord {
    pub project: String,
    pub composite_app: String,
    pub version: String,
    pub deployment_intent_group: String,
}

/// The composite-app meta record carried by every app context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeAppMeta {
    pub project: String,
    pub composite_app: String,
    pub version: String,
    pub deployment_intent_group: String,
    #[serde(default)]
    pub release: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub level: String,
}

impl CompositeAppMeta {
    /// The composite coordinate addressed by this meta record.
    pub fn coord(&self) -> CompositeCoord {
        CompositeCoord {
            project: self.project.clone(),
            composite_app: self.composite_app.clone(),
            version: self.version.clone(),
            deployment_intent_group: self.deployment_intent_group.clone(),
        }
    }
}

/// Descriptive metadata shared by all catalog records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "userData1")]
    pub user_data1: String,
    #[serde(default, rename = "userData2")]
    pub user_data2: String,
}

/// An app belonging to a composite application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub metadata: Metadata,
}

/// A hardware-awareness intent, bound to a single app of the composite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaIntent {
    pub metadata: Metadata,
    pub spec: HpaIntentSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaIntentSpec {
    /// Name of the app targeted by this intent.
    #[serde(default, rename = "app-name")]
    pub app_name: String,
}

/// A workload inside the intent's app which receives the intent's requirements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaConsumer {
    pub metadata: Metadata,
    pub spec: HpaConsumerSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaConsumerSpec {
    /// API version of the consumer object (e.g. `apps/v1`).
    #[serde(default, rename = "api-version")]
    pub api_version: String,
    /// Kind of the consumer object (e.g. `Deployment`).
    #[serde(default)]
    pub kind: String,
    /// Replica count override for the consumer object; `0` leaves the manifest untouched.
    #[serde(default)]
    pub replicas: i64,
    /// Metadata name of the consumer object; empty targets every Deployment in the cluster.
    #[serde(default)]
    pub name: String,
    /// Container name of the consumer object, required for allocatable requirements.
    #[serde(default, rename = "container-name")]
    pub container_name: String,
}

/// One concrete resource requirement declared under a consumer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaRequirement {
    pub metadata: Metadata,
    pub spec: HpaRequirementSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaRequirementSpec {
    /// Whether the requirement is mandatory for placement.
    #[serde(default)]
    pub mandatory: bool,
    /// Relative weight of the requirement during placement.
    #[serde(default)]
    pub weight: i32,
    pub resource: ResourceSpec,
}

impl Default for HpaRequirementSpec {
    fn default() -> Self {
        Self {
            mandatory: false,
            weight: 0,
            resource: ResourceSpec::NonAllocatable(NonAllocatableSpec::default()),
        }
    }
}

/// The resource ask of a requirement.
///
/// Variant order matters: an allocatable ask is tried first, and unknown-field denial routes
/// label asks to the non-allocatable variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceSpec {
    /// A kernel-schedulable quantity (CPU, memory, extended resources).
    Allocatable(AllocatableSpec),
    /// A node label constraint.
    NonAllocatable(NonAllocatableSpec),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocatableSpec {
    /// The requested resource type (e.g. `cpu`, `memory`, `nvidia.com/gpu`).
    #[serde(default)]
    pub name: String,
    /// The requested number of resource instances; memory is expressed in megabytes.
    #[serde(default)]
    pub requests: i64,
    /// The limit of resource instances; `0` means no limit is written.
    #[serde(default)]
    pub limits: i64,
    /// Resource units (e.g. `MB`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NonAllocatableSpec {
    /// Node label key.
    #[serde(default)]
    pub key: String,
    /// Node label value.
    #[serde(default)]
    pub value: String,
}
