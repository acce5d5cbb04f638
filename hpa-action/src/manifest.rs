//! Workload manifest codec.
//!
//! Manifests live in the app context as YAML bytes. The codec round-trips them through a
//! generic JSON value — re-encoding via the JSON shape normalizes quoting and strips
//! codec-specific noise, which is the form downstream consumers of the context expect.
//! Missing `metadata`/`spec`/`template` sections are not decode errors; the accessors
//! report them as absences and the caller decides what a partial shape means.

use k8s_openapi::api::core::v1::PodTemplateSpec;
use serde_json::{Map, Value};

use crate::error::AppError;

/// A structured view over one workload manifest.
///
/// Fields not touched by a mutation survive the round-trip untouched; only the
/// `.spec.template` subtree is rebuilt when a mutation goes through the typed pod
/// template bridge.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestView {
    root: Value,
}

impl ManifestView {
    /// Decode the given manifest bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, AppError> {
        let root: Value = serde_yaml::from_slice(raw).map_err(|err| AppError::MalformedManifest(err.to_string()))?;
        if !root.is_object() {
            return Err(AppError::MalformedManifest("manifest root is not a mapping".into()));
        }
        Ok(Self { root })
    }

    /// Encode the view back to manifest bytes.
    pub fn encode(&self) -> Result<Vec<u8>, AppError> {
        serde_yaml::to_vec(&self.root).map_err(|err| AppError::MalformedManifest(err.to_string()))
    }

    /// The manifest's `metadata` section, if present.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.root.get("metadata")?.as_object()
    }

    /// The manifest's `metadata.name`, if present.
    pub fn metadata_name(&self) -> Option<&str> {
        self.metadata()?.get("name")?.as_str()
    }

    /// The manifest's `spec` section, if present.
    pub fn spec(&self) -> Option<&Map<String, Value>> {
        self.root.get("spec")?.as_object()
    }

    fn spec_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.root.get_mut("spec")?.as_object_mut()
    }

    /// The manifest's `spec.template` subtree, if present.
    pub fn template(&self) -> Option<&Value> {
        self.spec()?.get("template")
    }

    /// The manifest's `spec.replicas`, if present as an integer.
    pub fn replicas(&self) -> Option<i64> {
        self.spec()?.get("replicas")?.as_i64()
    }

    /// Overwrite `spec.replicas`; a no-op when the manifest carries no `spec` section.
    pub fn set_replicas(&mut self, replicas: i64) {
        if let Some(spec) = self.spec_mut() {
            spec.insert("replicas".into(), Value::from(replicas));
        }
    }

    /// The `spec.template` subtree as a typed pod template.
    pub fn pod_template(&self) -> Result<Option<PodTemplateSpec>, AppError> {
        match self.template() {
            None => Ok(None),
            Some(template) => serde_json::from_value(template.clone())
                .map(Some)
                .map_err(|err| AppError::MalformedManifest(format!("pod template: {}", err))),
        }
    }

    /// Serialize the given pod template back into the `spec.template` subtree so that
    /// encoding sees the updates.
    pub fn set_pod_template(&mut self, template: &PodTemplateSpec) -> Result<(), AppError> {
        let value = serde_json::to_value(template).map_err(|err| AppError::MalformedManifest(format!("pod template: {}", err)))?;
        match self.spec_mut() {
            Some(spec) => {
                spec.insert("template".into(), value);
                Ok(())
            }
            None => Err(AppError::MalformedManifest("manifest has no spec section to hold the pod template".into())),
        }
    }
}
