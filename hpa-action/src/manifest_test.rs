use anyhow::Result;

use crate::error::AppError;
use crate::manifest::ManifestView;

const DEPLOYMENT: &str = r#"apiVersion: apps/v1
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

const DEPLOYMENT_NO_SPEC: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: r1-http-client
"#;

const DEPLOYMENT_NO_TEMPLATE: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: r1-http-client
spec:
  replicas: 1
"#;

const DEPLOYMENT_NO_METADATA: &str = r#"apiVersion: apps/v1
kind: Deployment
spec:
  replicas: 1
  template:
    spec:
      containers:
        - name: http-client-1
"#;

#[test]
fn decode_exposes_the_deployment_sections() -> Result<()> {
    let view = ManifestView::decode(DEPLOYMENT.as_bytes())?;

    assert!(view.metadata().is_some(), "expected metadata section to be present");
    assert!(view.metadata_name() == Some("r1-http-client"), "unexpected metadata name, got {:?}", view.metadata_name());
    assert!(view.spec().is_some(), "expected spec section to be present");
    assert!(view.template().is_some(), "expected spec.template to be present");
    assert!(view.replicas() == Some(1), "unexpected replicas, got {:?}, expected Some(1)", view.replicas());

    Ok(())
}

#[test]
fn decode_reports_missing_sections_as_absences() -> Result<()> {
    let view = ManifestView::decode(DEPLOYMENT_NO_SPEC.as_bytes())?;
    assert!(view.spec().is_none(), "expected spec to be absent");
    assert!(view.template().is_none(), "expected template to be absent");
    assert!(view.replicas().is_none(), "expected replicas to be absent");

    let view = ManifestView::decode(DEPLOYMENT_NO_TEMPLATE.as_bytes())?;
    assert!(view.spec().is_some(), "expected spec to be present");
    assert!(view.template().is_none(), "expected template to be absent");

    let view = ManifestView::decode(DEPLOYMENT_NO_METADATA.as_bytes())?;
    assert!(view.metadata().is_none(), "expected metadata to be absent");
    assert!(view.metadata_name().is_none(), "expected metadata name to be absent");

    Ok(())
}

#[test]
fn decode_fails_on_malformed_yaml() {
    // `metadata` opens a scalar, so the indented mapping below it is invalid.
    let raw = "apiVersion: apps/v1\nkind: Deployment\nmetadata\n  name: r1-http-client\n";
    let res = ManifestView::decode(raw.as_bytes());
    assert!(matches!(res, Err(AppError::MalformedManifest(_))), "expected MalformedManifest, got {:?}", res);
}

#[test]
fn decode_fails_on_non_mapping_root() {
    let res = ManifestView::decode(b"42");
    assert!(matches!(res, Err(AppError::MalformedManifest(_))), "expected MalformedManifest, got {:?}", res);
}

#[test]
fn encode_then_decode_preserves_the_view() -> Result<()> {
    let view = ManifestView::decode(DEPLOYMENT.as_bytes())?;
    let reparsed = ManifestView::decode(&view.encode()?)?;
    assert!(reparsed == view, "expected the view to survive an encode/decode round-trip\n{:?}\n{:?}", reparsed, view);
    Ok(())
}

#[test]
fn pod_template_round_trip_preserves_template_metadata() -> Result<()> {
    let mut view = ManifestView::decode(DEPLOYMENT.as_bytes())?;
    let template = view.pod_template()?.expect("expected pod template to be present");
    view.set_pod_template(&template)?;

    let reparsed = ManifestView::decode(&view.encode()?)?;
    let labels = reparsed
        .template()
        .and_then(|t| t.get("metadata"))
        .and_then(|m| m.get("labels"))
        .and_then(|l| l.get("app"))
        .and_then(|v| v.as_str());
    assert!(labels == Some("http-client"), "expected template labels to survive the typed round-trip, got {:?}", labels);

    Ok(())
}

#[test]
fn set_replicas_is_a_no_op_without_a_spec_section() -> Result<()> {
    let mut view = ManifestView::decode(DEPLOYMENT_NO_SPEC.as_bytes())?;
    view.set_replicas(5);
    assert!(view.replicas().is_none(), "expected replicas to remain absent, got {:?}", view.replicas());
    Ok(())
}
