use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use audit_adapters::artifacts::NetworkRecords;
use audit_adapters::providers::NetworkRecordsProvider;
use audit_adapters::{checks::IsOnHttps, register_bundled};
use audit_core::{ArtifactStore, Check, CheckDescriptor, CheckError, CheckResult, CheckSelection, DerivationContext, DerivationError,
                 DerivedArtifactProvider, Details, EvaluationContext, EvaluationRunner, Outcome};
use serde_json::{json, Value};

fn runner() -> EvaluationRunner {
    register_bundled(EvaluationRunner::builder(), "defaultPass").unwrap().build()
}

async fn evaluate(check: &str, store: ArtifactStore) -> audit_core::AuditEntry {
    let run = runner().run(store, &CheckSelection::only([check])).await.unwrap();
    run.report.get(check).cloned().unwrap()
}

fn devtools_logs(urls: &[&str]) -> Value {
    let events: Vec<Value> = urls.iter()
                                 .enumerate()
                                 .map(|(i, url)| json!({"method": "Network.requestWillBeSent", "params": {"requestId": i.to_string(), "request": {"url": url}}}))
                                 .collect();
    json!({ "defaultPass": events })
}

#[tokio::test]
async fn websql_null_passes_without_debug_string() {
    let entry = evaluate("no-websql", ArtifactStore::new().with("WebSQL", Value::Null).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Passed);
    assert_eq!(entry.result.unwrap().debug_string, None);
}

#[tokio::test]
async fn websql_database_fails_with_name_and_version() {
    let store = ArtifactStore::new().with("WebSQL", json!({"name": "db1", "version": "1.0"})).unwrap();
    let entry = evaluate("no-websql", store).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    let debug = entry.result.unwrap().debug_string.unwrap();
    assert_eq!(debug, "Found database \"db1\", version: 1.0.");
}

#[tokio::test]
async fn websql_absent_is_errored() {
    let entry = evaluate("no-websql", ArtifactStore::new()).await;
    assert_eq!(entry.outcome, Outcome::Errored);
    assert_eq!(entry.error.as_deref(), Some("required artifacts missing: WebSQL"));
}

#[tokio::test]
async fn notification_permission_violation_is_reported_once() {
    let messages = json!([
        {"entry": {"source": "violation", "text": "notification permission requested", "url": "https://l1/app.js"}},
        {"entry": {"source": "violation", "text": "unrelated", "url": "https://l2/other.js"}}
    ]);
    let entry = evaluate("notification-on-start", ArtifactStore::new().with("ChromeConsoleMessages", messages).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    let result = entry.result.unwrap();
    match result.details {
        Some(Details::Table { headings, items }) => {
            assert_eq!(headings.len(), 2);
            assert_eq!(items.len(), 1);
            assert_eq!(items[0]["url"], "https://l1/app.js");
        }
        other => panic!("unexpected details: {other:?}"),
    }
    assert_eq!(result.raw_extended_info.and_then(|v| v.as_array().map(Vec::len)), Some(1));
}

#[tokio::test]
async fn console_without_matches_passes() {
    let messages = json!([{"entry": {"source": "violation", "text": "Forced reflow", "url": "https://l1/"}}]);
    let entry = evaluate("notification-on-start", ArtifactStore::new().with("ChromeConsoleMessages", messages).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Passed);
}

#[tokio::test]
async fn password_inputs_list_every_offender() {
    let inputs = json!([{"snippet": "<input type=\"password\" onpaste=\"return false\">"}, {"snippet": "<input id=\"pw2\">"}]);
    let entry = evaluate("password-inputs-can-be-pasted-into",
                         ArtifactStore::new().with("PasswordInputsWithPreventedPaste", inputs).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    let result = entry.result.unwrap();
    assert_eq!(result.details.as_ref().map(Details::len), Some(2));
    assert_eq!(result.raw_extended_info.and_then(|v| v.as_array().map(Vec::len)), Some(2));

    let entry = evaluate("password-inputs-can-be-pasted-into",
                         ArtifactStore::new().with("PasswordInputsWithPreventedPaste", json!([])).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Passed);
}

#[tokio::test]
async fn manifest_parse_failure_fails_without_short_name_inspection() {
    let manifest = json!({"raw": "{ not json", "url": "https://example.com/manifest.json"});
    let entry = evaluate("manifest-short-name-length", ArtifactStore::new().with("Manifest", manifest).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    let debug = entry.result.unwrap().debug_string.unwrap();
    assert!(debug.starts_with("ERROR: file isn't valid JSON"));
    assert_ne!(debug, "No short_name found in manifest.");
}

#[tokio::test]
async fn manifest_short_name_outcomes() {
    let cases = [(Value::Null, Outcome::NotApplicable),
                 (json!({"raw": "{}", "url": "u", "value": {"name": "App"}}), Outcome::Failed),
                 (json!({"raw": "", "url": "u", "value": {"short_name": "Short"}}), Outcome::Passed),
                 (json!({"raw": "", "url": "u", "value": {"short_name": "A much too long name"}}), Outcome::Failed)];
    for (manifest, expected) in cases {
        let entry = evaluate("manifest-short-name-length", ArtifactStore::new().with("Manifest", manifest.clone()).unwrap()).await;
        assert_eq!(entry.outcome, expected, "manifest {manifest}");
    }

    let entry = evaluate("manifest-short-name-length",
                         ArtifactStore::new().with("Manifest", json!({"raw": "{}", "url": "u", "value": {}})).unwrap()).await;
    assert_eq!(entry.result.unwrap().debug_string.as_deref(), Some("No short_name found in manifest."));
}

#[tokio::test]
async fn incomplete_manifest_objects_fail_instead_of_erroring() {
    let entry = evaluate("manifest-short-name-length", ArtifactStore::new().with("Manifest", json!({})).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    assert!(entry.result.unwrap().debug_string.unwrap().starts_with("ERROR:"));

    let entry = evaluate("manifest-short-name-length", ArtifactStore::new().with("Manifest", json!({"raw": "{}"})).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    assert_eq!(entry.result.unwrap().debug_string.as_deref(), Some("No short_name found in manifest."));
}

#[tokio::test]
async fn insecure_requests_are_counted() {
    let logs = devtools_logs(&["https://a.com/", "http://a.com/x.js", "http://localhost/dev", "http://b.com/y.css"]);
    let entry = evaluate("is-on-https", ArtifactStore::new().with("devtoolsLogs", logs).unwrap()).await;
    assert_eq!(entry.outcome, Outcome::Failed);
    let result = entry.result.unwrap();
    assert_eq!(result.display_value.as_deref(), Some("2 insecure requests found"));
    match result.details {
        Some(Details::List { header, items }) => {
            assert_eq!(header.as_deref(), Some("Insecure URLs:"));
            let urls: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
            assert_eq!(urls, vec!["http://a.com/x.js", "http://b.com/y.css"]);
        }
        other => panic!("unexpected details: {other:?}"),
    }
}

#[tokio::test]
async fn missing_pass_in_logs_is_a_derivation_error() {
    let store = ArtifactStore::new().with("devtoolsLogs", json!({"otherPass": []})).unwrap();
    let entry = evaluate("is-on-https", store).await;
    assert_eq!(entry.outcome, Outcome::Errored);
    assert!(entry.error.unwrap().contains("devtoolsLogs.defaultPass"));
}

/// Envuelve el provider real contando ejecuciones.
struct CountingRecords {
    inner: NetworkRecordsProvider,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DerivedArtifactProvider for CountingRecords {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn default_params(&self) -> Value {
        self.inner.default_params()
    }

    async fn compute(&self, ctx: &DerivationContext<'_>, params: &Value) -> Result<Value, DerivationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.compute(ctx, params).await
    }
}

/// Segundo consumidor de `network-records`.
struct RequestCount;

#[async_trait]
impl Check for RequestCount {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("request-count", "Counts requests").requires(&["devtoolsLogs", "network-records"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        let NetworkRecords(records) = ctx.request_as::<NetworkRecords>(&NetworkRecordsProvider::params("defaultPass")).await?;
        Ok(CheckResult::pass().with_display_value(records.len().to_string()))
    }
}

#[tokio::test]
async fn network_records_are_derived_once_for_two_checks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runner = EvaluationRunner::builder().provider(CountingRecords { inner: NetworkRecordsProvider::default(),
                                                                        calls: calls.clone() })
                                            .unwrap()
                                            .check(IsOnHttps::default())
                                            .unwrap()
                                            .check(RequestCount)
                                            .unwrap()
                                            .build();
    let store = ArtifactStore::new().with("devtoolsLogs", devtools_logs(&["https://a.com/", "http://b.com/"])).unwrap();
    let run = runner.run_all(store).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(run.report.outcome("is-on-https"), Some(Outcome::Failed));
    assert_eq!(run.report.get("request-count").and_then(|e| e.result.as_ref()).and_then(|r| r.display_value.as_deref()),
               Some("2"));
}

#[test]
fn collector_requirements_exclude_derived_artifacts() {
    let runner = runner();
    let raw: Vec<_> = runner.checks().required_raw_artifacts(runner.providers()).into_iter().collect();
    assert_eq!(raw,
               vec!["ChromeConsoleMessages", "Manifest", "PasswordInputsWithPreventedPaste", "WebSQL", "devtoolsLogs"]);
}
