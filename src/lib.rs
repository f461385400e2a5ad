//! AuditFlow Rust Library
//!
//! Este crate actúa como la librería de entrada de AuditFlow:
//! - Expone `config` (variables de entorno) y `errors`.
//! - `default_runner` arma el runner con los providers y checks incluidos.
//! - `evaluate_snapshot` evalúa un snapshot JSON `{ artifact: valor }`.

pub mod config;
pub mod errors;

use std::path::Path;

use audit_core::{ArtifactStore, EvaluationRun, EvaluationRunner};
use serde_json::Value;

use config::EvalConfig;
use errors::CoreError;

/// Runner con los providers y checks incluidos, usando el pass configurado.
pub fn default_runner(config: &EvalConfig) -> Result<EvaluationRunner, CoreError> {
    Ok(audit_adapters::register_bundled(EvaluationRunner::builder(), &config.pass)?.build())
}

/// Lee un snapshot JSON de artifacts desde disco.
pub fn load_snapshot(path: &Path) -> Result<ArtifactStore, CoreError> {
    let text = std::fs::read_to_string(path)?;
    let snapshot: Value = serde_json::from_str(&text)?;
    Ok(ArtifactStore::from_snapshot(snapshot)?)
}

/// Evalúa la selección configurada sobre `store`.
pub async fn evaluate_store(store: ArtifactStore, config: &EvalConfig) -> Result<EvaluationRun, CoreError> {
    let runner = default_runner(config)?;
    Ok(runner.run(store, &config.selection()).await?)
}

/// Evalúa un snapshot ya parseado.
pub async fn evaluate_snapshot(snapshot: Value, config: &EvalConfig) -> Result<EvaluationRun, CoreError> {
    evaluate_store(ArtifactStore::from_snapshot(snapshot)?, config).await
}
