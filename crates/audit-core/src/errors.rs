//! Errores del core de evaluación.
//!
//! Todo error de un check queda contenido en ese check (se reporta como
//! `errored`); sólo `EvaluationError` puede abortar una corrida.

use std::any::Any;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallo de un proveedor de artifacts derivados. Es `Clone` porque un mismo
/// fallo se entrega a todos los checks que esperaban esa derivación.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DerivationError {
    #[error("provider `{provider}` requires artifact `{artifact}`, which is absent")]
    MissingInput { provider: String, artifact: String },
    #[error("provider `{provider}` received malformed input: {message}")]
    Malformed { provider: String, message: String },
    #[error("no provider registered for derived artifact `{0}`")]
    UnknownProvider(String),
    #[error("derivation cycle detected at `{0}`")]
    Cycle(String),
    /// El provider hizo panic; el fallo queda memoizado como cualquier otro.
    #[error("provider `{provider}` {message}")]
    Panicked { provider: String, message: String },
}

impl DerivationError {
    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::Malformed { provider: provider.to_string(),
                          message: message.into() }
    }

    pub fn missing_input(provider: &str, artifact: &str) -> Self {
        Self::MissingInput { provider: provider.to_string(),
                             artifact: artifact.to_string() }
    }
}

/// Texto de un payload de panic capturado con `catch_unwind`.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Motivo por el que un check terminó en `Errored`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CheckError {
    #[error("required artifacts missing: {}", .0.join(", "))]
    MissingArtifact(Vec<String>),
    #[error("derived artifact `{artifact}` could not be computed: {source}")]
    Derivation { artifact: String, source: DerivationError },
    #[error("artifact `{artifact}` has an unexpected shape: {message}")]
    Decode { artifact: String, message: String },
    #[error("check evaluation failed: {0}")]
    Evaluation(String),
}

impl CheckError {
    pub fn derivation(artifact: &str, source: DerivationError) -> Self {
        Self::Derivation { artifact: artifact.to_string(),
                           source }
    }
}

/// Errores al poblar el `ArtifactStore`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("artifact `{0}` is already present in the store")]
    DuplicateArtifact(String),
    #[error("artifact snapshot must be a JSON object keyed by artifact name")]
    NotAnObject,
}

/// Errores al construir registros de checks / providers.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegistryError {
    #[error("check `{0}` is already registered")]
    DuplicateCheck(String),
    #[error("derived artifact provider `{0}` is already registered")]
    DuplicateProvider(String),
}

/// Fallo del agregador al ensamblar el reporte final.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AggregationError {
    #[error("outcome for check `{0}` was recorded twice")]
    DuplicateOutcome(String),
    #[error("check `{0}` was requested but produced no outcome")]
    MissingOutcome(String),
    #[error("outcome for check `{0}` was recorded but never requested")]
    UnexpectedOutcome(String),
}

/// Errores a nivel de corrida.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EvaluationError {
    #[error("requested check `{0}` is not registered")]
    UnknownCheck(String),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}
