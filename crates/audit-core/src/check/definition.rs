use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CheckResult, EvaluationContext};
use crate::errors::CheckError;

/// Metadata inmutable de un check. Se usa para documentación, reporte y
/// validación previa (artifacts requeridos).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDescriptor {
    /// Identificador estable y único dentro del registro.
    pub name: String,
    /// Título corto cuando el check pasa.
    pub description: String,
    /// Título corto cuando falla (si difiere).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_description: Option<String>,
    pub help_text: String,
    /// Artifacts (raw o derivados) que deben resolverse antes de evaluar.
    pub required_artifacts: Vec<String>,
}

impl CheckDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self { name: name.to_string(),
               description: description.to_string(),
               failure_description: None,
               help_text: String::new(),
               required_artifacts: Vec::new() }
    }

    pub fn failure(mut self, failure_description: &str) -> Self {
        self.failure_description = Some(failure_description.to_string());
        self
    }

    pub fn help(mut self, help_text: &str) -> Self {
        self.help_text = help_text.to_string();
        self
    }

    pub fn requires(mut self, artifacts: &[&str]) -> Self {
        self.required_artifacts = artifacts.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Contrato de un check (audit).
///
/// `meta` es pura y no necesita store. `evaluate` sólo se invoca cuando todos
/// los `required_artifacts` resolvieron; debe usar únicamente esos artifacts
/// para decidir `passed`. Las búsquedas opcionales adicionales deben pasar
/// por `EvaluationContext::artifact` (devuelve `None`, nunca falla).
#[async_trait]
pub trait Check: Send + Sync {
    fn meta(&self) -> CheckDescriptor;

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError>;
}
