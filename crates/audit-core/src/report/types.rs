use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::check::{CheckDescriptor, CheckResult, Outcome};

/// Resultado de un check dentro del reporte: metadata + clase de resultado
/// + resultado normalizado (o motivo del error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub descriptor: CheckDescriptor,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    pub fn evaluated(descriptor: CheckDescriptor, result: CheckResult) -> Self {
        Self { descriptor,
               outcome: Outcome::from_passed(result.passed),
               result: Some(result),
               error: None }
    }

    pub fn errored(descriptor: CheckDescriptor, reason: impl Into<String>) -> Self {
        Self { descriptor,
               outcome: Outcome::Errored,
               result: None,
               error: Some(reason.into()) }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    pub errored: usize,
}

impl ReportSummary {
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::NotApplicable => self.not_applicable += 1,
            Outcome::Errored => self.errored += 1,
        }
    }
}

/// Único artefacto entregado a los renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub run_id: Uuid,
    pub format_version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Digest del snapshot de artifacts raw evaluado.
    pub artifacts_digest: String,
    pub audits: IndexMap<String, AuditEntry>,
    pub summary: ReportSummary,
}

impl EvaluationReport {
    pub fn get(&self, name: &str) -> Option<&AuditEntry> {
        self.audits.get(name)
    }

    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.get(name).map(|e| e.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &AuditEntry> {
        self.audits.values().filter(|e| e.outcome == Outcome::Failed)
    }

    pub fn errored(&self) -> impl Iterator<Item = &AuditEntry> {
        self.audits.values().filter(|e| e.outcome == Outcome::Errored)
    }
}
