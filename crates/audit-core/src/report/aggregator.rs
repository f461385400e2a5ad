//! Ensambla los resultados individuales en el `EvaluationReport`.
//!
//! Es el único componente cuyo fallo aborta una corrida: un check pedido que
//! no entregó resultado, o uno entregado dos veces, hacen imposible un
//! reporte con cada check exactamente una vez.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use super::{AuditEntry, EvaluationReport, ReportSummary};
use crate::constants::REPORT_FORMAT_VERSION;
use crate::errors::AggregationError;

#[derive(Debug)]
pub struct ResultAggregator {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    artifacts_digest: String,
    expected: Vec<String>,
    entries: IndexMap<String, AuditEntry>,
}

impl ResultAggregator {
    /// `expected` son los checks seleccionados, en el orden del reporte.
    pub fn new(run_id: Uuid, artifacts_digest: String, expected: Vec<String>) -> Self {
        Self { run_id,
               started_at: Utc::now(),
               artifacts_digest,
               expected,
               entries: IndexMap::new() }
    }

    pub fn add(&mut self, entry: AuditEntry) -> Result<(), AggregationError> {
        let name = entry.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(AggregationError::DuplicateOutcome(name));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn finish(mut self) -> Result<EvaluationReport, AggregationError> {
        let mut audits = IndexMap::with_capacity(self.expected.len());
        let mut summary = ReportSummary::default();
        for name in &self.expected {
            let entry = self.entries
                            .shift_remove(name)
                            .ok_or_else(|| AggregationError::MissingOutcome(name.clone()))?;
            summary.record(entry.outcome);
            audits.insert(name.clone(), entry);
        }
        if let Some(extra) = self.entries.keys().next() {
            return Err(AggregationError::UnexpectedOutcome(extra.clone()));
        }
        Ok(EvaluationReport { run_id: self.run_id,
                              format_version: REPORT_FORMAT_VERSION.to_string(),
                              started_at: self.started_at,
                              finished_at: Utc::now(),
                              artifacts_digest: self.artifacts_digest,
                              audits,
                              summary })
    }
}
