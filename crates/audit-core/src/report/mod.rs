//! Reporte agregado de una corrida y el agregador que lo ensambla.

mod aggregator;
mod types;

pub use aggregator::ResultAggregator;
pub use types::{AuditEntry, EvaluationReport, ReportSummary};
