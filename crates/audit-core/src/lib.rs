//! audit-core: motor de evaluación de checks sobre un snapshot de artifacts.
//!
//! Flujo: artifacts raw -> (bajo demanda) providers derivados -> `evaluate`
//! de cada check -> resultado normalizado -> reporte agregado.
pub mod artifact;
pub mod check;
pub mod constants;
pub mod derive;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod registry;
pub mod report;

pub use artifact::{ArtifactDecodeError, ArtifactKind, ArtifactStore};
pub use check::{filter_violations, Check, CheckDescriptor, CheckResult, CheckState, Details, DiagnosticMessage, EvaluationContext, Finding,
                MessagePattern, Outcome};
pub use derive::{DerivationContext, DerivationKey, Derivations, DerivedArtifactProvider, ProviderRegistry};
pub use engine::{EvaluationRun, EvaluationRunner, RunnerBuilder};
pub use errors::{AggregationError, CheckError, DerivationError, EvaluationError, RegistryError, StoreError};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use registry::{CheckRegistry, CheckSelection};
pub use report::{AuditEntry, EvaluationReport, ReportSummary, ResultAggregator};
