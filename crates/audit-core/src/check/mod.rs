//! Contrato de checks: metadata, resultado normalizado, contexto de
//! evaluación, estados y el filtro de violaciones reutilizable.

pub mod context;
pub mod definition;
pub mod result;
pub mod status;
pub mod violation;

pub use context::EvaluationContext;
pub use definition::{Check, CheckDescriptor};
pub use result::{format_count, CheckResult, Details, Finding, ListItem, TableHeading};
pub use status::{CheckState, Outcome};
pub use violation::{filter_violations, violation_headings, violation_table, DiagnosticMessage, MessagePattern};
