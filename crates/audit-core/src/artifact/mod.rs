//! Artifacts: evidencia nombrada sobre el sujeto inspeccionado.
//!
//! - `ArtifactStore`: artifacts *raw* tal como los entregó el collector,
//!   inmutables durante la corrida.
//! - `ArtifactKind`: vista tipada (serde) de un artifact raw o derivado.

pub mod macros;
pub mod store;
pub mod typed;

pub use store::ArtifactStore;
pub use typed::{ArtifactDecodeError, ArtifactKind};
