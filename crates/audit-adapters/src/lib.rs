//! audit-adapters: capa de dominio (páginas web) sobre `audit-core`.
//!
//! Este crate provee:
//! - Formas tipadas de los artifacts raw que entrega un collector de páginas.
//! - Providers derivados: `network-records` y `manifest-values`.
//! - Los checks incluidos y su registro por defecto.

pub mod artifacts;
pub mod checks;
pub mod providers;

use audit_core::{EventStore, RegistryError, RunnerBuilder};

use checks::{IsOnHttps, ManifestShortNameLength, NoWebSql, NotificationOnStart, PasswordInputsCanBePastedInto};
use providers::{ManifestValuesProvider, NetworkRecordsProvider};

/// Registra providers y checks incluidos. `pass` es el pass de recolección
/// cuyo log alimenta `network-records`.
pub fn register_bundled<E: EventStore + Send>(builder: RunnerBuilder<E>, pass: &str) -> Result<RunnerBuilder<E>, RegistryError> {
    builder.provider(NetworkRecordsProvider::for_pass(pass))?
           .provider(ManifestValuesProvider)?
           .check(IsOnHttps::for_pass(pass))?
           .check(NoWebSql)?
           .check(PasswordInputsCanBePastedInto)?
           .check(NotificationOnStart)?
           .check(ManifestShortNameLength)
}
