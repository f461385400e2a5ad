//! Providers de artifacts derivados: la frontera con la normalización de
//! tráfico y el parseo de manifests.

pub mod manifest_values;
pub mod network_records;

pub use manifest_values::ManifestValuesProvider;
pub use network_records::NetworkRecordsProvider;
