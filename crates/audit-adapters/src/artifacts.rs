//! Formas tipadas de los artifacts que produce un collector de páginas y de
//! los artifacts derivados por los providers de este crate.
//!
//! El core sólo ve `serde_json::Value`; aquí se declara el nombre estable de
//! cada artifact (`ArtifactKind::NAME`) y su forma serde.

use std::collections::BTreeMap;

use audit_core::artifact_kind;
use audit_core::DiagnosticMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Evento de protocolo tal como lo registra el collector.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolEvent {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

// Logs de protocolo agrupados por nombre de pass.
artifact_kind!(BTreeMap<String, Vec<ProtocolEvent>> as DevtoolsLogs => "devtoolsLogs");

/// Base WebSQL abierta por la página.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebSqlDatabase {
    pub name: String,
    pub version: String,
}

// `null` cuando la página no abrió ninguna base.
artifact_kind!(Option<WebSqlDatabase> as WebSql => "WebSQL");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordInput {
    /// Fragmento HTML del input.
    pub snippet: String,
}

artifact_kind!(Vec<PasswordInput> as PasswordInputs => "PasswordInputsWithPreventedPaste");

/// Entrada de consola: el collector la envuelve en `{ "entry": {...} }`,
/// pero también se acepta plana.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConsoleEntry {
    Wrapped { entry: DiagnosticMessage },
    Flat(DiagnosticMessage),
}

impl ConsoleEntry {
    pub fn message(&self) -> &DiagnosticMessage {
        match self {
            ConsoleEntry::Wrapped { entry } => entry,
            ConsoleEntry::Flat(entry) => entry,
        }
    }
}

artifact_kind!(Vec<ConsoleEntry> as ConsoleMessages => "ChromeConsoleMessages");

impl ConsoleMessages {
    pub fn messages(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.0.iter().map(ConsoleEntry::message)
    }
}

/// Manifest tal como lo entrega el collector (el artifact completo puede ser
/// `null` si la página no declara manifest).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestArtifact {
    /// El collector no pudo obtenerlo o parsearlo.
    Failed { error: String },
    Fetched {
        #[serde(default)]
        raw: String,
        #[serde(default)]
        url: String,
        /// JSON ya parseado; si falta, se parsea `raw`.
        #[serde(default)]
        value: Option<Value>,
    },
}

/// Petición de red normalizada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub request_id: String,
    pub url: String,
    pub scheme: String,
    /// Host; vacío para URLs no jerárquicas (`data:`, `blob:`).
    pub domain: String,
    #[serde(default)]
    pub protocol: Option<String>,
}

impl NetworkRecord {
    pub fn new(request_id: &str, raw_url: &str) -> Self {
        let (scheme, domain) = match url::Url::parse(raw_url) {
            Ok(parsed) => (parsed.scheme().to_string(), parsed.host_str().unwrap_or_default().to_string()),
            Err(_) => (raw_url.split_once(':').map(|(s, _)| s.to_ascii_lowercase()).unwrap_or_default(), String::new()),
        };
        Self { request_id: request_id.to_string(),
               url: raw_url.to_string(),
               scheme,
               domain,
               protocol: None }
    }
}

artifact_kind!(Vec<NetworkRecord> as NetworkRecords => "network-records");

/// Resultado de una verificación individual sobre el manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCheck {
    pub id: String,
    pub passing: bool,
    pub failure_text: String,
}

/// Valores derivados del manifest (`manifest-values`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestValues {
    pub is_parse_failure: bool,
    #[serde(default)]
    pub parse_failure_reason: Option<String>,
    pub all_checks: Vec<ManifestCheck>,
}

artifact_kind!(ManifestValues => "manifest-values");

impl ManifestValues {
    pub fn parse_failure(reason: impl Into<String>) -> Self {
        Self { is_parse_failure: true,
               parse_failure_reason: Some(reason.into()),
               all_checks: Vec::new() }
    }

    /// `passing` de la verificación `id`; `false` si no existe.
    pub fn passing(&self, id: &str) -> bool {
        self.all_checks.iter().any(|c| c.id == id && c.passing)
    }
}
