//! Filtro de violaciones: selecciona mensajes de diagnóstico cuyo texto hace
//! match con un patrón y los convierte en `Finding`s.
//!
//! Es una función reutilizable (composición), no una clase base: cualquier
//! check cuya regla sea "el runtime emitió un aviso que matchea P" la llama
//! directamente.
//!
//! - Sin deduplicación: mensajes idénticos desde la misma ubicación producen
//!   un finding cada uno.
//! - El orden de salida es el orden de recepción.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::{Details, Finding, TableHeading};

/// Un mensaje de diagnóstico capturado para el sujeto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessage {
    /// Origen del mensaje (`violation`, `console-api`, ...), si se conoce.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub text: String,
    /// Ubicación que emitió el mensaje.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub line_number: Option<u32>,
}

impl DiagnosticMessage {
    pub fn new(url: Option<&str>, text: &str) -> Self {
        Self { source: None,
               level: None,
               text: text.to_string(),
               url: url.map(str::to_string),
               line_number: None }
    }
}

/// Patrón de selección: substring literal o expresión regular.
#[derive(Debug, Clone)]
pub enum MessagePattern {
    Substring(String),
    Regex(Regex),
}

impl MessagePattern {
    pub fn substring(s: &str) -> Self {
        MessagePattern::Substring(s.to_string())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(MessagePattern::Regex(Regex::new(pattern)?))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            MessagePattern::Substring(s) => text.contains(s.as_str()),
            MessagePattern::Regex(r) => r.is_match(text),
        }
    }
}

impl From<Regex> for MessagePattern {
    fn from(r: Regex) -> Self {
        MessagePattern::Regex(r)
    }
}

/// Etiqueta humana de la ubicación: `line: N` si se conoce la línea; si no,
/// la primera línea del mensaje.
fn location_label(message: &DiagnosticMessage) -> String {
    match message.line_number {
        Some(line) => format!("line: {line}"),
        None => message.text.lines().next().unwrap_or_default().trim().to_string(),
    }
}

/// Devuelve un `Finding` por cada mensaje cuyo texto matchea `pattern`.
pub fn filter_violations<'m>(messages: impl IntoIterator<Item = &'m DiagnosticMessage>, pattern: &MessagePattern) -> Vec<Finding> {
    messages.into_iter()
            .filter(|m| pattern.is_match(&m.text))
            .map(|m| {
                Finding::new(m.url.clone(), location_label(m)).with_line(m.line_number)
                                                               .with_text(m.text.clone())
            })
            .collect()
}

/// Columnas estándar de una tabla de violaciones.
pub fn violation_headings() -> Vec<TableHeading> {
    vec![TableHeading::new("url", "url", "URL"), TableHeading::new("label", "text", "Location")]
}

/// Tabla de detalles para findings de violación.
pub fn violation_table(findings: &[Finding]) -> Details {
    Details::table(violation_headings(), findings)
}
