//! Resultado normalizado de un check y payloads de detalle para renderers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Una ocurrencia concreta que viola la regla de un check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Ubicación de origen (URL del recurso o documento).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Etiqueta corta: por qué / dónde viola la regla.
    pub label: String,
    /// Texto crudo que hizo match (mensaje, snippet, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Finding {
    pub fn new(url: Option<String>, label: impl Into<String>) -> Self {
        Self { url,
               line: None,
               label: label.into(),
               text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Fila de tabla con las claves `url`, `label` (y `text` si existe).
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("url".into(), self.url.clone().map(Value::String).unwrap_or(Value::Null));
        row.insert("label".into(), Value::String(self.label.clone()));
        if let Some(text) = &self.text {
            row.insert("text".into(), Value::String(text.clone()));
        }
        row
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHeading {
    pub key: String,
    pub item_type: String,
    pub text: String,
}

impl TableHeading {
    pub fn new(key: &str, item_type: &str, text: &str) -> Self {
        Self { key: key.to_string(),
               item_type: item_type.to_string(),
               text: text.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub item_type: String,
    pub text: String,
}

/// Payload estructurado para renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Details {
    Table {
        headings: Vec<TableHeading>,
        items: Vec<Map<String, Value>>,
    },
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<String>,
        items: Vec<ListItem>,
    },
}

impl Details {
    pub fn table(headings: Vec<TableHeading>, findings: &[Finding]) -> Self {
        Details::Table { headings,
                         items: findings.iter().map(Finding::to_row).collect() }
    }

    pub fn list(header: Option<&str>, item_type: &str, texts: impl IntoIterator<Item = String>) -> Self {
        Details::List { header: header.map(str::to_string),
                        items: texts.into_iter()
                                    .map(|text| ListItem { item_type: item_type.to_string(),
                                                           text })
                                    .collect() }
    }

    /// Número de filas / ítems.
    pub fn len(&self) -> usize {
        match self {
            Details::Table { items, .. } => items.len(),
            Details::List { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Salida normalizada de una evaluación.
///
/// `passed == None` significa "no aplica" para este sujeto.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_extended_info: Option<Value>,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self { passed: Some(true),
               ..Self::default() }
    }

    pub fn fail() -> Self {
        Self { passed: Some(false),
               ..Self::default() }
    }

    pub fn from_bool(passed: bool) -> Self {
        if passed { Self::pass() } else { Self::fail() }
    }

    pub fn not_applicable() -> Self {
        Self::default()
    }

    /// Convención de checks booleanos: `passed` sii no hay ofensores. Si hay,
    /// la colección completa va en `details` y en `raw_extended_info`.
    pub fn from_offenders(offenders: Vec<Finding>, details: Details) -> Self {
        if offenders.is_empty() {
            return Self::pass();
        }
        let raw = serde_json::to_value(&offenders).unwrap_or(Value::Null);
        Self { passed: Some(false),
               details: Some(details),
               raw_extended_info: Some(raw),
               ..Self::default() }
    }

    pub fn with_display_value(mut self, value: impl Into<String>) -> Self {
        self.display_value = Some(value.into());
        self
    }

    pub fn with_debug_string(mut self, debug: impl Into<String>) -> Self {
        self.debug_string = Some(debug.into());
        self
    }

    pub fn is_applicable(&self) -> bool {
        self.passed.is_some()
    }
}

/// Formatea enteros con separador de miles (`12345` -> `12,345`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
