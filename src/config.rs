//! Configuración de la evaluación desde variables de entorno (.env
//! opcional).
//!
//! - `AUDITFLOW_ONLY_CHECKS`: lista separada por comas de checks a evaluar.
//! - `AUDITFLOW_SNAPSHOT`: ruta del snapshot JSON de artifacts.
//! - `AUDITFLOW_PASS`: pass cuyo log alimenta `network-records`.

use std::env;
use std::path::PathBuf;

use audit_core::constants::DEFAULT_PASS;
use audit_core::CheckSelection;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Configuración global, evaluada una sola vez.
pub static CONFIG: Lazy<EvalConfig> = Lazy::new(EvalConfig::from_env);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Vacío = todos los checks registrados.
    pub only_checks: Vec<String>,
    pub snapshot: Option<PathBuf>,
    pub pass: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { only_checks: Vec::new(),
               snapshot: None,
               pass: DEFAULT_PASS.to_string() }
    }
}

impl EvalConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let only_checks = env::var("AUDITFLOW_ONLY_CHECKS").map(|v| parse_check_list(&v)).unwrap_or_default();
        let snapshot = env::var("AUDITFLOW_SNAPSHOT").ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let pass = env::var("AUDITFLOW_PASS").ok()
                                             .map(|v| v.trim().to_string())
                                             .filter(|v| !v.is_empty())
                                             .unwrap_or_else(|| DEFAULT_PASS.to_string());
        Self { only_checks,
               snapshot,
               pass }
    }

    pub fn selection(&self) -> CheckSelection {
        if self.only_checks.is_empty() {
            CheckSelection::All
        } else {
            CheckSelection::Only(self.only_checks.clone())
        }
    }
}

/// `"a, b,,c"` -> `["a", "b", "c"]`.
pub fn parse_check_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
