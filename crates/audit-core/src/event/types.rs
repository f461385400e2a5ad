//! Tipos de evento de una corrida de evaluación.
//!
//! Los eventos son diagnóstico: no entran en el reporte ni en ningún digest.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::check::CheckState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`.
    RunStarted { check_count: usize, artifacts_digest: String },
    /// Un check cambió de estado. `reason` sólo se fija al entrar en
    /// `Errored`.
    CheckTransitioned {
        check: String,
        from: CheckState,
        to: CheckState,
        reason: Option<String>,
    },
    /// Cierre de la corrida (el reporte ya fue ensamblado).
    RunCompleted { total: usize, errored: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // orden de append dentro del run
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}

impl RunEvent {
    /// Nombre del check afectado, si el evento es una transición.
    pub fn check(&self) -> Option<&str> {
        match &self.kind {
            RunEventKind::CheckTransitioned { check, .. } => Some(check),
            _ => None,
        }
    }
}
