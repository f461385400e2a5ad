use serde::{Deserialize, Serialize};

/// Estado de un check dentro de una corrida.
///
/// Las transiciones válidas son:
/// - `Pending` -> `ResolvingArtifacts`
/// - `ResolvingArtifacts` -> `Running` | `Errored`
/// - `Running` -> `Passed` | `Failed` | `Informational` | `Errored`
///
/// Los estados terminales no tienen salida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckState {
    Pending,
    ResolvingArtifacts,
    Running,
    Passed,
    Failed,
    /// Evaluado, pero la regla no aplica al sujeto.
    Informational,
    Errored,
}

impl CheckState {
    pub fn can_transition_to(self, next: CheckState) -> bool {
        use CheckState::*;
        matches!((self, next),
                 (Pending, ResolvingArtifacts)
                 | (ResolvingArtifacts, Running)
                 | (ResolvingArtifacts, Errored)
                 | (Running, Passed)
                 | (Running, Failed)
                 | (Running, Informational)
                 | (Running, Errored))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CheckState::Passed | CheckState::Failed | CheckState::Informational | CheckState::Errored)
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckState::Pending => "PENDING",
            CheckState::ResolvingArtifacts => "RESOLVING_ARTIFACTS",
            CheckState::Running => "RUNNING",
            CheckState::Passed => "PASSED",
            CheckState::Failed => "FAILED",
            CheckState::Informational => "INFORMATIONAL",
            CheckState::Errored => "ERRORED",
        };
        f.write_str(s)
    }
}

/// Clase de resultado visible en el reporte agregado. `Errored` nunca se
/// colapsa con `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Passed,
    Failed,
    NotApplicable,
    Errored,
}

impl Outcome {
    /// Estado terminal correspondiente.
    pub fn state(self) -> CheckState {
        match self {
            Outcome::Passed => CheckState::Passed,
            Outcome::Failed => CheckState::Failed,
            Outcome::NotApplicable => CheckState::Informational,
            Outcome::Errored => CheckState::Errored,
        }
    }

    pub fn from_passed(passed: Option<bool>) -> Self {
        match passed {
            Some(true) => Outcome::Passed,
            Some(false) => Outcome::Failed,
            None => Outcome::NotApplicable,
        }
    }
}
