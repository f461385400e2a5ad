//! Runner de evaluación.
//!
//! Orquesta una corrida: resuelve los artifacts requeridos por cada check,
//! invoca los que resolvieron, contiene cualquier error (o panic) por check y
//! entrega cada resultado al agregador. Todos los checks avanzan de forma
//! cooperativa sobre una sola tarea (`join_all`), sin hilos: las
//! derivaciones concurrentes de la misma clave colapsan en la cache.

use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, PoisonError};

use futures::future::join_all;
use futures::FutureExt;
use uuid::Uuid;

use super::RunnerBuilder;
use crate::artifact::ArtifactStore;
use crate::check::{Check, CheckDescriptor, CheckState, EvaluationContext, Outcome};
use crate::derive::{Derivations, ProviderRegistry};
use crate::errors::{panic_message, CheckError, EvaluationError};
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::registry::{CheckRegistry, CheckSelection};
use crate::report::{AuditEntry, EvaluationReport, ResultAggregator};

/// Salida de `EvaluationRunner::run`: el reporte y el log de transiciones.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub report: EvaluationReport,
    pub events: Vec<RunEvent>,
}

impl EvaluationRun {
    /// Estados por los que pasó `check`, en orden.
    pub fn states_of(&self, check: &str) -> Vec<CheckState> {
        self.events
            .iter()
            .filter_map(|ev| match &ev.kind {
                RunEventKind::CheckTransitioned { check: c, to, .. } if c == check => Some(*to),
                _ => None,
            })
            .collect()
    }
}

pub struct EvaluationRunner<E: EventStore = InMemoryEventStore> {
    checks: CheckRegistry,
    providers: ProviderRegistry,
    event_store: Mutex<E>,
}

impl EvaluationRunner<InMemoryEventStore> {
    pub fn builder() -> RunnerBuilder<InMemoryEventStore> {
        RunnerBuilder::default()
    }

    pub fn new(checks: CheckRegistry, providers: ProviderRegistry) -> Self {
        Self::with_event_store(checks, providers, InMemoryEventStore::default())
    }
}

impl<E: EventStore + Send> EvaluationRunner<E> {
    pub fn with_event_store(checks: CheckRegistry, providers: ProviderRegistry, event_store: E) -> Self {
        Self { checks,
               providers,
               event_store: Mutex::new(event_store) }
    }

    pub fn checks(&self) -> &CheckRegistry {
        &self.checks
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Eventos registrados para `run_id`.
    pub fn events(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.lock().unwrap_or_else(PoisonError::into_inner).list(run_id)
    }

    /// Evalúa todos los checks registrados.
    pub async fn run_all(&self, store: ArtifactStore) -> Result<EvaluationRun, EvaluationError> {
        self.run(store, &CheckSelection::All).await
    }

    /// Evalúa `selection` contra `store`. El store (y la cache de
    /// derivaciones) se descartan al terminar.
    ///
    /// Sólo falla si la selección nombra un check desconocido (antes de
    /// evaluar nada) o si el agregador no puede ensamblar el reporte.
    pub async fn run(&self, store: ArtifactStore, selection: &CheckSelection) -> Result<EvaluationRun, EvaluationError> {
        let selected = self.checks.select(selection)?;
        let run_id = Uuid::new_v4();
        let digest = store.digest();
        let names: Vec<String> = selected.iter().map(|c| c.meta().name).collect();

        let recorder = RunRecorder { run_id,
                                     events: &self.event_store };
        recorder.append(RunEventKind::RunStarted { check_count: names.len(),
                                                   artifacts_digest: digest.clone() });
        log::info!("run={run_id} start checks={} artifacts={}", names.len(), store.len());

        let mut aggregator = ResultAggregator::new(run_id, digest, names);
        let derivations = Derivations::new(&store, &self.providers);
        let entries = join_all(selected.iter().map(|check| evaluate_check(check.as_ref(), &derivations, &recorder))).await;
        for entry in entries {
            aggregator.add(entry)?;
        }
        let report = aggregator.finish()?;

        let summary = report.summary;
        recorder.append(RunEventKind::RunCompleted { total: summary.total,
                                                     errored: summary.errored });
        log::info!("run={run_id} done passed={} failed={} notApplicable={} errored={} derivations={}",
                   summary.passed,
                   summary.failed,
                   summary.not_applicable,
                   summary.errored,
                   derivations.cache().computations());

        Ok(EvaluationRun { report,
                           events: self.events(run_id) })
    }
}

impl<E: EventStore> std::fmt::Debug for EvaluationRunner<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationRunner")
         .field("checks", &self.checks)
         .field("providers", &self.providers)
         .finish()
    }
}

struct RunRecorder<'r, E> {
    run_id: Uuid,
    events: &'r Mutex<E>,
}

impl<E: EventStore> RunRecorder<'_, E> {
    fn append(&self, kind: RunEventKind) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).append_kind(self.run_id, kind);
    }
}

/// Estado de un check durante la corrida; cada transición queda registrada.
struct CheckTracker<'r, E> {
    name: String,
    state: CheckState,
    recorder: &'r RunRecorder<'r, E>,
}

impl<'r, E: EventStore> CheckTracker<'r, E> {
    fn new(name: &str, recorder: &'r RunRecorder<'r, E>) -> Self {
        Self { name: name.to_string(),
               state: CheckState::Pending,
               recorder }
    }

    fn advance(&mut self, to: CheckState, reason: Option<String>) {
        debug_assert!(self.state.can_transition_to(to), "invalid transition {} -> {}", self.state, to);
        log::debug!("check={} state={}", self.name, to);
        self.recorder.append(RunEventKind::CheckTransitioned { check: self.name.clone(),
                                                               from: self.state,
                                                               to,
                                                               reason });
        self.state = to;
    }

    fn errored(&mut self, descriptor: CheckDescriptor, err: CheckError) -> AuditEntry {
        let reason = err.to_string();
        log::warn!("check={} errored: {reason}", self.name);
        self.advance(CheckState::Errored, Some(reason.clone()));
        AuditEntry::errored(descriptor, reason)
    }
}

async fn evaluate_check<E: EventStore>(check: &dyn Check, derivations: &Derivations<'_>, recorder: &RunRecorder<'_, E>) -> AuditEntry {
    let descriptor = check.meta();
    let mut tracker = CheckTracker::new(&descriptor.name, recorder);

    tracker.advance(CheckState::ResolvingArtifacts, None);
    if let Err(err) = resolve_required(&descriptor, derivations).await {
        return tracker.errored(descriptor, err);
    }

    tracker.advance(CheckState::Running, None);
    let ctx = EvaluationContext::new(&descriptor.name, derivations);
    let evaluated = AssertUnwindSafe(check.evaluate(&ctx)).catch_unwind()
                                                          .await
                                                          .unwrap_or_else(|panic| Err(CheckError::Evaluation(panic_message(panic.as_ref()))));
    match evaluated {
        Ok(result) => {
            tracker.advance(Outcome::from_passed(result.passed).state(), None);
            AuditEntry::evaluated(descriptor, result)
        }
        Err(err) => tracker.errored(descriptor, err),
    }
}

/// Confirma que cada artifact requerido resuelve: presente en el store raw
/// (aunque sea `null`) o derivable con los parámetros por defecto de su
/// provider. Las derivaciones de un check se emiten todas a la vez.
async fn resolve_required(descriptor: &CheckDescriptor, derivations: &Derivations<'_>) -> Result<(), CheckError> {
    let store = derivations.store();
    let mut missing = Vec::new();
    let mut derived = Vec::new();
    for name in &descriptor.required_artifacts {
        if store.contains(name) {
            continue;
        }
        match derivations.providers().get(name) {
            Some(provider) => derived.push((name.as_str(), provider.default_params())),
            None => missing.push(name.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(CheckError::MissingArtifact(missing));
    }

    let resolved = join_all(derived.iter().map(|(name, params)| derivations.request(name, params))).await;
    for ((name, _), outcome) in derived.iter().zip(resolved) {
        outcome.map_err(|e| CheckError::derivation(name, e))?;
    }
    Ok(())
}
