//! Builder para `EvaluationRunner`.
//!
//! Acumula checks y providers; los nombres duplicados se rechazan en el
//! momento de agregarlos, no al evaluar.
//!
//! ```ignore
//! let runner = EvaluationRunner::builder()
//!     .provider(NetworkRecordsProvider)?
//!     .check(IsOnHttps::default())?
//!     .build();
//! ```

use std::sync::Arc;

use super::EvaluationRunner;
use crate::check::Check;
use crate::derive::{DerivedArtifactProvider, ProviderRegistry};
use crate::errors::RegistryError;
use crate::event::{EventStore, InMemoryEventStore};
use crate::registry::CheckRegistry;

#[derive(Debug, Default)]
pub struct RunnerBuilder<E: EventStore = InMemoryEventStore> {
    checks: CheckRegistry,
    providers: ProviderRegistry,
    event_store: E,
}

impl<E: EventStore + Send> RunnerBuilder<E> {
    pub fn check<C: Check + 'static>(self, check: C) -> Result<Self, RegistryError> {
        self.check_arc(Arc::new(check))
    }

    pub fn check_arc(mut self, check: Arc<dyn Check>) -> Result<Self, RegistryError> {
        self.checks.register(check)?;
        Ok(self)
    }

    pub fn provider<P: DerivedArtifactProvider + 'static>(mut self, provider: P) -> Result<Self, RegistryError> {
        self.providers.register(Arc::new(provider))?;
        Ok(self)
    }

    /// Reemplaza el store de eventos (por defecto en memoria).
    pub fn event_store<E2: EventStore + Send>(self, event_store: E2) -> RunnerBuilder<E2> {
        RunnerBuilder { checks: self.checks,
                        providers: self.providers,
                        event_store }
    }

    pub fn build(self) -> EvaluationRunner<E> {
        EvaluationRunner::with_event_store(self.checks, self.providers, self.event_store)
    }
}
