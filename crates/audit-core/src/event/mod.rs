//! Registro append-only de transiciones de una corrida.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{RunEvent, RunEventKind};
