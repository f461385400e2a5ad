//! Cache de derivaciones de una corrida.
//!
//! Único punto de coordinación para la ejecución at-most-once: cada clave
//! `(nombre, firma de params)` tiene un slot `OnceCell`. El primer
//! solicitante inicializa el slot; el resto espera el mismo resultado (éxito
//! o fallo). El slot se escribe exactamente una vez.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::errors::DerivationError;
use crate::hashing::hash_value;

/// Valor derivado compartido entre todos los solicitantes.
pub type DerivedValue = Arc<Value>;

type Slot = Arc<OnceCell<Result<DerivedValue, DerivationError>>>;

/// Clave estable de una derivación: nombre del provider + hash canónico de
/// sus parámetros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationKey {
    pub name: String,
    pub signature: String,
}

impl DerivationKey {
    pub fn new(name: &str, params: &Value) -> Self {
        Self { name: name.to_string(),
               signature: hash_value(params) }
    }
}

impl fmt::Display for DerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, &self.signature[..12.min(self.signature.len())])
    }
}

#[derive(Debug, Default)]
pub struct DerivationCache {
    slots: DashMap<DerivationKey, Slot>,
    computations: AtomicUsize,
}

impl DerivationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve el valor memoizado para `key` o ejecuta `compute` si nadie lo
    /// ha hecho aún. Solicitudes concurrentes de la misma clave colapsan en
    /// una sola ejecución.
    pub async fn get_or_compute<F, Fut>(&self, key: DerivationKey, compute: F) -> Result<DerivedValue, DerivationError>
        where F: FnOnce() -> Fut,
              Fut: Future<Output = Result<Value, DerivationError>>
    {
        // El guard del DashMap no debe cruzar un await: clonamos el Arc.
        let slot: Slot = self.slots.entry(key.clone()).or_default().clone();
        let computations = &self.computations;
        let key = &key;
        slot.get_or_init(move || async move {
                log::debug!("derivation:start key={key}");
                computations.fetch_add(1, Ordering::SeqCst);
                let out = compute().await.map(Arc::new);
                if let Err(e) = &out {
                    log::warn!("derivation:failed key={key} error={e}");
                }
                out
            })
            .await
            .clone()
    }

    /// Número de derivaciones distintas solicitadas.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Número de veces que se ejecutó realmente un provider.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }
}
