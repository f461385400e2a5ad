//! Contrato de los proveedores de artifacts derivados.
//!
//! Un provider es una función pura y asíncrona `compute(raw, params)`
//! registrada bajo un nombre estable. No escribe en el `ArtifactStore`: su
//! resultado vive sólo en la `DerivationCache` de la corrida.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use super::Derivations;
use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::errors::{DerivationError, RegistryError};

#[async_trait]
pub trait DerivedArtifactProvider: Send + Sync {
    /// Nombre estable bajo el que se solicita la derivación.
    fn name(&self) -> &str;

    /// Artifacts que el provider lee; el collector los recolecta en su lugar.
    fn inputs(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Parámetros usados cuando un check declara la derivación como
    /// requerida sin parametrizarla.
    fn default_params(&self) -> Value {
        Value::Null
    }

    async fn compute(&self, ctx: &DerivationContext<'_>, params: &Value) -> Result<Value, DerivationError>;
}

/// Vista que recibe un provider: artifacts raw + acceso a otras
/// derivaciones (memoizadas igual que las de los checks).
pub struct DerivationContext<'a> {
    pub(crate) derivations: &'a Derivations<'a>,
    pub(crate) provider: &'a str,
    pub(crate) chain: Vec<super::DerivationKey>,
}

impl<'a> DerivationContext<'a> {
    pub fn store(&self) -> &'a ArtifactStore {
        self.derivations.store()
    }

    /// Artifact raw requerido por el provider.
    pub fn input(&self, name: &str) -> Result<&'a Value, DerivationError> {
        self.store().get(name).ok_or_else(|| DerivationError::missing_input(self.provider, name))
    }

    /// Decodifica un artifact raw requerido; una forma inesperada es
    /// `Malformed`.
    pub fn decode_input<T: ArtifactKind>(&self) -> Result<T, DerivationError> {
        let value = self.input(T::NAME)?;
        T::decode(value).map_err(|e| DerivationError::malformed(self.provider, e.to_string()))
    }

    /// Solicita otra derivación desde dentro de un provider.
    pub async fn request(&self, name: &str, params: &Value) -> Result<Arc<Value>, DerivationError> {
        self.derivations.request_within(name, params, &self.chain).await
    }
}

/// Registro nombre -> provider.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: IndexMap<String, Arc<dyn DerivedArtifactProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn DerivedArtifactProvider>) -> Result<(), RegistryError> {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            return Err(RegistryError::DuplicateProvider(name));
        }
        self.providers.insert(name, provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DerivedArtifactProvider>> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry").field("providers", &self.providers.keys().collect::<Vec<_>>()).finish()
    }
}
