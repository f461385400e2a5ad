//! Artifacts derivados: providers, cache memoizada y el coordinador
//! `Derivations` que vive lo mismo que una corrida.

pub mod cache;
pub mod provider;

pub use cache::{DerivationCache, DerivationKey, DerivedValue};
pub use provider::{DerivationContext, DerivedArtifactProvider, ProviderRegistry};

use std::panic::AssertUnwindSafe;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::artifact::ArtifactStore;
use crate::errors::{panic_message, DerivationError};

/// Coordinador de derivaciones de una corrida: store raw + providers + cache.
///
/// Se descarta junto con el store al terminar la corrida.
pub struct Derivations<'a> {
    store: &'a ArtifactStore,
    providers: &'a ProviderRegistry,
    cache: DerivationCache,
}

impl<'a> Derivations<'a> {
    pub fn new(store: &'a ArtifactStore, providers: &'a ProviderRegistry) -> Self {
        Self { store,
               providers,
               cache: DerivationCache::new() }
    }

    pub fn store(&self) -> &'a ArtifactStore {
        self.store
    }

    pub fn providers(&self) -> &'a ProviderRegistry {
        self.providers
    }

    pub fn cache(&self) -> &DerivationCache {
        &self.cache
    }

    /// Solicita la derivación `(name, params)`; a lo sumo una ejecución por
    /// clave y corrida.
    pub fn request<'s>(&'s self, name: &'s str, params: &'s Value) -> BoxFuture<'s, Result<DerivedValue, DerivationError>> {
        self.request_within(name, params, &[])
    }

    // `chain` son las claves que ya están siendo derivadas en esta cadena de
    // solicitudes; volver a pedir una de ellas sería un ciclo.
    pub(crate) fn request_within<'s>(&'s self,
                                     name: &'s str,
                                     params: &'s Value,
                                     chain: &'s [DerivationKey])
                                     -> BoxFuture<'s, Result<DerivedValue, DerivationError>> {
        async move {
            let provider = self.providers
                               .get(name)
                               .ok_or_else(|| DerivationError::UnknownProvider(name.to_string()))?;
            let key = DerivationKey::new(name, params);
            if chain.contains(&key) {
                return Err(DerivationError::Cycle(key.to_string()));
            }
            let mut next_chain = chain.to_vec();
            next_chain.push(key.clone());

            self.cache
                .get_or_compute(key, move || async move {
                    let ctx = DerivationContext { derivations: self,
                                                  provider: provider.name(),
                                                  chain: next_chain };
                    // Un panic se escribe en el slot como fallo compartido: la
                    // clave no se vuelve a computar.
                    AssertUnwindSafe(provider.compute(&ctx, params)).catch_unwind()
                                                                    .await
                                                                    .unwrap_or_else(|panic| {
                                                                        Err(DerivationError::Panicked { provider: provider.name().to_string(),
                                                                                                        message: panic_message(panic.as_ref()) })
                                                                    })
                })
                .await
        }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Doubler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DerivedArtifactProvider for Doubler {
        fn name(&self) -> &str { "doubled" }
        fn inputs(&self) -> Vec<&'static str> { vec!["Number"] }
        async fn compute(&self, ctx: &DerivationContext<'_>, _params: &Value) -> Result<Value, DerivationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = ctx.input("Number")?
                       .as_i64()
                       .ok_or_else(|| DerivationError::malformed("doubled", "Number is not an integer"))?;
            Ok(json!(n * 2))
        }
    }

    // Depende de `doubled`.
    struct Quadrupler;

    #[async_trait]
    impl DerivedArtifactProvider for Quadrupler {
        fn name(&self) -> &str { "quadrupled" }
        async fn compute(&self, ctx: &DerivationContext<'_>, _params: &Value) -> Result<Value, DerivationError> {
            let doubled = ctx.request("doubled", &Value::Null).await?;
            Ok(json!(doubled.as_i64().unwrap_or_default() * 2))
        }
    }

    struct SelfReferential;

    #[async_trait]
    impl DerivedArtifactProvider for SelfReferential {
        fn name(&self) -> &str { "ouroboros" }
        async fn compute(&self, ctx: &DerivationContext<'_>, params: &Value) -> Result<Value, DerivationError> {
            let inner = ctx.request("ouroboros", params).await?;
            Ok((*inner).clone())
        }
    }

    fn registry(doubler: Arc<Doubler>) -> ProviderRegistry {
        let mut providers = ProviderRegistry::new();
        providers.register(doubler).unwrap();
        providers.register(Arc::new(Quadrupler)).unwrap();
        providers.register(Arc::new(SelfReferential)).unwrap();
        providers
    }

    #[tokio::test]
    async fn nested_derivation_reuses_memoized_value() {
        let doubler = Arc::new(Doubler::default());
        let providers = registry(doubler.clone());
        let store = ArtifactStore::new().with("Number", json!(5)).unwrap();
        let derivations = Derivations::new(&store, &providers);

        let direct = derivations.request("doubled", &Value::Null).await.unwrap();
        let nested = derivations.request("quadrupled", &Value::Null).await.unwrap();
        assert_eq!(*direct, json!(10));
        assert_eq!(*nested, json!(20));
        assert_eq!(doubler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_input_propagates_to_dependents() {
        let providers = registry(Arc::new(Doubler::default()));
        let store = ArtifactStore::new();
        let derivations = Derivations::new(&store, &providers);
        let err = derivations.request("quadrupled", &Value::Null).await.unwrap_err();
        assert_eq!(err, DerivationError::missing_input("doubled", "Number"));
    }

    #[tokio::test]
    async fn unknown_provider_and_cycles_are_errors() {
        let providers = registry(Arc::new(Doubler::default()));
        let store = ArtifactStore::new();
        let derivations = Derivations::new(&store, &providers);
        assert_eq!(derivations.request("nope", &Value::Null).await.unwrap_err(), DerivationError::UnknownProvider("nope".into()));
        assert!(matches!(derivations.request("ouroboros", &Value::Null).await, Err(DerivationError::Cycle(_))));
    }

    #[test]
    fn duplicate_provider_is_rejected() {
        let mut providers = ProviderRegistry::new();
        providers.register(Arc::new(Quadrupler)).unwrap();
        assert!(providers.register(Arc::new(Quadrupler)).is_err());
    }
}
