use std::sync::Arc;

use serde_json::Value;

use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::derive::Derivations;
use crate::errors::CheckError;

/// Contexto de evaluación entregado a `Check::evaluate`.
///
/// Se pasa explícitamente a cada check; no hay estado global.
pub struct EvaluationContext<'a> {
    check: &'a str,
    derivations: &'a Derivations<'a>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(check: &'a str, derivations: &'a Derivations<'a>) -> Self {
        Self { check, derivations }
    }

    /// Nombre del check que se está evaluando.
    pub fn check(&self) -> &str {
        self.check
    }

    pub fn store(&self) -> &'a ArtifactStore {
        self.derivations.store()
    }

    /// Búsqueda opcional: `None` si el artifact no existe.
    pub fn artifact(&self, name: &str) -> Option<&'a Value> {
        self.store().get(name)
    }

    /// Artifact raw requerido.
    pub fn require(&self, name: &str) -> Result<&'a Value, CheckError> {
        self.artifact(name).ok_or_else(|| CheckError::MissingArtifact(vec![name.to_string()]))
    }

    /// Decodifica un artifact raw requerido.
    pub fn decode<T: ArtifactKind>(&self) -> Result<T, CheckError> {
        Ok(T::decode(self.require(T::NAME)?)?)
    }

    /// Decodifica un artifact raw opcional.
    pub fn decode_optional<T: ArtifactKind>(&self) -> Result<Option<T>, CheckError> {
        Ok(self.store().decode::<T>()?)
    }

    /// Solicita un artifact derivado (memoizado por corrida).
    pub async fn request(&self, name: &str, params: &Value) -> Result<Arc<Value>, CheckError> {
        self.derivations
            .request(name, params)
            .await
            .map_err(|e| CheckError::derivation(name, e))
    }

    /// Solicita y decodifica un artifact derivado cuyo `NAME` es el nombre
    /// del provider.
    pub async fn request_as<T: ArtifactKind>(&self, params: &Value) -> Result<T, CheckError> {
        let value = self.request(T::NAME, params).await?;
        Ok(T::decode(&value)?)
    }
}
