//! Store de artifacts raw de una corrida.
//!
//! Se puebla una sola vez (por el collector) antes de evaluar y luego se
//! entrega al runner por valor; a partir de ahí sólo se expone por `&`, de
//! modo que ningún check puede mutar un valor almacenado.
//!
//! Un artifact presente con valor `null` es distinto de uno ausente: `null`
//! es evidencia válida (p. ej. "no se abrió ninguna base WebSQL").

use indexmap::IndexMap;
use serde_json::Value;

use super::typed::{ArtifactDecodeError, ArtifactKind};
use crate::errors::StoreError;
use crate::hashing::hash_value;

#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    raw: IndexMap<String, Value>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye el store a partir de un snapshot JSON `{ nombre: valor }`.
    pub fn from_snapshot(snapshot: Value) -> Result<Self, StoreError> {
        match snapshot {
            Value::Object(map) => Ok(Self { raw: map.into_iter().collect() }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Inserta un artifact raw. Los nombres son únicos dentro de la corrida.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Result<(), StoreError> {
        let name = name.into();
        if self.raw.contains_key(&name) {
            return Err(StoreError::DuplicateArtifact(name));
        }
        self.raw.insert(name, value);
        Ok(())
    }

    /// Variante encadenable de `insert` (útil en tests y collectors simples).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Result<Self, StoreError> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.raw.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decodifica el artifact `T::NAME`. `Ok(None)` si está ausente.
    pub fn decode<T: ArtifactKind>(&self) -> Result<Option<T>, ArtifactDecodeError> {
        self.raw.get(T::NAME).map(T::decode).transpose()
    }

    /// Digest estable del snapshot completo (independiente del orden de
    /// inserción).
    pub fn digest(&self) -> String {
        let as_object: serde_json::Map<String, Value> = self.raw.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        hash_value(&Value::Object(as_object))
    }
}
