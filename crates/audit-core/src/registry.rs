//! Registro de checks: nombre -> implementación.
//!
//! Los checks se agregan registrando una implementación nueva del trait
//! `Check`; el orden de registro es el orden del reporte.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::check::{Check, CheckDescriptor};
use crate::derive::ProviderRegistry;
use crate::errors::{EvaluationError, RegistryError};

/// Subconjunto de checks a evaluar en una corrida.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl CheckSelection {
    pub fn only<I, S>(names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        CheckSelection::Only(names.into_iter().map(Into::into).collect())
    }
}

#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: IndexMap<String, Arc<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<(), RegistryError> {
        let name = check.meta().name;
        if self.checks.contains_key(&name) {
            return Err(RegistryError::DuplicateCheck(name));
        }
        self.checks.insert(name, check);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Check>> {
        self.checks.get(name)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> Vec<CheckDescriptor> {
        self.checks.values().map(|c| c.meta()).collect()
    }

    /// Resuelve una selección a checks concretos, en orden de registro y sin
    /// repetidos. Un nombre desconocido es un error antes de evaluar nada.
    pub fn select(&self, selection: &CheckSelection) -> Result<Vec<Arc<dyn Check>>, EvaluationError> {
        match selection {
            CheckSelection::All => Ok(self.checks.values().cloned().collect()),
            CheckSelection::Only(names) => {
                if let Some(unknown) = names.iter().find(|n| !self.checks.contains_key(n.as_str())) {
                    return Err(EvaluationError::UnknownCheck(unknown.clone()));
                }
                Ok(self.checks
                       .iter()
                       .filter(|(name, _)| names.iter().any(|n| n == *name))
                       .map(|(_, check)| check.clone())
                       .collect())
            }
        }
    }

    /// Artifacts raw que un collector debe recolectar para estos checks: los
    /// requeridos que ningún provider deriva, más los `inputs()` de cada
    /// provider alcanzado (transitivamente).
    pub fn required_raw_artifacts(&self, providers: &ProviderRegistry) -> BTreeSet<String> {
        let mut pending: Vec<String> = self.checks.values().flat_map(|c| c.meta().required_artifacts).collect();
        let mut visited = BTreeSet::new();
        let mut raw = BTreeSet::new();
        while let Some(name) = pending.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            match providers.get(&name) {
                Some(provider) => pending.extend(provider.inputs().into_iter().map(str::to_string)),
                None => {
                    raw.insert(name);
                }
            }
        }
        raw
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry").field("checks", &self.checks.keys().collect::<Vec<_>>()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckResult, EvaluationContext};
    use crate::errors::CheckError;
    use async_trait::async_trait;

    struct Named(&'static str, &'static [&'static str]);

    #[async_trait]
    impl Check for Named {
        fn meta(&self) -> CheckDescriptor {
            CheckDescriptor::new(self.0, "named").requires(self.1)
        }
        async fn evaluate(&self, _ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
            Ok(CheckResult::pass())
        }
    }

    fn registry() -> CheckRegistry {
        let mut reg = CheckRegistry::new();
        reg.register(Arc::new(Named("a", &["WebSQL"]))).unwrap();
        reg.register(Arc::new(Named("b", &["devtoolsLogs", "network-records"]))).unwrap();
        reg.register(Arc::new(Named("c", &["WebSQL"]))).unwrap();
        reg
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = registry();
        assert_eq!(reg.register(Arc::new(Named("a", &[]))), Err(RegistryError::DuplicateCheck("a".into())));
    }

    #[test]
    fn selection_keeps_registration_order() {
        let reg = registry();
        let picked = reg.select(&CheckSelection::only(["c", "a", "c"])).unwrap();
        let names: Vec<_> = picked.iter().map(|c| c.meta().name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(reg.select(&CheckSelection::All).unwrap().len(), 3);
    }

    #[test]
    fn unknown_check_in_selection_is_an_error() {
        let reg = registry();
        assert_eq!(reg.select(&CheckSelection::only(["zzz"])).err(), Some(EvaluationError::UnknownCheck("zzz".into())));
    }

    #[test]
    fn raw_requirements_exclude_derivable_names() {
        use crate::derive::{DerivationContext, DerivedArtifactProvider};
        use crate::errors::DerivationError;
        use serde_json::Value;

        struct Records;
        #[async_trait]
        impl DerivedArtifactProvider for Records {
            fn name(&self) -> &str { "network-records" }
            fn inputs(&self) -> Vec<&'static str> { vec!["devtoolsLogs"] }
            async fn compute(&self, _ctx: &DerivationContext<'_>, _p: &Value) -> Result<Value, DerivationError> {
                Ok(Value::Null)
            }
        }
        let mut providers = ProviderRegistry::new();
        providers.register(Arc::new(Records)).unwrap();
        let raw: Vec<_> = registry().required_raw_artifacts(&providers).into_iter().collect();
        assert_eq!(raw, vec!["WebSQL".to_string(), "devtoolsLogs".to_string()]);
    }

    #[test]
    fn raw_requirements_follow_provider_inputs() {
        use crate::derive::{DerivationContext, DerivedArtifactProvider};
        use crate::errors::DerivationError;
        use serde_json::Value;

        struct Values;
        #[async_trait]
        impl DerivedArtifactProvider for Values {
            fn name(&self) -> &str { "manifest-values" }
            fn inputs(&self) -> Vec<&'static str> { vec!["Manifest"] }
            async fn compute(&self, _ctx: &DerivationContext<'_>, _p: &Value) -> Result<Value, DerivationError> {
                Ok(Value::Null)
            }
        }
        let mut providers = ProviderRegistry::new();
        providers.register(Arc::new(Values)).unwrap();
        let mut reg = CheckRegistry::new();
        reg.register(Arc::new(Named("uses-values", &["manifest-values"]))).unwrap();
        let raw: Vec<_> = reg.required_raw_artifacts(&providers).into_iter().collect();
        assert_eq!(raw, vec!["Manifest".to_string()]);
    }
}
