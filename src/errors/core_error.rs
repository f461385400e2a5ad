use audit_core::{EvaluationError, RegistryError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Snapshot inválido: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Snapshot inválido: {0}")]
    Store(#[from] StoreError),
    #[error("Registro inválido: {0}")]
    Registry(#[from] RegistryError),
    #[error("Evaluación abortada: {0}")]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_config_variant_format() {
        let err = CoreError::Config("falta el snapshot".into());
        assert_eq!(err.to_string(), "Error de configuración: falta el snapshot");
    }

    #[test]
    fn test_io_variant_from() {
        let io_err = std::io::Error::other("falló IO");
        let err: CoreError = io_err.into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn test_evaluation_variant_from() {
        let err: CoreError = EvaluationError::UnknownCheck("nope".into()).into();
        assert_eq!(err.to_string(), "Evaluación abortada: requested check `nope` is not registered");
    }

    #[test]
    fn test_store_variant_from() {
        let err: CoreError = StoreError::NotAnObject.into();
        assert!(matches!(err, CoreError::Store(_)));
    }
}
