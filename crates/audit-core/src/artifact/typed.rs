//! Vista tipada opcional de un artifact, manteniendo el store agnóstico
//! (`serde_json::Value`). El core no interpreta la semántica de los
//! artifacts; cada check decodifica sólo lo que necesita.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::CheckError;

/// Errores posibles al decodificar un artifact tipado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactDecodeError {
    Deserialize { artifact: String, message: String },
    Validation { artifact: String, message: String },
}

impl ArtifactDecodeError {
    pub fn artifact(&self) -> &str {
        match self {
            Self::Deserialize { artifact, .. } | Self::Validation { artifact, .. } => artifact,
        }
    }
}

impl std::fmt::Display for ArtifactDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deserialize { artifact, message } => write!(f, "{artifact}: {message}"),
            Self::Validation { artifact, message } => write!(f, "{artifact}: invalid ({message})"),
        }
    }
}

impl From<ArtifactDecodeError> for CheckError {
    fn from(err: ArtifactDecodeError) -> Self {
        match err {
            ArtifactDecodeError::Deserialize { artifact, message } | ArtifactDecodeError::Validation { artifact, message } => {
                CheckError::Decode { artifact, message }
            }
        }
    }
}

/// Especificación de un artifact tipado: nombre estable en el store y forma
/// serde del valor.
pub trait ArtifactKind: Sized + DeserializeOwned {
    /// Nombre bajo el cual el collector (o el provider) publica el artifact.
    const NAME: &'static str;

    /// Validación semántica ligera (sin efectos secundarios). Opcional.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Decodifica desde el valor neutro aplicando `validate`.
    fn decode(value: &Value) -> Result<Self, ArtifactDecodeError> {
        let decoded: Self = serde_json::from_value(value.clone()).map_err(|e| ArtifactDecodeError::Deserialize { artifact: Self::NAME.to_string(),
                                                                                                                     message: e.to_string() })?;
        decoded.validate()
               .map_err(|message| ArtifactDecodeError::Validation { artifact: Self::NAME.to_string(),
                                                                     message })?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Counter {
        count: i64,
    }

    impl ArtifactKind for Counter {
        const NAME: &'static str = "Counter";
        fn validate(&self) -> Result<(), String> {
            if self.count < 0 { Err("negative count".into()) } else { Ok(()) }
        }
    }

    #[test]
    fn decode_runs_validation() {
        assert_eq!(Counter::decode(&json!({"count": 3})).unwrap().count, 3);
        let err = Counter::decode(&json!({"count": -1})).unwrap_err();
        assert!(matches!(err, ArtifactDecodeError::Validation { .. }));
        assert_eq!(err.artifact(), "Counter");
    }

    #[test]
    fn decode_error_maps_to_check_error() {
        let err: CheckError = Counter::decode(&json!("nope")).unwrap_err().into();
        assert!(matches!(err, CheckError::Decode { ref artifact, .. } if artifact == "Counter"));
    }
}
