//! Macros utilitarias para reducir boilerplate al declarar artifacts tipados.
//!
//! Exportadas en la raíz del crate:
//!   use audit_core::artifact_kind;

/// Implementa `ArtifactKind` para un tipo serde existente.
///
/// Formas soportadas:
/// - `artifact_kind!(WebSqlDatabase => "WebSQL");`
/// - `artifact_kind!(Vec<PasswordInput> as PasswordInputs => "PasswordInputsWithPreventedPaste");`
///   declara un alias `PasswordInputs` para tipos que no son locales.
#[macro_export]
macro_rules! artifact_kind {
    ($ty:ty as $alias:ident => $name:expr) => {
        #[derive(Debug, Clone, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $alias(pub $ty);
        impl $crate::artifact::ArtifactKind for $alias {
            const NAME: &'static str = $name;
        }
    };
    ($ty:ty => $name:expr) => {
        impl $crate::artifact::ArtifactKind for $ty {
            const NAME: &'static str = $name;
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::artifact::ArtifactKind;
    use serde_json::json;

    artifact_kind!(Vec<String> as Names => "Names");

    #[derive(Debug, serde::Deserialize)]
    struct Pair {
        left: u32,
    }
    artifact_kind!(Pair => "Pair");

    #[test]
    fn alias_decodes_transparently() {
        let names = Names::decode(&json!(["a", "b"])).unwrap();
        assert_eq!(names.0, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(<Names as ArtifactKind>::NAME, "Names");
    }

    #[test]
    fn plain_type_gets_name() {
        assert_eq!(Pair::decode(&json!({"left": 7})).unwrap().left, 7);
        assert_eq!(Pair::NAME, "Pair");
    }
}
