//! `manifest-values`: verificaciones estructurales sobre el manifest de la
//! aplicación web.
//!
//! Un manifest ausente o inválido no es un error de derivación: es un estado
//! legítimo del sujeto y se reporta como `isParseFailure`. Sólo un artifact
//! con forma inesperada (ni `null` ni objeto) es `Malformed`.

use async_trait::async_trait;
use audit_core::{ArtifactKind, DerivationContext, DerivationError, DerivedArtifactProvider};
use serde_json::Value;

use crate::artifacts::{ManifestArtifact, ManifestCheck, ManifestValues};

pub const NAME: &str = ManifestValues::NAME;

/// Largo máximo de `short_name` sin truncarse en la pantalla de inicio.
pub const SUGGESTED_SHORT_NAME_MAX_LENGTH: usize = 12;

const PWA_DISPLAY_VALUES: [&str; 3] = ["minimal-ui", "fullscreen", "standalone"];

pub const NO_MANIFEST: &str = "No manifest was fetched.";

#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestValuesProvider;

fn non_empty_str<'v>(manifest: &'v Value, key: &str) -> Option<&'v str> {
    manifest.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

fn check(id: &str, passing: bool, failure_text: &str) -> ManifestCheck {
    ManifestCheck { id: id.to_string(),
                    passing,
                    failure_text: failure_text.to_string() }
}

/// Evalúa las verificaciones sobre un manifest ya parseado.
pub fn evaluate_manifest(manifest: &Value) -> ManifestValues {
    if !manifest.is_object() {
        return ManifestValues::parse_failure("ERROR: manifest is not a JSON object.");
    }
    let short_name = non_empty_str(manifest, "short_name");
    let short_enough = short_name.is_some_and(|s| s.chars().count() <= SUGGESTED_SHORT_NAME_MAX_LENGTH);
    let has_icons = manifest.get("icons").and_then(Value::as_array).is_some_and(|icons| !icons.is_empty());
    let display_ok = manifest.get("display")
                             .and_then(Value::as_str)
                             .is_some_and(|d| PWA_DISPLAY_VALUES.contains(&d.trim()));

    let all_checks = vec![check("hasManifest", true, "Manifest is not valid"),
                          check("hasStartUrl", non_empty_str(manifest, "start_url").is_some(), "Manifest does not have `start_url`"),
                          check("hasName", non_empty_str(manifest, "name").is_some(), "Manifest does not have `name`"),
                          check("hasShortName", short_name.is_some(), "Manifest does not have `short_name`"),
                          check("shortNameLength",
                                short_enough,
                                "Manifest `short_name` will be truncated when displayed on the homescreen"),
                          check("hasIcons", has_icons, "Manifest does not have icons"),
                          check("hasPWADisplayValue",
                                display_ok,
                                "Manifest's `display` value is not one of: minimal-ui | fullscreen | standalone")];
    ManifestValues { is_parse_failure: false,
                     parse_failure_reason: None,
                     all_checks }
}

/// Valores derivados a partir del artifact raw `Manifest`.
pub fn manifest_values(raw: &Value) -> Result<ManifestValues, DerivationError> {
    if raw.is_null() {
        return Ok(ManifestValues::parse_failure(NO_MANIFEST));
    }
    let artifact = match serde_json::from_value::<ManifestArtifact>(raw.clone()) {
        Ok(artifact) => artifact,
        Err(e) if raw.is_object() => return Ok(ManifestValues::parse_failure(format!("ERROR: unrecognized manifest artifact: {e}"))),
        Err(e) => return Err(DerivationError::malformed(NAME, format!("Manifest: {e}"))),
    };
    match artifact {
        ManifestArtifact::Failed { error } => Ok(ManifestValues::parse_failure(error)),
        ManifestArtifact::Fetched { value: Some(value), .. } => Ok(evaluate_manifest(&value)),
        ManifestArtifact::Fetched { raw, url, value: None } => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(evaluate_manifest(&value)),
            Err(e) => {
                log::debug!("manifest at {url} is not valid JSON: {e}");
                Ok(ManifestValues::parse_failure(format!("ERROR: file isn't valid JSON: {e}")))
            }
        },
    }
}

#[async_trait]
impl DerivedArtifactProvider for ManifestValuesProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn inputs(&self) -> Vec<&'static str> {
        vec!["Manifest"]
    }

    async fn compute(&self, ctx: &DerivationContext<'_>, _params: &Value) -> Result<Value, DerivationError> {
        let values = manifest_values(ctx.input("Manifest")?)?;
        serde_json::to_value(values).map_err(|e| DerivationError::malformed(NAME, e.to_string()))
    }
}
