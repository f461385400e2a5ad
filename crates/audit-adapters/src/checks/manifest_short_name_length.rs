//! `manifest-short-name-length`: el `short_name` del manifest no se trunca
//! en la pantalla de inicio.

use async_trait::async_trait;
use audit_core::{Check, CheckDescriptor, CheckError, CheckResult, EvaluationContext};
use serde_json::Value;

use crate::artifacts::ManifestValues;
use crate::providers::manifest_values::{NO_MANIFEST, SUGGESTED_SHORT_NAME_MAX_LENGTH};

#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestShortNameLength;

#[async_trait]
impl Check for ManifestShortNameLength {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("manifest-short-name-length",
                             "Manifest's `short_name` won't be truncated when displayed on homescreen")
            .failure("Manifest's `short_name` will be truncated when displayed on homescreen")
            .help("Make your app's `short_name` fewer than 12 characters to ensure that it's not truncated on homescreens.")
            .requires(&["Manifest"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        // Sin manifest la regla no aplica al sujeto.
        if ctx.require("Manifest")?.is_null() {
            return Ok(CheckResult::not_applicable().with_debug_string(NO_MANIFEST));
        }

        let values: ManifestValues = ctx.request_as(&Value::Null).await?;
        if values.is_parse_failure {
            let reason = values.parse_failure_reason.unwrap_or_default();
            return Ok(CheckResult::fail().with_debug_string(reason));
        }
        if !values.passing("hasShortName") {
            return Ok(CheckResult::fail().with_debug_string("No short_name found in manifest."));
        }
        let short_enough = values.passing("shortNameLength");
        let result = CheckResult::from_bool(short_enough);
        Ok(if short_enough {
               result
           } else {
               result.with_debug_string(format!("short_name is longer than {SUGGESTED_SHORT_NAME_MAX_LENGTH} characters."))
           })
    }
}
