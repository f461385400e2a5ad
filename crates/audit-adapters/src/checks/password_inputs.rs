//! `password-inputs-can-be-pasted-into`: ningún campo de contraseña bloquea
//! el pegado.

use async_trait::async_trait;
use audit_core::{Check, CheckDescriptor, CheckError, CheckResult, Details, EvaluationContext, Finding};

use crate::artifacts::PasswordInputs;

#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordInputsCanBePastedInto;

#[async_trait]
impl Check for PasswordInputsCanBePastedInto {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("password-inputs-can-be-pasted-into", "Allows users to paste into password fields")
            .failure("Prevents users from pasting into password fields")
            .help("Preventing password pasting undermines good security policy.")
            .requires(&["PasswordInputsWithPreventedPaste"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        let PasswordInputs(inputs) = ctx.decode::<PasswordInputs>()?;
        let details = Details::list(Some("Password inputs that prevent pasting into"),
                                    "text",
                                    inputs.iter().map(|i| i.snippet.clone()));
        let offenders = inputs.into_iter()
                              .map(|i| Finding::new(None, "prevents paste").with_text(i.snippet))
                              .collect();
        Ok(CheckResult::from_offenders(offenders, details))
    }
}
