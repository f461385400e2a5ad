//! `notification-on-start`: la página no pide permiso de notificaciones al
//! cargar (sin gesto del usuario).

use async_trait::async_trait;
use audit_core::check::violation_table;
use audit_core::{filter_violations, Check, CheckDescriptor, CheckError, CheckResult, EvaluationContext, MessagePattern};
use once_cell::sync::Lazy;

use crate::artifacts::ConsoleMessages;

static NOTIFICATION_PERMISSION: Lazy<Result<MessagePattern, regex::Error>> = Lazy::new(|| MessagePattern::regex("notification permission"));

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationOnStart;

#[async_trait]
impl Check for NotificationOnStart {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("notification-on-start", "Avoids requesting the notification permission on page load")
            .failure("Requests the notification permission on page load")
            .help("Users are mistrustful of or confused by sites that request to send notifications without context. \
                   Consider tying the request to user gestures instead.")
            .requires(&["ChromeConsoleMessages"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        let pattern = NOTIFICATION_PERMISSION.as_ref().map_err(|e| CheckError::Evaluation(e.to_string()))?;
        let console: ConsoleMessages = ctx.decode()?;
        // Sólo avisos del runtime con ubicación conocida.
        let violations = console.messages()
                                .filter(|m| m.url.is_some())
                                .filter(|m| m.source.as_deref().map_or(true, |s| s == "violation"));
        let findings = filter_violations(violations, pattern);
        let details = violation_table(&findings);
        Ok(CheckResult::from_offenders(findings, details))
    }
}
