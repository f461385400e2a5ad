//! `no-websql`: la página no abre bases WebSQL.

use async_trait::async_trait;
use audit_core::{Check, CheckDescriptor, CheckError, CheckResult, EvaluationContext};

use crate::artifacts::WebSql;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoWebSql;

#[async_trait]
impl Check for NoWebSql {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("no-websql", "Avoids WebSQL DB").failure("Uses WebSQL DB")
                                                             .help("Web SQL is deprecated. Consider using IndexedDB instead.")
                                                             .requires(&["WebSQL"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        let WebSql(db) = ctx.decode::<WebSql>()?;
        Ok(match db {
            None => CheckResult::pass(),
            Some(db) => CheckResult::fail().with_debug_string(format!("Found database \"{}\", version: {}.", db.name, db.version)),
        })
    }
}
