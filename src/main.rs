//! `auditflow <snapshot.json>`: evalúa un snapshot de artifacts y escribe el
//! reporte agregado como JSON en stdout.

use std::path::PathBuf;

use auditflow_rust::config::CONFIG;
use auditflow_rust::errors::CoreError;
use auditflow_rust::{evaluate_store, load_snapshot};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CoreError> {
    let path = std::env::args().nth(1)
                               .map(PathBuf::from)
                               .or_else(|| CONFIG.snapshot.clone())
                               .ok_or_else(|| CoreError::Config("usage: auditflow <snapshot.json> (or set AUDITFLOW_SNAPSHOT)".into()))?;
    let store = load_snapshot(&path)?;
    let run = evaluate_store(store, &CONFIG).await?;
    println!("{}", serde_json::to_string_pretty(&run.report)?);
    if run.report.summary.errored > 0 {
        log::warn!("{} check(s) could not be evaluated", run.report.summary.errored);
    }
    Ok(())
}
