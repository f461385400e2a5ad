//! `is-on-https`: toda petición de la página usa un transporte seguro.

use async_trait::async_trait;
use audit_core::check::format_count;
use audit_core::constants::DEFAULT_PASS;
use audit_core::{Check, CheckDescriptor, CheckError, CheckResult, Details, EvaluationContext, Finding};

use crate::artifacts::{NetworkRecord, NetworkRecords};
use crate::providers::NetworkRecordsProvider;

const SECURE_SCHEMES: [&str; 6] = ["data", "https", "wss", "blob", "chrome", "chrome-extension"];
const SECURE_DOMAINS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Largo visible de una data URI en los detalles.
const DATA_URI_VISIBLE_CHARS: usize = 32;

pub fn is_secure_record(record: &NetworkRecord) -> bool {
    SECURE_SCHEMES.contains(&record.scheme.as_str())
    || record.protocol.as_deref().is_some_and(|p| SECURE_SCHEMES.contains(&p))
    || SECURE_DOMAINS.contains(&record.domain.as_str())
}

/// Acorta data URIs largas: `data:image/png;base64,iVBO…`.
pub fn elide_data_uri(url: &str) -> String {
    if !url.starts_with("data:") || url.chars().count() <= DATA_URI_VISIBLE_CHARS {
        return url.to_string();
    }
    let mut out: String = url.chars().take(DATA_URI_VISIBLE_CHARS).collect();
    out.push('…');
    out
}

#[derive(Debug, Clone)]
pub struct IsOnHttps {
    pass: String,
}

impl IsOnHttps {
    pub fn for_pass(pass: &str) -> Self {
        Self { pass: pass.to_string() }
    }
}

impl Default for IsOnHttps {
    fn default() -> Self {
        Self::for_pass(DEFAULT_PASS)
    }
}

#[async_trait]
impl Check for IsOnHttps {
    fn meta(&self) -> CheckDescriptor {
        CheckDescriptor::new("is-on-https", "Uses HTTPS").failure("Does not use HTTPS")
                                                         .help("All sites should be protected with HTTPS, even ones that don't handle sensitive \
                                                                data. HTTPS prevents intruders from tampering with or passively listening in \
                                                                on the communications between your app and your users.")
                                                         .requires(&["devtoolsLogs"])
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<CheckResult, CheckError> {
        let NetworkRecords(records) = ctx.request_as::<NetworkRecords>(&NetworkRecordsProvider::params(&self.pass)).await?;
        let insecure: Vec<Finding> = records.iter()
                                            .filter(|r| !is_secure_record(r))
                                            .map(|r| Finding::new(Some(elide_data_uri(&r.url)), format!("insecure scheme `{}`", r.scheme)))
                                            .collect();
        let details = Details::list(Some("Insecure URLs:"), "url", insecure.iter().filter_map(|f| f.url.clone()));
        let count = insecure.len();
        let result = CheckResult::from_offenders(insecure, details);
        Ok(match count {
            0 => result,
            1 => result.with_display_value("1 insecure request found"),
            n => result.with_display_value(format!("{} insecure requests found", format_count(n))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, protocol: Option<&str>) -> NetworkRecord {
        let mut r = NetworkRecord::new("1", url);
        r.protocol = protocol.map(str::to_string);
        r
    }

    #[test]
    fn secure_by_scheme_protocol_or_domain() {
        assert!(is_secure_record(&record("https://a.com/", None)));
        assert!(is_secure_record(&record("blob:https://a.com/uuid", None)));
        assert!(is_secure_record(&record("http://localhost/", None)));
        assert!(is_secure_record(&record("http://127.0.0.1:9000/", None)));
        assert!(is_secure_record(&record("weird://x/", Some("data"))));
        assert!(!is_secure_record(&record("http://a.com/", Some("http/1.1"))));
        assert!(!is_secure_record(&record("ws://a.com/socket", None)));
    }

    #[test]
    fn long_data_uris_are_elided() {
        let uri = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";
        let elided = elide_data_uri(uri);
        assert_eq!(elided.chars().count(), DATA_URI_VISIBLE_CHARS + 1);
        assert!(elided.ends_with('…'));
        assert_eq!(elide_data_uri("data:,x"), "data:,x");
        assert_eq!(elide_data_uri("http://a.com/very/long/path/that/is/not/a/data/uri"),
                   "http://a.com/very/long/path/that/is/not/a/data/uri");
    }
}
