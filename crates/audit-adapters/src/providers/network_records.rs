//! `network-records`: peticiones de red normalizadas a partir del log de
//! protocolo de un pass.
//!
//! - Un registro por `Network.requestWillBeSent`; una redirección (evento con
//!   `redirectResponse`) abre un registro nuevo para el mismo `requestId`.
//! - `Network.responseReceived` completa `protocol` del último registro de
//!   ese `requestId`.
//! - Orden de salida = orden de primera aparición.

use std::collections::HashMap;

use async_trait::async_trait;
use audit_core::constants::DEFAULT_PASS;
use audit_core::{ArtifactKind, DerivationContext, DerivationError, DerivedArtifactProvider};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::artifacts::{DevtoolsLogs, NetworkRecord, NetworkRecords, ProtocolEvent};

pub const NAME: &str = NetworkRecords::NAME;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWillBeSent {
    request_id: String,
    request: Request,
    #[serde(default)]
    redirect_response: Option<Response>,
}

#[derive(Debug, Deserialize)]
struct Request {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseReceived {
    request_id: String,
    response: Response,
}

#[derive(Debug, Default, Deserialize)]
struct Response {
    #[serde(default)]
    protocol: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NetworkRecordsProvider {
    default_pass: String,
}

impl NetworkRecordsProvider {
    pub fn for_pass(pass: &str) -> Self {
        Self { default_pass: pass.to_string() }
    }

    /// Parámetros para solicitar los registros de `pass`.
    pub fn params(pass: &str) -> Value {
        json!({ "pass": pass })
    }
}

impl Default for NetworkRecordsProvider {
    fn default() -> Self {
        Self::for_pass(DEFAULT_PASS)
    }
}

fn event_params<T: serde::de::DeserializeOwned>(event: &ProtocolEvent) -> Result<T, DerivationError> {
    serde_json::from_value(event.params.clone()).map_err(|e| DerivationError::malformed(NAME, format!("{}: {e}", event.method)))
}

/// Reconstruye los registros de red de una secuencia de eventos.
pub fn records_from_events(events: &[ProtocolEvent]) -> Result<Vec<NetworkRecord>, DerivationError> {
    let mut records: Vec<NetworkRecord> = Vec::new();
    let mut latest: HashMap<String, usize> = HashMap::new();
    for event in events {
        match event.method.as_str() {
            "Network.requestWillBeSent" => {
                let sent: RequestWillBeSent = event_params(event)?;
                if let (Some(redirect), Some(&idx)) = (&sent.redirect_response, latest.get(&sent.request_id)) {
                    records[idx].protocol = redirect.protocol.clone();
                }
                latest.insert(sent.request_id.clone(), records.len());
                records.push(NetworkRecord::new(&sent.request_id, &sent.request.url));
            }
            "Network.responseReceived" => {
                let received: ResponseReceived = event_params(event)?;
                if let Some(&idx) = latest.get(&received.request_id) {
                    records[idx].protocol = received.response.protocol;
                }
            }
            _ => {}
        }
    }
    Ok(records)
}

#[async_trait]
impl DerivedArtifactProvider for NetworkRecordsProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn inputs(&self) -> Vec<&'static str> {
        vec!["devtoolsLogs"]
    }

    fn default_params(&self) -> Value {
        Self::params(&self.default_pass)
    }

    async fn compute(&self, ctx: &DerivationContext<'_>, params: &Value) -> Result<Value, DerivationError> {
        let pass = params.get("pass")
                         .and_then(Value::as_str)
                         .ok_or_else(|| DerivationError::malformed(NAME, "params must name a `pass`"))?;
        let logs: DevtoolsLogs = ctx.decode_input()?;
        let events = logs.0
                         .get(pass)
                         .ok_or_else(|| DerivationError::missing_input(NAME, &format!("devtoolsLogs.{pass}")))?;
        let records = records_from_events(events)?;
        log::debug!("network-records pass={pass} events={} records={}", events.len(), records.len());
        serde_json::to_value(records).map_err(|e| DerivationError::malformed(NAME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(method: &str, params: Value) -> ProtocolEvent {
        ProtocolEvent { method: method.to_string(),
                        params }
    }

    #[test]
    fn redirects_open_new_records_and_responses_fill_protocol() {
        let events = vec![event("Network.requestWillBeSent", json!({"requestId": "1", "request": {"url": "http://a.com/"}})),
                          event("Network.requestWillBeSent",
                                json!({"requestId": "1", "request": {"url": "https://a.com/"}, "redirectResponse": {"protocol": "http/1.1"}})),
                          event("Network.dataReceived", json!({"requestId": "1"})),
                          event("Network.responseReceived", json!({"requestId": "1", "response": {"protocol": "h2"}})),
                          event("Network.requestWillBeSent", json!({"requestId": "2", "request": {"url": "data:text/plain,hi"}}))];
        let records = records_from_events(&events).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].protocol.as_deref(), Some("http/1.1"));
        assert_eq!(records[1].scheme, "https");
        assert_eq!(records[1].protocol.as_deref(), Some("h2"));
        assert_eq!(records[2].scheme, "data");
        assert_eq!(records[2].protocol, None);
    }

    #[test]
    fn malformed_event_params_are_rejected() {
        let events = vec![event("Network.requestWillBeSent", json!({"requestId": "1"}))];
        assert!(matches!(records_from_events(&events), Err(DerivationError::Malformed { .. })));
    }
}
