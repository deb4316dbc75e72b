use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiParams, ApiTransport};
use crate::error::{ArchivistError, Result};

/// One recorded API call. `request` holds the parameters that identify it;
/// parameters the request carries beyond those are ignored when matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedExchange {
    pub request: ApiParams,
    pub response: Value,
}

/// Serves recorded responses instead of reaching a live wiki.
#[derive(Debug, Clone, Default)]
pub struct ReplayTransport {
    exchanges: Vec<RecordedExchange>,
}

impl ReplayTransport {
    pub const fn from_exchanges(exchanges: Vec<RecordedExchange>) -> Self {
        Self { exchanges }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let exchanges = serde_json::from_str::<Vec<RecordedExchange>>(raw)?;
        Ok(Self::from_exchanges(exchanges))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl ApiTransport for ReplayTransport {
    fn get(&self, params: &ApiParams) -> Result<Value> {
        let mut best: Option<&RecordedExchange> = None;
        for exchange in &self.exchanges {
            let matches = exchange
                .request
                .iter()
                .all(|(key, value)| params.get(key) == Some(value));
            if !matches {
                continue;
            }
            if best.is_none_or(|current| exchange.request.len() > current.request.len()) {
                best = Some(exchange);
            }
        }
        best.map(|exchange| exchange.response.clone())
            .ok_or_else(|| ArchivistError::ReplayMiss(describe(params)))
    }
}

fn describe(params: &ApiParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ApiParams {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn most_specific_recorded_request_wins() {
        let transport = ReplayTransport::from_exchanges(vec![
            RecordedExchange {
                request: params(&[("action", "query")]),
                response: json!({"which": "generic"}),
            },
            RecordedExchange {
                request: params(&[("action", "query"), ("rvcontinue", "abc")]),
                response: json!({"which": "continued"}),
            },
        ]);
        let first = transport
            .get(&params(&[("action", "query"), ("format", "json")]))
            .expect("generic");
        assert_eq!(first["which"], "generic");
        let second = transport
            .get(&params(&[("action", "query"), ("rvcontinue", "abc")]))
            .expect("continued");
        assert_eq!(second["which"], "continued");
    }

    #[test]
    fn ties_resolve_to_the_first_recording() {
        let transport = ReplayTransport::from_json_str(
            r#"[
                {"request": {"action": "parse"}, "response": {"n": 1}},
                {"request": {"action": "parse"}, "response": {"n": 2}}
            ]"#,
        )
        .expect("load");
        assert_eq!(transport.len(), 2);
        let value = transport.get(&params(&[("action", "parse")])).expect("hit");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn unmatched_request_is_a_replay_miss() {
        let transport = ReplayTransport::default();
        let err = transport
            .get(&params(&[("action", "parse"), ("oldid", "7")]))
            .expect_err("miss");
        assert_eq!(err.code(), "REPLAY_MISS");
        assert!(err.to_string().contains("action=parse&oldid=7"));
    }

    #[test]
    fn load_reads_recordings_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("replay.json");
        fs::write(
            &path,
            r#"[{"request": {"list": "users"}, "response": {"query": {"users": []}}}]"#,
        )
        .expect("write");
        let transport = ReplayTransport::load(&path).expect("load");
        assert!(!transport.is_empty());
    }
}
