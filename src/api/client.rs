//! Blocking JSON-RPC client for the Zabbix API.
//!
//! One request per operation, bearer-token auth, no retries. Uses blocking
//! HTTP via `ureq` — the CLI has no async runtime.

use super::{ApiError, ZabbixApi};
use crate::domain::{HostGroup, HostTag};
use serde_json::{json, Value};
use std::time::Duration;

/// JSON-RPC 2.0 client over HTTP POST against a single configured endpoint.
pub struct ZabbixClient {
    endpoint: String,
    auth_token: String,
    agent: ureq::Agent,
}

impl ZabbixClient {
    pub fn new(endpoint: &str, auth_token: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            auth_token: auth_token.to_string(),
            agent: ureq::Agent::new_with_config(
                ureq::config::Config::builder()
                    .timeout_global(Some(timeout))
                    .build(),
            ),
        }
    }

    /// POST one request and extract the `result` member of the envelope.
    fn call(&self, method: &str, params: Value) -> Result<Value, ApiError> {
        let body = request_body(method, params);

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", self.auth_token))
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let envelope: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        extract_result(envelope)
    }
}

impl ZabbixApi for ZabbixClient {
    fn get_groups(&self, name: &str) -> Result<Vec<HostGroup>, ApiError> {
        let result = self.call(
            "hostgroup.get",
            json!({
                "output": "extend",
                "filter": { "name": name },
            }),
        )?;
        serde_json::from_value(result).map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn list_hosts(&self, group_id: &str) -> Result<Vec<Value>, ApiError> {
        let result = self.call(
            "host.get",
            json!({
                "groupids": group_id,
                "output": "name",
                "selectTags": ["tag", "value"],
            }),
        )?;
        serde_json::from_value(result).map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn update_tags(&self, host_id: &str, tags: &[HostTag]) -> Result<(), ApiError> {
        self.call(
            "host.update",
            json!({
                "hostid": host_id,
                "tags": tags,
            }),
        )?;
        Ok(())
    }
}

/// The fixed request envelope. The request `id` is constant; responses are
/// matched by request/response pairing on the connection, not by id.
fn request_body(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1,
    })
}

/// Pull `result` out of a response envelope.
///
/// A 200-status response can still carry a JSON-RPC `error` object; surface
/// it as [`ApiError::Rpc`] rather than reading the missing `result` as an
/// empty outcome.
fn extract_result(envelope: Value) -> Result<Value, ApiError> {
    if let Some(err) = envelope.get("error") {
        return Err(ApiError::Rpc {
            code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match envelope.get("result") {
        Some(result) => Ok(result.clone()),
        None => Err(ApiError::MissingResult),
    }
}
