//! Line-delimited JSON-RPC 2.0 dispatch
//!
//! Methods:
//! - initialize: server info and capabilities
//! - ping: liveness
//! - tools/list: metadata of every registered widget function
//! - tools/call: `{name, arguments: [..]}` → `{value, isError, trace?}`
//! - help: `{name?}` → registry help

use std::sync::Arc;
use panelkit_core::Value;
use panelkit_plugin::{EvalContext, PluginRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "panelkit";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    code: i32,
    message: String,
}

impl RpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl RpcResponse {
    fn ok(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    fn err(id: Option<JsonValue>, error: RpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}

/// Routes requests to the widget function registry
pub struct Host {
    registry: Arc<PluginRegistry>,
    trace: bool,
}

impl Host {
    pub fn new(registry: PluginRegistry, trace: bool) -> Self {
        Self { registry: Arc::new(registry), trace }
    }

    /// Handle one input line. `None` means nothing is written back
    /// (blank line or notification).
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing request");
                let response = self.handle_request(&request);
                // Notifications (no id) get no response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    return None;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                RpcResponse::err(None, RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)))
            }
        };

        match serde_json::to_string(&response) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    pub fn handle_request(&self, request: &RpcRequest) -> RpcResponse {
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "initialized" | "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.tools_call(&request.params),
            "help" => Ok(self.help(&request.params)),
            other => {
                warn!(method = other, "method not found");
                Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", other)))
            }
        };

        match result {
            Ok(r) => RpcResponse::ok(request.id.clone(), r),
            Err(e) => RpcResponse::err(request.id.clone(), e),
        }
    }

    fn initialize(&self) -> JsonValue {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
                "description": "Side panel widget functions"
            },
            "capabilities": {
                "tools": { "listChanged": false }
            }
        })
    }

    fn tools_list(&self) -> JsonValue {
        let tools: Vec<JsonValue> = self.registry.list_functions(None)
            .iter()
            .filter_map(|meta| match serde_json::to_value(meta) {
                Ok(tool) => Some(tool),
                Err(e) => {
                    warn!(tool = meta.name, error = %e, "failed to serialize tool metadata");
                    None
                }
            })
            .collect();
        json!({ "tools": tools })
    }

    fn tools_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params = params.as_ref()
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing tool name"))?;

        let args: Vec<Value> = match params.get("arguments") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items.iter().map(Value::from_json).collect(),
            Some(_) => return Err(RpcError::new(INVALID_PARAMS, "arguments must be an array")),
        };

        let mut ctx = EvalContext::new(Arc::clone(&self.registry)).with_tracing(self.trace);
        let value = ctx.call(name, &args);
        if let Some(e) = value.as_error() {
            debug!(tool = name, code = %e.code, "tool returned error");
        }

        let mut result = json!({
            "value": value.to_json(),
            "isError": value.is_error(),
        });
        if self.trace {
            let steps: Vec<JsonValue> = ctx.take_trace()
                .into_iter()
                .map(|step| json!({
                    "function": step.function,
                    "args": step.args.iter().map(Value::to_json).collect::<Vec<_>>(),
                    "result": step.result.to_json(),
                }))
                .collect();
            result["trace"] = JsonValue::Array(steps);
        }
        Ok(result)
    }

    fn help(&self, params: &Option<JsonValue>) -> JsonValue {
        let name = params.as_ref()
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str());
        self.registry.help(name).to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(trace: bool) -> Host {
        Host::new(panelkit_units::load_units_library(PluginRegistry::new()), trace)
    }

    fn roundtrip(host: &Host, line: &str) -> JsonValue {
        let out = host.handle_line(line).expect("response expected");
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_ping() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_initialize() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":"a","method":"initialize","params":{}}"#);
        assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_blank_line_and_notification_are_silent() {
        let h = host(false);
        assert!(h.handle_line("   ").is_none());
        assert!(h.handle_line(r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
    }

    #[test]
    fn test_parse_error() {
        let resp = roundtrip(&host(false), "{not json");
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert!(resp.get("id").is_none());
    }

    #[test]
    fn test_unknown_method() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":2,"method":"weather/get"}"#);
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_tools_list() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#);
        let names: Vec<&str> = resp["result"]["tools"].as_array().unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["categories", "convert", "convert_format", "format_result", "units"]);

        let format = &resp["result"]["tools"][3];
        assert_eq!(format["usage"], "format_result(value, [category])");
        assert_eq!(format["args"][0]["optional"], false);
        assert!(format["args"][0].get("default").is_none());
        assert_eq!(format["args"][1]["optional"], true);
        assert_eq!(format["args"][1]["default"], "Length");
    }

    #[test]
    fn test_tools_call_currency() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":12,"method":"tools/call","params":{"name":"convert_format","arguments":["Currency","2500","EUR","USD"]}}"#);
        assert_eq!(resp["result"]["value"], "2,941.18");
        assert_eq!(resp["result"]["isError"], false);
    }

    #[test]
    fn test_tools_call_convert_format() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"convert_format","arguments":["Length",1,"Mile","Kilometer"]}}"#);
        assert_eq!(resp["result"]["value"], "1.60934");
        assert_eq!(resp["result"]["isError"], false);
        assert!(resp["result"].get("trace").is_none());
    }

    #[test]
    fn test_tools_call_no_result_is_null() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"convert","arguments":["Length","","Mile","Kilometer"]}}"#);
        assert_eq!(resp["result"]["value"], JsonValue::Null);
        assert_eq!(resp["result"]["isError"], false);
    }

    #[test]
    fn test_tools_call_error_value() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"convert","arguments":["Length",1,"Mile","Gram"]}}"#);
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["value"]["error"]["code"], "INVALID_UNIT");
    }

    #[test]
    fn test_tools_call_bad_params() {
        let h = host(false);
        let resp = roundtrip(&h, r#"{"jsonrpc":"2.0","id":7,"method":"tools/call"}"#);
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);

        let resp = roundtrip(&h, r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"convert","arguments":{"a":1}}}"#);
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_tools_call_with_trace() {
        let resp = roundtrip(&host(true), r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"convert","arguments":["Temperature",212,"Fahrenheit","Celsius"]}}"#);
        assert_eq!(resp["result"]["value"], 100.0);
        let trace = resp["result"]["trace"].as_array().unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0]["function"], "convert");
    }

    #[test]
    fn test_help() {
        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":10,"method":"help","params":{"name":"convert"}}"#);
        assert_eq!(resp["result"]["usage"], "convert(category, amount, from_unit, to_unit)");

        let resp = roundtrip(&host(false), r#"{"jsonrpc":"2.0","id":11,"method":"help"}"#);
        assert!(resp["result"]["functions"]["units"].is_array());
    }
}
