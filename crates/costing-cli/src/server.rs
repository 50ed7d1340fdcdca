//! JSON-RPC 2.0 server mode for costing-cli
//!
//! Lets external tools use the calculator as a backend. Reads one request
//! per stdin line and writes one response per stdout line.
//!
//! Methods:
//!   resolve    {figures}              resolve a record in one shot
//!   sweep      {figures}              chart payload for the resolved record
//!   set        {field, value}         update one figure of the session form
//!   calculate                         resolve the session form
//!   clear                             reset the session form
//!   fields                            list the figure registry

use costing_core::report::{self, BreakdownRow};
use costing_core::{
    resolve_with, ChartData, Field, FieldKind, InputRecord, Presence, ResolveError, Resolution,
    Scenario, Session, FIELDS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// JSON-RPC 2.0 request
#[derive(Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
    id: serde_json::Value,
}

/// JSON-RPC 2.0 response
#[derive(Serialize)]
struct Response {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: serde_json::Value,
}

/// JSON-RPC error object
#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// Structured resolution result
#[derive(Serialize)]
struct ResolveResult {
    scenario: Scenario,
    description: &'static str,
    partial: bool,
    record: InputRecord,
    breakdown: Vec<BreakdownRow>,
}

impl From<&Resolution> for ResolveResult {
    fn from(resolution: &Resolution) -> Self {
        Self {
            scenario: resolution.scenario,
            description: resolution.scenario.description(),
            partial: resolution.record.is_partial(),
            record: resolution.record.figures(),
            breakdown: report::breakdown(&resolution.record),
        }
    }
}

/// Params for set method
#[derive(Deserialize)]
struct SetParams {
    field: Field,
    value: Option<Decimal>,
}

/// Field info for fields response
#[derive(Serialize)]
struct FieldInfo {
    key: &'static str,
    label: &'static str,
    name: &'static str,
    kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Decimal>,
    help: &'static str,
}

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;
const RESOLVE_ERROR: i32 = -32000;

impl Response {
    fn success(id: serde_json::Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                jsonrpc: "2.0",
                result: Some(result),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Serialization error: {e}")),
        }
    }

    fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    fn resolve_error(id: serde_json::Value, error: &ResolveError) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code: RESOLVE_ERROR,
                message: error.to_string(),
                data: Some(serde_json::json!({ "kind": error.kind() })),
            }),
            id,
        }
    }
}

/// Deserialize required params
fn parse_params<T: for<'de> Deserialize<'de>>(
    params: Option<serde_json::Value>,
) -> Result<T, String> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| format!("Invalid params: {e}")),
        None => Err("Missing params".to_string()),
    }
}

/// Handle a single JSON-RPC request
fn handle_request(session: &mut Session, input: &str) -> Response {
    // Parse request
    let request: Request = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => {
            return Response::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            );
        }
    };

    // Validate jsonrpc version
    if request.jsonrpc != "2.0" {
        return Response::error(request.id, INVALID_REQUEST, "Invalid JSON-RPC version");
    }

    debug!(method = %request.method, "request");

    // Dispatch method
    match request.method.as_str() {
        "resolve" => handle_resolve(session.presence(), request.id, request.params),
        "sweep" => handle_sweep(session.presence(), request.id, request.params),
        "set" => handle_set(session, request.id, request.params),
        "calculate" => handle_calculate(session, request.id),
        "clear" => handle_clear(session, request.id),
        "fields" => handle_fields(request.id),
        _ => Response::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

/// Handle resolve method - resolve a record without touching the session
fn handle_resolve(
    presence: Presence,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let input: InputRecord = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    match resolve_with(input, presence) {
        Ok(resolution) => Response::success(id, ResolveResult::from(&resolution)),
        Err(e) => Response::resolve_error(id, &e),
    }
}

/// Handle sweep method - chart payload for a resolved record (null when not chartable)
fn handle_sweep(
    presence: Presence,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let input: InputRecord = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    match resolve_with(input, presence) {
        Ok(resolution) => Response::success(id, ChartData::from_record(&resolution.record)),
        Err(e) => Response::resolve_error(id, &e),
    }
}

/// Handle set method - update one figure of the session form
fn handle_set(
    session: &mut Session,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params: SetParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    session.set(params.field, params.value);
    Response::success(id, session.input())
}

/// Handle calculate method - resolve the session form
fn handle_calculate(session: &mut Session, id: serde_json::Value) -> Response {
    match session.calculate() {
        Ok(resolution) => Response::success(id, ResolveResult::from(resolution)),
        Err(e) => Response::resolve_error(id, &e),
    }
}

/// Handle clear method - reset the session form
fn handle_clear(session: &mut Session, id: serde_json::Value) -> Response {
    session.clear();
    Response::success(id, serde_json::json!({"message": "Cleared"}))
}

/// Handle fields method - list the figure registry
fn handle_fields(id: serde_json::Value) -> Response {
    let fields: Vec<FieldInfo> = FIELDS
        .iter()
        .map(|def| FieldInfo {
            key: def.key,
            label: def.label,
            name: def.name,
            kind: def.kind,
            max: def.max,
            help: def.help,
        })
        .collect();
    Response::success(id, fields)
}

/// Run the JSON-RPC server loop
pub fn run_server(presence: Presence) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = Session::new(presence);

    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let response = handle_request(&mut session, &line);
        if let Some(error) = &response.error {
            warn!(code = error.code, message = %error.message, "request failed");
        }
        let json = serde_json::to_string(&response)?;
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(session: &mut Session, request: serde_json::Value) -> serde_json::Value {
        let response = handle_request(session, &request.to_string());
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_resolve_method() {
        let mut session = Session::default();
        let response = call(
            &mut session,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "resolve",
                "params": {"cost": 200, "loss_pct": 10},
                "id": 1
            }),
        );
        assert_eq!(response["result"]["scenario"], "cost_loss");
        assert_eq!(response["result"]["record"]["discounted_price"], 180.0);
        assert_eq!(response["id"], 1);
    }

    #[test]
    fn test_resolve_error_carries_kind() {
        let mut session = Session::default();
        let response = call(
            &mut session,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "resolve",
                "params": {"profit": 10},
                "id": 2
            }),
        );
        assert_eq!(response["error"]["code"], RESOLVE_ERROR);
        assert_eq!(response["error"]["data"]["kind"], "insufficient_input");
    }

    #[test]
    fn test_unknown_method() {
        let mut session = Session::default();
        let response = call(
            &mut session,
            serde_json::json!({"jsonrpc": "2.0", "method": "nope", "id": 3}),
        );
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_bad_version() {
        let mut session = Session::default();
        let response = call(
            &mut session,
            serde_json::json!({"jsonrpc": "1.0", "method": "fields", "id": 4}),
        );
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }
}
