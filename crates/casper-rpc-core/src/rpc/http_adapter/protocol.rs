use crate::error::{CoreError, RpcError};

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) params: Option<serde_json::Value>,
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default, deserialize_with = "present")]
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// `Some` for any member that is present, `null` included; `None` only via
/// `#[serde(default)]` when the member is missing.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// JSON-RPC 2.0 defines errors as `{"code": <int>, "message": <string>}`
/// with an optional `data` member, which the node uses for details. If the
/// error value matches that shape, we produce a `ServerError`; otherwise we
/// fall back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
        #[serde(default)]
        data: Option<serde_json::Value>,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
            data: parsed.data,
        }),
        Err(_) => CoreError::Rpc(RpcError::InvalidResponse(format!(
            "non-standard JSON-RPC error: {err}"
        ))),
    }
}

/// Decode a response body into the `result` value or the node's error.
///
/// A non-2xx status is reported as `HttpStatus` unless the body carries a
/// well-formed JSON-RPC error object, which is surfaced as `ServerError`.
/// A 2xx body with neither `result` nor `error` is an `InvalidResponse`.
pub(super) fn decode_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<serde_json::Value, CoreError> {
    let decoded: JsonRpcResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(_) if !status.is_success() => {
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                body: body.to_owned(),
            }
            .into());
        }
        Err(e) => {
            return Err(RpcError::InvalidResponse(format!(
                "decode JSON-RPC response: {e}; body={body}"
            ))
            .into());
        }
    };

    let http_status = || -> CoreError {
        RpcError::HttpStatus {
            status: status.as_u16(),
            body: body.to_owned(),
        }
        .into()
    };

    if let Some(err) = decoded.error {
        let err = parse_jsonrpc_error(err);
        // A non-standard error object on a failed request comes from a proxy,
        // not the node.
        if !status.is_success() && !matches!(err, CoreError::Rpc(RpcError::ServerError { .. })) {
            return Err(http_status());
        }
        return Err(err);
    }

    if !status.is_success() {
        return Err(http_status());
    }

    decoded.result.ok_or_else(|| {
        RpcError::InvalidResponse(format!(
            "JSON-RPC response carries neither result nor error; body={body}"
        ))
        .into()
    })
}
