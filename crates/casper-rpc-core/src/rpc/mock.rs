use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};

use super::RpcTransport;

/// One call observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Result(serde_json::Value),
    ServerError { code: i64, message: String },
}

/// A mock transport for testing. Replays canned results populated via the
/// builder pattern and records every call it receives, in order.
///
/// A reply registered for an exact `(method, params)` pair wins over a reply
/// registered for the method alone. Unknown methods fail the way the node
/// does, with JSON-RPC error -32601.
pub struct MockTransport {
    by_method: HashMap<String, MockReply>,
    by_params: Vec<(String, serde_json::Value, MockReply)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            by_method: HashMap::new(),
            by_params: Vec::new(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock call log poisoned").len()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| call.method)
            .collect()
    }

    fn reply_for(&self, method: &str, params: Option<&serde_json::Value>) -> Option<MockReply> {
        let exact = params.and_then(|params| {
            self.by_params
                .iter()
                .find(|(m, p, _)| m == method && p == params)
                .map(|(_, _, reply)| reply.clone())
        });
        exact.or_else(|| self.by_method.get(method).cloned())
    }
}

pub struct MockTransportBuilder {
    by_method: HashMap<String, MockReply>,
    by_params: Vec<(String, serde_json::Value, MockReply)>,
}

impl MockTransportBuilder {
    pub fn with_result(mut self, method: &str, result: serde_json::Value) -> Self {
        self.by_method
            .insert(method.to_owned(), MockReply::Result(result));
        self
    }

    pub fn with_result_for(
        mut self,
        method: &str,
        params: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        self.by_params
            .push((method.to_owned(), params, MockReply::Result(result)));
        self
    }

    pub fn with_server_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.by_method.insert(
            method.to_owned(),
            MockReply::ServerError {
                code,
                message: message.to_owned(),
            },
        );
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            by_method: self.by_method,
            by_params: self.by_params,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        let reply = self.reply_for(method, params.as_ref());
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                method: method.to_owned(),
                params,
            });

        match reply {
            Some(MockReply::Result(value)) => Ok(value),
            Some(MockReply::ServerError { code, message }) => Err(RpcError::ServerError {
                code,
                message,
                data: None,
            }
            .into()),
            None => Err(RpcError::ServerError {
                code: -32601,
                message: "Method not found".to_owned(),
                data: None,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_params_reply_wins_over_method_reply() {
        let params = serde_json::json!({ "block_identifier": { "Height": 1 } });
        let mock = MockTransport::builder()
            .with_result("chain_get_block", serde_json::json!("any"))
            .with_result_for("chain_get_block", params.clone(), serde_json::json!("exact"))
            .build();

        let exact = mock.call("chain_get_block", Some(params)).await.unwrap();
        assert_eq!(exact, serde_json::json!("exact"));

        let fallback = mock.call("chain_get_block", None).await.unwrap();
        assert_eq!(fallback, serde_json::json!("any"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn unknown_method_is_recorded_and_fails() {
        let mock = MockTransport::builder().build();
        let err = mock.call("info_get_nothing", None).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::ServerError { code: -32601, .. })
        ));
        assert_eq!(mock.methods(), vec!["info_get_nothing".to_owned()]);
    }
}
