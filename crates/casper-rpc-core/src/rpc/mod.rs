//! Casper node JSON-RPC abstraction layer.
//!
//! Defines the [`RpcTransport`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::HttpRpcClient;

use async_trait::async_trait;

use crate::error::CoreError;

/// Raw JSON-RPC dispatch: one request, one decoded `result` value.
///
/// Implementations own everything below the JSON-RPC envelope: HTTP,
/// authentication, timeouts, and mapping of JSON-RPC error objects into
/// [`crate::error::RpcError`]. They must not retry.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue `method` with optional named `params` and return the `result`
    /// member of the response.
    async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError>;
}

/// JSON-RPC method names served by the node.
pub mod methods {
    pub const GET_PEERS: &str = "info_get_peers";
    pub const GET_STATUS: &str = "info_get_status";
    pub const GET_DEPLOY: &str = "info_get_deploy";
    pub const GET_VALIDATOR_CHANGES: &str = "info_get_validator_changes";
    pub const GET_STATE_ROOT_HASH: &str = "chain_get_state_root_hash";
    pub const GET_BLOCK: &str = "chain_get_block";
    pub const GET_BLOCK_TRANSFERS: &str = "chain_get_block_transfers";
    pub const GET_ERA_INFO_BY_SWITCH_BLOCK: &str = "chain_get_era_info_by_switch_block";
    pub const GET_ERA_SUMMARY: &str = "chain_get_era_summary";
    pub const GET_BALANCE: &str = "state_get_balance";
    pub const GET_ACCOUNT_INFO: &str = "state_get_account_info";
    pub const GET_DICTIONARY_ITEM: &str = "state_get_dictionary_item";
    pub const GET_AUCTION_INFO: &str = "state_get_auction_info";
    pub const QUERY_GLOBAL_STATE: &str = "query_global_state";
    pub const PUT_DEPLOY: &str = "account_put_deploy";
    pub const DISCOVER: &str = "rpc.discover";
}
