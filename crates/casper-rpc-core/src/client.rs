//! Typed client for the Casper node JSON-RPC API.
//!
//! [`CasperClient`] exposes one async method per RPC method. Each method
//! builds a typed parameter object, hands it to an [`RpcTransport`], and
//! decodes the typed result. Nothing is cached between calls: a method issues
//! one request, or two when it has to look up the latest state root hash on
//! the caller's behalf.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::deploy::Deploy;
use crate::error::{CoreError, RpcError};
use crate::rpc::methods;
use crate::rpc::types::{
    BlockIdentifierParams, DictionaryIdentifier, DiscoverResult, GetAccountInfoParams,
    GetAccountInfoResult, GetAuctionInfoResult, GetBalanceParams, GetBalanceResult,
    GetBlockResult, GetBlockTransfersResult, GetDeployParams, GetDeployResult,
    GetDictionaryItemParams, GetDictionaryItemResult, GetEraInfoResult, GetEraSummaryResult,
    GetPeersResult, GetStateRootHashResult, GetStatusResult, GetValidatorChangesResult,
    PutDeployParams, PutDeployResult, QueryGlobalStateParams, QueryGlobalStateResult,
};
use crate::rpc::{HttpRpcClient, RpcTransport};
use crate::types::{
    AccountHash, BlockIdentifier, DeployHash, Digest, GlobalStateIdentifier, Key, PublicKey,
    StateRootHash, URef,
};

/// Strongly-typed access to a node's JSON-RPC API.
///
/// Cloning is cheap and clones share the transport. The client holds no
/// other state, so concurrent calls need no coordination.
#[derive(Clone)]
pub struct CasperClient {
    transport: Arc<dyn RpcTransport>,
}

impl CasperClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Client over plain HTTP with no auth and no rate limit.
    pub fn connect(connection: &str) -> Result<Self, CoreError> {
        let transport = HttpRpcClient::new(connection, None, None, None)?;
        Ok(Self::new(Arc::new(transport)))
    }

    // ==========================================================================
    // Node / Chain Info
    // ==========================================================================

    pub async fn get_peers(&self) -> Result<GetPeersResult, CoreError> {
        self.send(methods::GET_PEERS, None).await
    }

    pub async fn get_status(&self) -> Result<GetStatusResult, CoreError> {
        self.send(methods::GET_STATUS, None).await
    }

    pub async fn get_validator_changes(&self) -> Result<GetValidatorChangesResult, CoreError> {
        self.send(methods::GET_VALIDATOR_CHANGES, None).await
    }

    /// Raw OpenRPC schema the node publishes.
    pub async fn discover(&self) -> Result<DiscoverResult, CoreError> {
        self.send(methods::DISCOVER, None).await
    }

    /// State root hash as of `block_id`, or of the latest block when `None`
    /// (sent as a call without params).
    pub async fn get_state_root_hash(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetStateRootHashResult, CoreError> {
        let params = block_params(methods::GET_STATE_ROOT_HASH, block_id)?;
        self.send(methods::GET_STATE_ROOT_HASH, params).await
    }

    pub async fn get_block(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetBlockResult, CoreError> {
        let params = block_params(methods::GET_BLOCK, block_id)?;
        self.send(methods::GET_BLOCK, params).await
    }

    pub async fn get_block_transfers(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetBlockTransfersResult, CoreError> {
        let params = block_params(methods::GET_BLOCK_TRANSFERS, block_id)?;
        self.send(methods::GET_BLOCK_TRANSFERS, params).await
    }

    /// Era summary stored by `block_id`. The summary is `None` when the block
    /// is not a switch block; that is decided by the node, not checked here.
    pub async fn get_era_info_by_switch_block(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetEraInfoResult, CoreError> {
        let params = block_params(methods::GET_ERA_INFO_BY_SWITCH_BLOCK, block_id)?;
        self.send(methods::GET_ERA_INFO_BY_SWITCH_BLOCK, params)
            .await
    }

    /// Era summary as of any block, switch block or not.
    pub async fn get_era_summary(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetEraSummaryResult, CoreError> {
        let params = block_params(methods::GET_ERA_SUMMARY, block_id)?;
        self.send(methods::GET_ERA_SUMMARY, params).await
    }

    pub async fn get_auction_info(
        &self,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetAuctionInfoResult, CoreError> {
        let params = block_params(methods::GET_AUCTION_INFO, block_id)?;
        self.send(methods::GET_AUCTION_INFO, params).await
    }

    pub async fn get_deploy(
        &self,
        deploy_hash: DeployHash,
        finalized_approvals: bool,
    ) -> Result<GetDeployResult, CoreError> {
        let params = encode(
            methods::GET_DEPLOY,
            &GetDeployParams {
                deploy_hash,
                finalized_approvals,
            },
        )?;
        self.send(methods::GET_DEPLOY, Some(params)).await
    }

    // ==========================================================================
    // Global State
    // ==========================================================================

    /// Balance of `purse`. Without an explicit `state_root_hash` the latest
    /// one is fetched first, costing a second round trip.
    pub async fn get_balance(
        &self,
        purse: URef,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetBalanceResult, CoreError> {
        let state_root_hash = self.state_root_hash_or_latest(state_root_hash).await?;
        let params = encode(
            methods::GET_BALANCE,
            &GetBalanceParams {
                state_root_hash,
                purse_uref: purse,
            },
        )?;
        self.send(methods::GET_BALANCE, Some(params)).await
    }

    /// Account stored under `public_key`. `None` for `block_id` is forwarded
    /// as null and the node picks the latest block.
    pub async fn get_account_info(
        &self,
        public_key: PublicKey,
        block_id: Option<BlockIdentifier>,
    ) -> Result<GetAccountInfoResult, CoreError> {
        let params = encode(
            methods::GET_ACCOUNT_INFO,
            &GetAccountInfoParams {
                public_key,
                block_identifier: block_id,
            },
        )?;
        self.send(methods::GET_ACCOUNT_INFO, Some(params)).await
    }

    /// Query `key` in the state as of `hash`, which is a block hash when
    /// `is_block_hash` is set and a state root hash otherwise. `path` descends
    /// through named keys of the stored value; empty means the value itself.
    pub async fn query_global_state(
        &self,
        key: Key,
        hash: Digest,
        is_block_hash: bool,
        path: &[String],
    ) -> Result<QueryGlobalStateResult, CoreError> {
        let state_identifier = GlobalStateIdentifier::from_hash(hash, is_block_hash);
        self.query_global_state_with(state_identifier, key, path)
            .await
    }

    pub async fn query_global_state_with(
        &self,
        state_identifier: GlobalStateIdentifier,
        key: Key,
        path: &[String],
    ) -> Result<QueryGlobalStateResult, CoreError> {
        let params = encode(
            methods::QUERY_GLOBAL_STATE,
            &QueryGlobalStateParams {
                state_identifier,
                key,
                path: path.to_vec(),
            },
        )?;
        self.send(methods::QUERY_GLOBAL_STATE, Some(params)).await
    }

    #[deprecated(note = "use `query_global_state` with `is_block_hash = false`")]
    pub async fn get_item(
        &self,
        state_root_hash: StateRootHash,
        key: Key,
        path: &[String],
    ) -> Result<QueryGlobalStateResult, CoreError> {
        self.query_global_state_with(
            GlobalStateIdentifier::StateRootHash(state_root_hash),
            key,
            path,
        )
        .await
    }

    // ==========================================================================
    // Dictionary Items
    // ==========================================================================

    /// Look up a dictionary item with any [`DictionaryIdentifier`]. Without
    /// an explicit `state_root_hash` the latest one is fetched first.
    pub async fn get_dictionary_item_with(
        &self,
        dictionary_identifier: DictionaryIdentifier,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetDictionaryItemResult, CoreError> {
        let state_root_hash = self.state_root_hash_or_latest(state_root_hash).await?;
        let params = encode(
            methods::GET_DICTIONARY_ITEM,
            &GetDictionaryItemParams {
                state_root_hash,
                dictionary_identifier,
            },
        )?;
        self.send(methods::GET_DICTIONARY_ITEM, Some(params)).await
    }

    pub async fn get_dictionary_item(
        &self,
        dictionary_addr: Digest,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetDictionaryItemResult, CoreError> {
        self.get_dictionary_item_with(
            DictionaryIdentifier::by_dictionary_key(dictionary_addr),
            state_root_hash,
        )
        .await
    }

    pub async fn get_dictionary_item_by_account(
        &self,
        account_hash: AccountHash,
        dictionary_name: &str,
        dictionary_item_key: &str,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetDictionaryItemResult, CoreError> {
        self.get_dictionary_item_with(
            DictionaryIdentifier::by_account_named_key(
                account_hash,
                dictionary_name,
                dictionary_item_key,
            ),
            state_root_hash,
        )
        .await
    }

    pub async fn get_dictionary_item_by_contract(
        &self,
        contract_hash: Digest,
        dictionary_name: &str,
        dictionary_item_key: &str,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetDictionaryItemResult, CoreError> {
        self.get_dictionary_item_with(
            DictionaryIdentifier::by_contract_named_key(
                contract_hash,
                dictionary_name,
                dictionary_item_key,
            ),
            state_root_hash,
        )
        .await
    }

    pub async fn get_dictionary_item_by_uref(
        &self,
        seed_uref: URef,
        dictionary_item_key: &str,
        state_root_hash: Option<StateRootHash>,
    ) -> Result<GetDictionaryItemResult, CoreError> {
        self.get_dictionary_item_with(
            DictionaryIdentifier::by_seed_uref(seed_uref, dictionary_item_key),
            state_root_hash,
        )
        .await
    }

    // ==========================================================================
    // Deploy Submission
    // ==========================================================================

    /// Submit a signed deploy. A deploy without approvals is rejected here,
    /// before anything is sent.
    pub async fn put_deploy(&self, deploy: &Deploy) -> Result<PutDeployResult, CoreError> {
        deploy.ensure_approved()?;
        debug!(
            deploy_hash = %deploy.hash,
            approvals = deploy.approvals.len(),
            "submitting deploy"
        );
        let params = encode(methods::PUT_DEPLOY, &PutDeployParams { deploy })?;
        self.send(methods::PUT_DEPLOY, Some(params)).await
    }

    /// Submit `{"deploy": {...}}` given as untyped JSON.
    #[deprecated(note = "decode into `Deploy` and use `put_deploy`")]
    pub async fn put_deploy_json(
        &self,
        raw: serde_json::Value,
    ) -> Result<PutDeployResult, CoreError> {
        let deploy = decode_legacy_deploy(raw)?;
        self.put_deploy(&deploy).await
    }

    // ==========================================================================
    // Plumbing
    // ==========================================================================

    /// `explicit` when given; otherwise the node's latest state root hash.
    async fn state_root_hash_or_latest(
        &self,
        explicit: Option<StateRootHash>,
    ) -> Result<StateRootHash, CoreError> {
        if let Some(hash) = explicit {
            return Ok(hash);
        }

        let latest = self.get_state_root_hash(None).await?;
        let hash = latest.state_root_hash.ok_or_else(|| {
            RpcError::InvalidResponse("node returned no state root hash for the latest block".into())
        })?;
        debug!(state_root_hash = %hash, "resolved latest state root hash");
        Ok(hash)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Option<serde_json::Value>,
    ) -> Result<R, CoreError> {
        let raw = self.transport.call(method, params).await?;
        serde_json::from_value(raw).map_err(|e| {
            RpcError::InvalidResponse(format!("invalid {method} result: {e}")).into()
        })
    }
}

fn encode<P: Serialize>(method: &str, params: &P) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(params)
        .map_err(|e| CoreError::InvalidArgument(format!("encode {method} params: {e}")))
}

fn block_params(
    method: &str,
    block_id: Option<BlockIdentifier>,
) -> Result<Option<serde_json::Value>, CoreError> {
    block_id
        .map(|block_identifier| encode(method, &BlockIdentifierParams { block_identifier }))
        .transpose()
}

/// Check `deploy.approvals` in the raw object, then decode the deploy.
fn decode_legacy_deploy(mut raw: serde_json::Value) -> Result<Deploy, CoreError> {
    let approvals = raw
        .get("deploy")
        .and_then(|deploy| deploy.get("approvals"))
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len);
    if approvals == 0 {
        return Err(CoreError::InvalidArgument(
            "deploy JSON has no approvals; sign it before submitting".to_owned(),
        ));
    }

    let deploy = raw
        .get_mut("deploy")
        .map(serde_json::Value::take)
        .unwrap_or_default();
    serde_json::from_value(deploy)
        .map_err(|e| CoreError::InvalidArgument(format!("deploy JSON does not decode: {e}")))
}
