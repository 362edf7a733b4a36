//! Parameter and result shapes of the node's JSON-RPC methods.
//!
//! Parameter structs serialize into the `params` object of a request; result
//! structs deserialize from the `result` member of a response. Field names
//! match the node's published schema exactly.

use serde::{Deserialize, Serialize};

use crate::deploy::{CLValue, Deploy};
use crate::types::{
    AccountHash, BlockHash, BlockIdentifier, DeployHash, DictionaryAddr, Digest,
    GlobalStateIdentifier, Key, PublicKey, StateRootHash, URef,
};

// ==============================================================================
// Parameters
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BlockIdentifierParams {
    pub block_identifier: BlockIdentifier,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetDeployParams {
    pub deploy_hash: DeployHash,
    /// Only sent when requested; older nodes reject unknown fields.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub finalized_approvals: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetBalanceParams {
    pub state_root_hash: StateRootHash,
    pub purse_uref: URef,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetAccountInfoParams {
    pub public_key: PublicKey,
    pub block_identifier: Option<BlockIdentifier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryGlobalStateParams {
    pub state_identifier: GlobalStateIdentifier,
    pub key: Key,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetDictionaryItemParams {
    pub state_root_hash: StateRootHash,
    pub dictionary_identifier: DictionaryIdentifier,
}

#[derive(Debug, Clone, Serialize)]
pub struct PutDeployParams<'a> {
    pub deploy: &'a Deploy,
}

/// The four ways of addressing a dictionary item.
///
/// All of them resolve, on the node, to the same `dictionary-…` key and the
/// same stored value shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DictionaryIdentifier {
    /// Dictionary item named by an account's named key.
    AccountNamedKey {
        key: AccountHash,
        dictionary_name: String,
        dictionary_item_key: String,
    },
    /// Dictionary item named by a contract's named key.
    ContractNamedKey {
        key: Key,
        dictionary_name: String,
        dictionary_item_key: String,
    },
    /// Dictionary item under a seed URef.
    URef {
        seed_uref: URef,
        dictionary_item_key: String,
    },
    /// Dictionary item by its already-derived `dictionary-…` key.
    Dictionary(DictionaryAddr),
}

impl DictionaryIdentifier {
    pub fn by_dictionary_key(dictionary_addr: Digest) -> Self {
        Self::Dictionary(DictionaryAddr(dictionary_addr))
    }

    pub fn by_account_named_key(
        account_hash: AccountHash,
        dictionary_name: impl Into<String>,
        dictionary_item_key: impl Into<String>,
    ) -> Self {
        Self::AccountNamedKey {
            key: account_hash,
            dictionary_name: dictionary_name.into(),
            dictionary_item_key: dictionary_item_key.into(),
        }
    }

    pub fn by_contract_named_key(
        contract_hash: Digest,
        dictionary_name: impl Into<String>,
        dictionary_item_key: impl Into<String>,
    ) -> Self {
        Self::ContractNamedKey {
            key: Key::Hash(contract_hash),
            dictionary_name: dictionary_name.into(),
            dictionary_item_key: dictionary_item_key.into(),
        }
    }

    pub fn by_seed_uref(seed_uref: URef, dictionary_item_key: impl Into<String>) -> Self {
        Self::URef {
            seed_uref,
            dictionary_item_key: dictionary_item_key.into(),
        }
    }
}

// ==============================================================================
// Results
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPeersResult {
    pub api_version: String,
    pub peers: Vec<PeerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub node_id: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStateRootHashResult {
    pub api_version: String,
    /// `None` when the node does not know the requested block.
    pub state_root_hash: Option<StateRootHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDeployResult {
    pub api_version: String,
    pub deploy: Deploy,
    #[serde(default)]
    pub execution_results: Vec<ExecutionResultEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResultEntry {
    pub block_hash: BlockHash,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatusResult {
    pub api_version: String,
    pub chainspec_name: String,
    pub starting_state_root_hash: String,
    #[serde(default)]
    pub peers: Vec<PeerEntry>,
    pub last_added_block_info: Option<MinimalBlockInfo>,
    pub our_public_signing_key: Option<PublicKey>,
    #[serde(default)]
    pub round_length: Option<String>,
    #[serde(default)]
    pub next_upgrade: Option<serde_json::Value>,
    pub build_version: String,
    #[serde(default)]
    pub uptime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimalBlockInfo {
    pub hash: BlockHash,
    pub timestamp: String,
    pub era_id: u64,
    pub height: u64,
    pub state_root_hash: StateRootHash,
    pub creator: PublicKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBlockResult {
    pub api_version: String,
    pub block: Option<JsonBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBlock {
    pub hash: BlockHash,
    pub header: JsonBlockHeader,
    pub body: JsonBlockBody,
    #[serde(default)]
    pub proofs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBlockHeader {
    pub parent_hash: BlockHash,
    pub state_root_hash: StateRootHash,
    pub body_hash: Digest,
    pub random_bit: bool,
    pub accumulated_seed: Digest,
    /// Present only on switch blocks.
    pub era_end: Option<serde_json::Value>,
    pub timestamp: String,
    pub era_id: u64,
    pub height: u64,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBlockBody {
    pub proposer: PublicKey,
    pub deploy_hashes: Vec<DeployHash>,
    pub transfer_hashes: Vec<DeployHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBlockTransfersResult {
    pub api_version: String,
    pub block_hash: Option<BlockHash>,
    pub transfers: Option<Vec<Transfer>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub deploy_hash: DeployHash,
    pub from: AccountHash,
    pub to: Option<AccountHash>,
    pub source: URef,
    pub target: URef,
    /// U512 in decimal.
    pub amount: String,
    pub gas: String,
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBalanceResult {
    pub api_version: String,
    /// Motes as a decimal U512 string.
    pub balance_value: String,
    pub merkle_proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountInfoResult {
    pub api_version: String,
    pub account: Account,
    pub merkle_proof: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_hash: AccountHash,
    pub named_keys: Vec<NamedKey>,
    pub main_purse: URef,
    pub associated_keys: Vec<AssociatedKey>,
    pub action_thresholds: ActionThresholds,
}

impl Account {
    pub fn named_key(&self, name: &str) -> Option<&Key> {
        self.named_keys
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedKey {
    pub name: String,
    pub key: Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedKey {
    pub account_hash: AccountHash,
    pub weight: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionThresholds {
    pub deployment: u8,
    pub key_management: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryGlobalStateResult {
    pub api_version: String,
    /// Set when the query was made against a block hash.
    pub block_header: Option<JsonBlockHeader>,
    pub stored_value: StoredValue,
    pub merkle_proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDictionaryItemResult {
    pub api_version: String,
    pub dictionary_key: String,
    pub stored_value: StoredValue,
    pub merkle_proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEraInfoResult {
    pub api_version: String,
    /// `None` unless the targeted block is a switch block.
    pub era_summary: Option<EraSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEraSummaryResult {
    pub api_version: String,
    pub era_summary: EraSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraSummary {
    pub block_hash: BlockHash,
    pub era_id: u64,
    pub stored_value: StoredValue,
    pub state_root_hash: StateRootHash,
    pub merkle_proof: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAuctionInfoResult {
    pub api_version: String,
    pub auction_state: AuctionState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionState {
    pub state_root_hash: StateRootHash,
    pub block_height: u64,
    pub era_validators: Vec<EraValidators>,
    #[serde(default)]
    pub bids: Vec<BidEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraValidators {
    pub era_id: u64,
    pub validator_weights: Vec<ValidatorWeight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorWeight {
    pub public_key: PublicKey,
    pub weight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidEntry {
    pub public_key: PublicKey,
    pub bid: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetValidatorChangesResult {
    pub api_version: String,
    pub changes: Vec<ValidatorChanges>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorChanges {
    pub public_key: PublicKey,
    pub status_changes: Vec<ValidatorStatusChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorStatusChange {
    pub era_id: u64,
    /// e.g. `Added`, `Removed`, `Banned`, `CannotPropose`, `SeenAsFaulty`.
    pub validator_change: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutDeployResult {
    pub api_version: String,
    pub deploy_hash: DeployHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverResult {
    pub api_version: String,
    pub name: String,
    pub schema: serde_json::Value,
}

// ==============================================================================
// Stored Values
// ==============================================================================

/// A value read out of global state.
///
/// Variants the client has no use for beyond display keep the node's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    CLValue(CLValue),
    Account(Account),
    ContractWasm(String),
    Contract(serde_json::Value),
    ContractPackage(serde_json::Value),
    Transfer(Transfer),
    DeployInfo(DeployInfo),
    EraInfo(serde_json::Value),
    Bid(serde_json::Value),
    Withdraw(serde_json::Value),
}

impl StoredValue {
    pub fn as_cl_value(&self) -> Option<&CLValue> {
        match self {
            Self::CLValue(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployInfo {
    pub deploy_hash: DeployHash,
    pub transfers: Vec<Key>,
    pub from: AccountHash,
    pub source: URef,
    pub gas: String,
}
