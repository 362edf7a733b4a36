use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use casper_rpc_core::types::{
    AccountHash, BlockIdentifier, DeployHash, Digest, Key, PublicKey, StateRootHash, URef,
};

/// casper-rpc: query a Casper node over JSON-RPC and submit signed deploys.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node JSON-RPC endpoint.
    #[arg(
        long,
        default_value = "http://127.0.0.1:7777/rpc",
        env = "CASPER_NODE_ADDRESS"
    )]
    pub node_address: String,

    /// Basic-auth username, for nodes behind an authenticating proxy.
    #[arg(long, env = "CASPER_RPC_USER")]
    pub rpc_user: Option<String>,

    /// Basic-auth password, for nodes behind an authenticating proxy.
    #[arg(long, env = "CASPER_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Limit outbound requests per second.
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Peers the node is connected to.
    Peers,

    /// Node status: chain name, tip, build version.
    Status,

    /// State root hash as of a block.
    StateRootHash(BlockArg),

    /// A block with its header and body.
    Block(BlockArg),

    /// Native transfers executed in a block.
    BlockTransfers(BlockArg),

    /// A deploy and its execution results.
    Deploy {
        deploy_hash: DeployHash,

        /// Return the approvals the network finalized instead of the
        /// originally received ones.
        #[arg(long)]
        finalized_approvals: bool,
    },

    /// Balance of a purse.
    Balance {
        /// Purse URef, `uref-<hex>-<rights>`.
        purse_uref: URef,

        /// Latest state root hash when omitted.
        #[arg(long)]
        state_root_hash: Option<StateRootHash>,
    },

    /// Account stored under a public key.
    Account {
        public_key: PublicKey,

        #[command(flatten)]
        block: BlockArg,
    },

    /// Query a global state key, optionally descending through named keys.
    Query {
        /// Formatted key, e.g. `account-hash-<hex>` or `hash-<hex>`.
        key: Key,

        #[command(flatten)]
        state: StateArg,

        /// Named-key path below the key, separated by `/`.
        #[arg(long, value_delimiter = '/')]
        path: Vec<String>,
    },

    /// Read a dictionary item.
    DictionaryItem {
        /// Latest state root hash when omitted.
        #[arg(long)]
        state_root_hash: Option<StateRootHash>,

        #[command(subcommand)]
        target: DictionaryTarget,
    },

    /// Era summary stored by a switch block; empty for other blocks.
    EraInfo(BlockArg),

    /// Era summary as of any block.
    EraSummary(BlockArg),

    /// Validator weights and bids.
    AuctionInfo(BlockArg),

    /// Validator status changes the node has observed.
    ValidatorChanges,

    /// Submit a signed deploy read from a JSON file.
    PutDeploy { path: PathBuf },

    /// The node's OpenRPC schema.
    Discover,
}

#[derive(Args)]
pub struct BlockArg {
    /// Block hash or height; latest block when omitted.
    #[arg(long = "block-id")]
    pub block_id: Option<BlockIdentifier>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct StateArg {
    /// Query the state as of this state root hash.
    #[arg(long)]
    pub state_root_hash: Option<Digest>,

    /// Query the state as of this block hash.
    #[arg(long)]
    pub block_hash: Option<Digest>,
}

impl StateArg {
    /// `(hash, is_block_hash)`, or `None` if neither flag was given.
    pub fn hash(&self) -> Option<(Digest, bool)> {
        match (self.block_hash, self.state_root_hash) {
            (Some(hash), _) => Some((hash, true)),
            (None, Some(hash)) => Some((hash, false)),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum DictionaryTarget {
    /// By the item's own `dictionary-<hex>` key.
    Key { dictionary_key: Key },

    /// By a dictionary in an account's named keys.
    Account {
        account_hash: AccountHash,
        dictionary_name: String,
        item_key: String,
    },

    /// By a dictionary in a contract's named keys.
    Contract {
        /// Contract hash as plain hex.
        contract_hash: Digest,
        dictionary_name: String,
        item_key: String,
    },

    /// By the dictionary's seed URef.
    Uref { seed_uref: URef, item_key: String },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn block_id_accepts_height_and_hash() {
        let cli = Cli::try_parse_from(["casper-rpc", "block", "--block-id", "1200"])
            .expect("height must parse");
        let Command::Block(block) = cli.command else {
            panic!("expected block command");
        };
        assert_eq!(block.block_id, Some(BlockIdentifier::Height(1200)));

        let hash = "ab".repeat(32);
        let cli = Cli::try_parse_from(["casper-rpc", "state-root-hash", "--block-id", &hash])
            .expect("hash must parse");
        let Command::StateRootHash(block) = cli.command else {
            panic!("expected state-root-hash command");
        };
        assert!(matches!(block.block_id, Some(BlockIdentifier::Hash(_))));
    }

    #[test]
    fn query_requires_exactly_one_state_selector() {
        let key = format!("hash-{}", "01".repeat(32));
        let root = "02".repeat(32);

        assert!(Cli::try_parse_from(["casper-rpc", "query", &key]).is_err());
        assert!(Cli::try_parse_from([
            "casper-rpc",
            "query",
            &key,
            "--state-root-hash",
            &root,
            "--block-hash",
            &root,
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "casper-rpc",
            "query",
            &key,
            "--block-hash",
            &root,
            "--path",
            "counter/count",
        ])
        .expect("query must parse");
        let Command::Query { state, path, .. } = cli.command else {
            panic!("expected query command");
        };
        let (_, is_block_hash) = state.hash().expect("selector present");
        assert!(is_block_hash);
        assert_eq!(path, vec!["counter".to_owned(), "count".to_owned()]);
    }

    #[test]
    fn dictionary_item_by_seed_uref() {
        let uref = format!("uref-{}-007", "03".repeat(32));
        let cli = Cli::try_parse_from([
            "casper-rpc",
            "dictionary-item",
            "uref",
            &uref,
            "item-1",
        ])
        .expect("dictionary item must parse");
        let Command::DictionaryItem {
            state_root_hash,
            target,
        } = cli.command
        else {
            panic!("expected dictionary-item command");
        };
        assert!(state_root_hash.is_none());
        assert!(matches!(target, DictionaryTarget::Uref { item_key, .. } if item_key == "item-1"));
    }

    #[test]
    fn malformed_identifiers_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["casper-rpc", "balance", "uref-zz-007"]).is_err());
        assert!(Cli::try_parse_from(["casper-rpc", "account", "03abcd"]).is_err());
    }
}
