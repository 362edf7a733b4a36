//! Shared test helpers for `casper-rpc-core` unit tests.
//!
//! Deterministic identifiers built from a single repeated byte, a sample
//! signed deploy, and canned node responses, so tests across modules share
//! one source of dummy data.

use crate::deploy::{Approval, CLValue, Deploy, DeployHeader, ExecutableDeployItem, NamedArg, RuntimeArgs};
use crate::types::{
    AccessRights, AccountHash, BlockHash, DeployHash, Digest, PublicKey, Signature, StateRootHash,
    URef,
};

// ==============================================================================
// Identifier Helpers
// ==============================================================================

pub fn digest_from_byte(b: u8) -> Digest {
    Digest::from_bytes([b; 32])
}

pub fn block_hash_from_byte(b: u8) -> BlockHash {
    BlockHash(digest_from_byte(b))
}

pub fn state_root_hash_from_byte(b: u8) -> StateRootHash {
    StateRootHash(digest_from_byte(b))
}

pub fn account_hash_from_byte(b: u8) -> AccountHash {
    AccountHash(digest_from_byte(b))
}

pub fn uref_from_byte(b: u8) -> URef {
    URef::new([b; 32], AccessRights::READ_ADD_WRITE)
}

pub fn sample_public_key() -> PublicKey {
    PublicKey::Ed25519([0xaa; 32])
}

// ==============================================================================
// Deploy Builders
// ==============================================================================

fn motes_arg(name: &str, motes: &str) -> NamedArg {
    NamedArg(
        name.to_owned(),
        CLValue {
            cl_type: serde_json::json!("U512"),
            // Length-prefixed little-endian U512; content is irrelevant here.
            bytes: "0400f90295".to_owned(),
            parsed: serde_json::json!(motes),
        },
    )
}

/// A native-transfer deploy carrying `approvals` dummy signatures.
pub fn sample_deploy(approvals: usize) -> Deploy {
    let signer = sample_public_key();
    Deploy {
        hash: DeployHash(digest_from_byte(0x42)),
        header: DeployHeader {
            account: signer,
            timestamp: "2021-06-28T15:55:25.335Z".to_owned(),
            ttl: "30m".to_owned(),
            gas_price: 1,
            body_hash: digest_from_byte(0x43),
            dependencies: Vec::new(),
            chain_name: "casper-test".to_owned(),
        },
        payment: ExecutableDeployItem::ModuleBytes {
            module_bytes: String::new(),
            args: RuntimeArgs(vec![motes_arg("amount", "2500000000")]),
        },
        session: ExecutableDeployItem::Transfer {
            args: RuntimeArgs(vec![motes_arg("amount", "5000000000")]),
        },
        approvals: (0..approvals)
            .map(|i| Approval {
                signer,
                signature: Signature::Ed25519([i as u8; 64]),
            })
            .collect(),
    }
}

// ==============================================================================
// Canned Node Responses
// ==============================================================================

pub fn state_root_hash_response(hash: StateRootHash) -> serde_json::Value {
    serde_json::json!({ "api_version": "1.5.6", "state_root_hash": hash.to_string() })
}

pub fn balance_response(balance: &str) -> serde_json::Value {
    serde_json::json!({
        "api_version": "1.5.6",
        "balance_value": balance,
        "merkle_proof": "01000000"
    })
}

pub fn dictionary_item_response() -> serde_json::Value {
    serde_json::json!({
        "api_version": "1.5.6",
        "dictionary_key": format!("dictionary-{}", "0d".repeat(32)),
        "stored_value": {
            "CLValue": { "cl_type": "String", "bytes": "0500000068656c6c6f", "parsed": "hello" }
        },
        "merkle_proof": "01000000"
    })
}

pub fn query_global_state_response() -> serde_json::Value {
    serde_json::json!({
        "api_version": "1.5.6",
        "block_header": null,
        "stored_value": {
            "CLValue": { "cl_type": "I32", "bytes": "01000000", "parsed": 1 }
        },
        "merkle_proof": "01000000"
    })
}
