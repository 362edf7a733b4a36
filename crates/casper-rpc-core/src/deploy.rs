//! Signed deploys as submitted through `account_put_deploy`.
//!
//! Hashing and signing happen before a [`Deploy`] reaches this crate; the
//! types here only carry the already-signed JSON shape to and from the node.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DeployHash, Digest, PublicKey, Signature};

// ==============================================================================
// Deploy
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deploy {
    pub hash: DeployHash,
    pub header: DeployHeader,
    pub payment: ExecutableDeployItem,
    pub session: ExecutableDeployItem,
    pub approvals: Vec<Approval>,
}

impl Deploy {
    /// Fails with `InvalidArgument` unless the deploy carries at least one
    /// approval. The node rejects unsigned deploys, so this is checked before
    /// any request is sent.
    pub fn ensure_approved(&self) -> Result<(), CoreError> {
        if self.approvals.is_empty() {
            return Err(CoreError::InvalidArgument(format!(
                "deploy {} has no approvals; sign it before submitting",
                self.hash
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployHeader {
    pub account: PublicKey,
    /// RFC 3339 timestamp, e.g. `2021-06-28T15:55:25.335Z`.
    pub timestamp: String,
    /// Human-readable duration, e.g. `30m`.
    pub ttl: String,
    pub gas_price: u64,
    pub body_hash: Digest,
    pub dependencies: Vec<DeployHash>,
    pub chain_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

// ==============================================================================
// Executable Items
// ==============================================================================

/// Payment or session code of a deploy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutableDeployItem {
    ModuleBytes {
        /// Hex-encoded wasm; empty for the standard payment.
        module_bytes: String,
        args: RuntimeArgs,
    },
    StoredContractByHash {
        hash: String,
        entry_point: String,
        args: RuntimeArgs,
    },
    StoredContractByName {
        name: String,
        entry_point: String,
        args: RuntimeArgs,
    },
    StoredVersionedContractByHash {
        hash: String,
        version: Option<u32>,
        entry_point: String,
        args: RuntimeArgs,
    },
    StoredVersionedContractByName {
        name: String,
        version: Option<u32>,
        entry_point: String,
        args: RuntimeArgs,
    },
    Transfer {
        args: RuntimeArgs,
    },
}

impl ExecutableDeployItem {
    pub fn args(&self) -> &RuntimeArgs {
        match self {
            Self::ModuleBytes { args, .. }
            | Self::StoredContractByHash { args, .. }
            | Self::StoredContractByName { args, .. }
            | Self::StoredVersionedContractByHash { args, .. }
            | Self::StoredVersionedContractByName { args, .. }
            | Self::Transfer { args } => args,
        }
    }
}

/// Ordered named arguments, encoded as `[[name, clvalue], ...]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeArgs(pub Vec<NamedArg>);

impl RuntimeArgs {
    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0
            .iter()
            .find(|arg| arg.0 == name)
            .map(|arg| &arg.1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArg(pub String, pub CLValue);

/// A serialized CL value: its type, its bytesrepr encoding as hex, and the
/// node's best-effort JSON rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CLValue {
    pub cl_type: serde_json::Value,
    pub bytes: String,
    #[serde(default)]
    pub parsed: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn ensure_approved_rejects_unsigned_deploy() {
        let deploy = sample_deploy(0);
        let err = deploy.ensure_approved().expect_err("unsigned deploy must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        assert!(err.to_string().contains("no approvals"));

        sample_deploy(1)
            .ensure_approved()
            .expect("signed deploy must pass");
    }

    #[test]
    fn executable_item_wire_shape() {
        let deploy = sample_deploy(1);
        let json = serde_json::to_value(&deploy).expect("serialize");

        let payment = &json["payment"]["ModuleBytes"];
        assert_eq!(payment["module_bytes"], "");
        assert_eq!(payment["args"][0][0], "amount");
        assert_eq!(payment["args"][0][1]["cl_type"], "U512");

        let session = &json["session"]["Transfer"];
        assert_eq!(session["args"][0][0], "amount");
        assert!(json["approvals"][0]["signer"].is_string());
    }

    #[test]
    fn runtime_args_lookup() {
        let deploy = sample_deploy(1);
        let amount = deploy
            .payment
            .args()
            .get("amount")
            .expect("payment must carry amount");
        assert_eq!(amount.parsed, serde_json::json!("2500000000"));
        assert!(deploy.session.args().get("missing").is_none());
    }

    #[test]
    fn deploy_decodes_node_json() {
        let account = format!("01{}", "aa".repeat(32));
        let json = serde_json::json!({
            "hash": "01".repeat(32),
            "header": {
                "account": account,
                "timestamp": "2021-06-28T15:55:25.335Z",
                "ttl": "30m",
                "gas_price": 1,
                "body_hash": "02".repeat(32),
                "dependencies": [],
                "chain_name": "casper-test"
            },
            "payment": {
                "ModuleBytes": { "module_bytes": "", "args": [] }
            },
            "session": {
                "StoredContractByName": {
                    "name": "faucet",
                    "entry_point": "call_faucet",
                    "args": [["target", { "cl_type": "PublicKey", "bytes": account, "parsed": account }]]
                }
            },
            "approvals": [
                { "signer": account, "signature": format!("01{}", "ee".repeat(64)) }
            ]
        });

        let deploy: Deploy = serde_json::from_value(json).expect("decode");
        assert_eq!(deploy.header.chain_name, "casper-test");
        assert_eq!(deploy.approvals.len(), 1);
        assert!(matches!(
            &deploy.session,
            ExecutableDeployItem::StoredContractByName { entry_point, .. } if entry_point == "call_faucet"
        ));
    }
}
