mod cli;

use std::sync::Arc;

use clap::Parser;
use eyre::{bail, eyre, WrapErr};
use serde::Serialize;

use casper_rpc_core::rpc::HttpRpcClient;
use casper_rpc_core::types::Key;
use casper_rpc_core::{CasperClient, CoreError, Deploy};

use cli::{Command, DictionaryTarget};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // stdout carries the JSON result only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let transport = HttpRpcClient::new(
        &args.node_address,
        args.rpc_user.as_deref(),
        args.rpc_pass.as_deref(),
        args.requests_per_second,
    )
    .context("configure node RPC transport")?;
    tracing::debug!(endpoint = %transport.url(), "using node endpoint");
    let client = CasperClient::new(Arc::new(transport));

    let output = execute(&client, args.command).await.map_err(|err| {
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Rpc(source)) => {
                let message = format_rpc_error(&args.node_address, &source.to_string());
                eyre!(message).wrap_err("while calling the node JSON-RPC API")
            }
            _ => err,
        }
    })?;

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render result as JSON")?
    );
    Ok(())
}

async fn execute(client: &CasperClient, command: Command) -> eyre::Result<serde_json::Value> {
    match command {
        Command::Peers => to_json(client.get_peers().await?),
        Command::Status => to_json(client.get_status().await?),
        Command::StateRootHash(block) => to_json(client.get_state_root_hash(block.block_id).await?),
        Command::Block(block) => to_json(client.get_block(block.block_id).await?),
        Command::BlockTransfers(block) => {
            to_json(client.get_block_transfers(block.block_id).await?)
        }
        Command::Deploy {
            deploy_hash,
            finalized_approvals,
        } => to_json(client.get_deploy(deploy_hash, finalized_approvals).await?),
        Command::Balance {
            purse_uref,
            state_root_hash,
        } => to_json(client.get_balance(purse_uref, state_root_hash).await?),
        Command::Account { public_key, block } => {
            to_json(client.get_account_info(public_key, block.block_id).await?)
        }
        Command::Query { key, state, path } => {
            let (hash, is_block_hash) = state
                .hash()
                .ok_or_else(|| eyre!("either --state-root-hash or --block-hash is required"))?;
            to_json(
                client
                    .query_global_state(key, hash, is_block_hash, &path)
                    .await?,
            )
        }
        Command::DictionaryItem {
            state_root_hash,
            target,
        } => {
            let result = match target {
                DictionaryTarget::Key { dictionary_key } => {
                    let Key::Dictionary(addr) = dictionary_key else {
                        bail!(
                            "expected a dictionary key, got {} key `{dictionary_key}`",
                            dictionary_key.kind()
                        );
                    };
                    client.get_dictionary_item(addr, state_root_hash).await?
                }
                DictionaryTarget::Account {
                    account_hash,
                    dictionary_name,
                    item_key,
                } => {
                    client
                        .get_dictionary_item_by_account(
                            account_hash,
                            &dictionary_name,
                            &item_key,
                            state_root_hash,
                        )
                        .await?
                }
                DictionaryTarget::Contract {
                    contract_hash,
                    dictionary_name,
                    item_key,
                } => {
                    client
                        .get_dictionary_item_by_contract(
                            contract_hash,
                            &dictionary_name,
                            &item_key,
                            state_root_hash,
                        )
                        .await?
                }
                DictionaryTarget::Uref {
                    seed_uref,
                    item_key,
                } => {
                    client
                        .get_dictionary_item_by_uref(seed_uref, &item_key, state_root_hash)
                        .await?
                }
            };
            to_json(result)
        }
        Command::EraInfo(block) => {
            to_json(client.get_era_info_by_switch_block(block.block_id).await?)
        }
        Command::EraSummary(block) => to_json(client.get_era_summary(block.block_id).await?),
        Command::AuctionInfo(block) => to_json(client.get_auction_info(block.block_id).await?),
        Command::ValidatorChanges => to_json(client.get_validator_changes().await?),
        Command::PutDeploy { path } => {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("read deploy file {}", path.display()))?;
            let deploy: Deploy = serde_json::from_str(&contents)
                .with_context(|| format!("parse deploy JSON in {}", path.display()))?;
            let result = client.put_deploy(&deploy).await?;
            tracing::info!(deploy_hash = %result.deploy_hash, "deploy accepted by node");
            to_json(result)
        }
        Command::Discover => to_json(client.discover().await?),
    }
}

fn to_json<T: Serialize>(value: T) -> eyre::Result<serde_json::Value> {
    serde_json::to_value(value).context("encode result")
}

fn format_rpc_error(node_address: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("request to node `{node_address}` failed"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("Could not resolve host") {
        lines.push(
            "hint: hostname resolution failed; verify the node address and your DNS/network"
                .into(),
        );
    } else if source_error.contains("tls")
        || source_error.contains("certificate")
        || source_error.contains("SSL")
    {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the node serves HTTPS"
                .into(),
        );
    } else if source_error.contains("HTTP status 401") || source_error.contains("HTTP status 403")
    {
        lines.push("hint: authentication failed; verify --rpc-user/--rpc-pass".into());
    } else if source_error.contains("HTTP status 404") {
        lines.push(
            "hint: endpoint path is invalid; the node serves JSON-RPC under `/rpc` on port 7777"
                .into(),
        );
    } else if source_error.contains("-32601") {
        lines.push("hint: method not found; the node may run an older API version".into());
    } else if source_error.contains("error sending request for url") {
        lines.push(
            "hint: request could not be sent; verify the node address and that its RPC port is reachable"
                .into(),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_hints_point_at_the_likely_cause() {
        let message = format_rpc_error(
            "http://127.0.0.1:7777/rpc",
            "HTTP status 404: Not Found",
        );
        assert!(message.starts_with("request to node `http://127.0.0.1:7777/rpc` failed"));
        assert!(message.contains("`/rpc`"));

        let message = format_rpc_error(
            "http://127.0.0.1:7777/rpc",
            "node returned JSON-RPC error -32601: Method not found",
        );
        assert!(message.contains("older API version"));
    }

    #[test]
    fn unrecognized_errors_get_no_hint() {
        let message = format_rpc_error(
            "http://127.0.0.1:7777/rpc",
            "invalid RPC response: missing result",
        );
        assert_eq!(message.lines().count(), 2);
    }
}
