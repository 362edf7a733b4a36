//! Native JSON-RPC client for Casper node endpoints.
//!
//! Implements [`RpcTransport`](super::RpcTransport) over JSON-RPC 2.0 using
//! `reqwest`, with optional basic auth and optional outbound rate limiting.

mod client;
mod connection;
mod protocol;

pub use client::HttpRpcClient;
