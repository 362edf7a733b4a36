pub mod client;
pub mod deploy;
pub mod error;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;

pub use client::CasperClient;
pub use deploy::Deploy;
pub use error::{CoreError, RpcError};
pub use types::{BlockIdentifier, Key, StateRootHash};
