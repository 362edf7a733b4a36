//! Identifier types shared by RPC parameters and results.
//!
//! Hashes, keys, URefs and public keys all travel over the wire as formatted
//! strings. Each type here round-trips through that string form via
//! `Display` / `FromStr` and serializes as a bare JSON string, so the typed
//! client never has to hand-format identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Length in bytes of every hash-like identifier.
pub const DIGEST_LENGTH: usize = 32;

const ACCOUNT_HASH_PREFIX: &str = "account-hash-";
const HASH_PREFIX: &str = "hash-";
const UREF_PREFIX: &str = "uref-";
const TRANSFER_PREFIX: &str = "transfer-";
const DEPLOY_INFO_PREFIX: &str = "deploy-";
const ERA_SUMMARY_PREFIX: &str = "era-summary-";
const ERA_INFO_PREFIX: &str = "era-";
const BALANCE_PREFIX: &str = "balance-";
const BID_PREFIX: &str = "bid-";
const WITHDRAW_PREFIX: &str = "withdraw-";
const DICTIONARY_PREFIX: &str = "dictionary-";

/// Serialize through `Display` and deserialize through `FromStr`.
macro_rules! serde_via_string {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fn decode_hex_array<const N: usize>(input: &str, what: &str) -> Result<[u8; N], CoreError> {
    let bytes = hex::decode(input)
        .map_err(|e| CoreError::InvalidArgument(format!("invalid {what} `{input}`: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CoreError::InvalidArgument(format!("{what} must be {N} bytes, got {len}"))
    })
}

fn strip_prefix<'a>(input: &'a str, prefix: &str, what: &str) -> Result<&'a str, CoreError> {
    input.strip_prefix(prefix).ok_or_else(|| {
        CoreError::InvalidArgument(format!("{what} must start with `{prefix}`, got `{input}`"))
    })
}

// ==============================================================================
// Digests
// ==============================================================================

/// A 32-byte hash, hex-encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    pub const fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }
}

impl From<[u8; DIGEST_LENGTH]> for Digest {
    fn from(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex_array(s, "digest").map(Self)
    }
}

serde_via_string!(Digest);

macro_rules! digest_newtype {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Digest);

        impl $name {
            pub const fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
                Self(Digest::from_bytes(bytes))
            }

            pub fn digest(&self) -> Digest {
                self.0
            }
        }

        impl From<Digest> for $name {
            fn from(digest: Digest) -> Self {
                Self(digest)
            }
        }

        impl From<$name> for Digest {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_hex_array(s, $what).map(|bytes| Self(Digest(bytes)))
            }
        }
    };
}

digest_newtype!(
    /// Hash of a block.
    BlockHash,
    "block hash"
);
digest_newtype!(
    /// Hash of a deploy, as computed by the caller when signing.
    DeployHash,
    "deploy hash"
);
digest_newtype!(
    /// Root of the global state trie after a given block.
    StateRootHash,
    "state root hash"
);

// ==============================================================================
// Block / Global State Identifiers
// ==============================================================================

/// Selects a block either by hash or by height.
///
/// Callers pass `Option<BlockIdentifier>`; `None` leaves the choice of the
/// latest block to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockIdentifier {
    Hash(BlockHash),
    Height(u64),
}

impl From<BlockHash> for BlockIdentifier {
    fn from(hash: BlockHash) -> Self {
        Self::Hash(hash)
    }
}

impl From<u64> for BlockIdentifier {
    fn from(height: u64) -> Self {
        Self::Height(height)
    }
}

/// Hash-length input is a block hash, even when every character is a digit.
/// Shorter all-digit input is a height.
impl FromStr for BlockIdentifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 2 * DIGEST_LENGTH {
            return s.parse().map(Self::Hash);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u64>()
                .map(Self::Height)
                .map_err(|e| CoreError::InvalidArgument(format!("invalid block height `{s}`: {e}")));
        }
        s.parse().map(Self::Hash)
    }
}

/// Selects the global state to query: as of a block, or at a raw state root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalStateIdentifier {
    BlockHash(BlockHash),
    StateRootHash(StateRootHash),
}

impl GlobalStateIdentifier {
    /// Interpret `hash` as a block hash when `is_block_hash` is set, else as a
    /// state root hash.
    pub fn from_hash(hash: Digest, is_block_hash: bool) -> Self {
        if is_block_hash {
            Self::BlockHash(BlockHash(hash))
        } else {
            Self::StateRootHash(StateRootHash(hash))
        }
    }
}

// ==============================================================================
// Account Hash / URef
// ==============================================================================

/// Hash of an account's main public key, formatted `account-hash-<hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountHash(pub Digest);

impl fmt::Display for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ACCOUNT_HASH_PREFIX}{}", self.0)
    }
}

impl FromStr for AccountHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = strip_prefix(s, ACCOUNT_HASH_PREFIX, "account hash")?;
        decode_hex_array(hex, "account hash").map(|bytes| Self(Digest(bytes)))
    }
}

serde_via_string!(AccountHash);

/// The three access bits carried by a [`URef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessRights(u8);

impl AccessRights {
    pub const NONE: Self = Self(0b000);
    pub const READ: Self = Self(0b001);
    pub const WRITE: Self = Self(0b010);
    pub const ADD: Self = Self(0b100);
    pub const READ_ADD_WRITE: Self = Self(0b111);

    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= Self::READ_ADD_WRITE.0).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_readable(self) -> bool {
        self.0 & Self::READ.0 != 0
    }
}

/// Unforgeable reference, formatted `uref-<hex>-<access rights in octal>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct URef {
    addr: Digest,
    access_rights: AccessRights,
}

impl URef {
    pub const fn new(addr: [u8; DIGEST_LENGTH], access_rights: AccessRights) -> Self {
        Self {
            addr: Digest(addr),
            access_rights,
        }
    }

    pub fn addr(&self) -> Digest {
        self.addr
    }

    pub fn access_rights(&self) -> AccessRights {
        self.access_rights
    }
}

impl fmt::Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{UREF_PREFIX}{}-{:03o}",
            self.addr,
            self.access_rights.bits()
        )
    }
}

impl FromStr for URef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = strip_prefix(s, UREF_PREFIX, "uref")?;
        let (addr, rights) = body.rsplit_once('-').ok_or_else(|| {
            CoreError::InvalidArgument(format!("uref `{s}` is missing its access rights suffix"))
        })?;
        let addr = decode_hex_array(addr, "uref address")?;
        let canonical = rights.len() == 3 && rights.bytes().all(|b| (b'0'..=b'7').contains(&b));
        let access_rights = canonical
            .then(|| u8::from_str_radix(rights, 8).ok())
            .flatten()
            .and_then(AccessRights::from_bits)
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!("invalid uref access rights `{rights}`"))
            })?;
        Ok(Self::new(addr, access_rights))
    }
}

serde_via_string!(URef);

// ==============================================================================
// Global State Key
// ==============================================================================

/// Address of a value in global state.
///
/// The formatted string (`account-hash-…`, `hash-…`, `uref-…`, …) is the wire
/// representation; [`Key::kind`] exposes the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Account(AccountHash),
    Hash(Digest),
    URef(URef),
    Transfer(Digest),
    DeployInfo(DeployHash),
    EraInfo(u64),
    Balance(Digest),
    Bid(AccountHash),
    Withdraw(AccountHash),
    Dictionary(Digest),
    EraSummary,
}

impl Key {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Account(_) => "Account",
            Self::Hash(_) => "Hash",
            Self::URef(_) => "URef",
            Self::Transfer(_) => "Transfer",
            Self::DeployInfo(_) => "DeployInfo",
            Self::EraInfo(_) => "EraInfo",
            Self::Balance(_) => "Balance",
            Self::Bid(_) => "Bid",
            Self::Withdraw(_) => "Withdraw",
            Self::Dictionary(_) => "Dictionary",
            Self::EraSummary => "EraSummary",
        }
    }
}

impl From<AccountHash> for Key {
    fn from(account: AccountHash) -> Self {
        Self::Account(account)
    }
}

impl From<URef> for Key {
    fn from(uref: URef) -> Self {
        Self::URef(uref)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(account) => write!(f, "{account}"),
            Self::Hash(addr) => write!(f, "{HASH_PREFIX}{addr}"),
            Self::URef(uref) => write!(f, "{uref}"),
            Self::Transfer(addr) => write!(f, "{TRANSFER_PREFIX}{addr}"),
            Self::DeployInfo(hash) => write!(f, "{DEPLOY_INFO_PREFIX}{hash}"),
            Self::EraInfo(era) => write!(f, "{ERA_INFO_PREFIX}{era}"),
            Self::Balance(addr) => write!(f, "{BALANCE_PREFIX}{addr}"),
            Self::Bid(account) => write!(f, "{BID_PREFIX}{}", account.0),
            Self::Withdraw(account) => write!(f, "{WITHDRAW_PREFIX}{}", account.0),
            Self::Dictionary(addr) => write!(f, "{DICTIONARY_PREFIX}{addr}"),
            Self::EraSummary => write!(f, "{ERA_SUMMARY_PREFIX}{}", Digest::default()),
        }
    }
}

impl FromStr for Key {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Longer prefixes first: `account-hash-` contains `hash-`, and
        // `era-summary-` starts with `era-`.
        if s.starts_with(ACCOUNT_HASH_PREFIX) {
            return s.parse().map(Self::Account);
        }
        if let Some(hex) = s.strip_prefix(HASH_PREFIX) {
            return hex.parse().map(Self::Hash);
        }
        if s.starts_with(UREF_PREFIX) {
            return s.parse().map(Self::URef);
        }
        if let Some(hex) = s.strip_prefix(TRANSFER_PREFIX) {
            return hex.parse().map(Self::Transfer);
        }
        if let Some(hex) = s.strip_prefix(DEPLOY_INFO_PREFIX) {
            return hex.parse().map(Self::DeployInfo);
        }
        if let Some(hex) = s.strip_prefix(ERA_SUMMARY_PREFIX) {
            let addr: Digest = hex.parse()?;
            if addr != Digest::default() {
                return Err(CoreError::InvalidArgument(format!(
                    "era summary key must use the all-zero address, got `{s}`"
                )));
            }
            return Ok(Self::EraSummary);
        }
        if let Some(era) = s.strip_prefix(ERA_INFO_PREFIX) {
            return era
                .parse()
                .map(Self::EraInfo)
                .map_err(|e| CoreError::InvalidArgument(format!("invalid era id `{era}`: {e}")));
        }
        if let Some(hex) = s.strip_prefix(BALANCE_PREFIX) {
            return hex.parse().map(Self::Balance);
        }
        if let Some(hex) = s.strip_prefix(BID_PREFIX) {
            return hex.parse().map(|digest| Self::Bid(AccountHash(digest)));
        }
        if let Some(hex) = s.strip_prefix(WITHDRAW_PREFIX) {
            return hex.parse().map(|digest| Self::Withdraw(AccountHash(digest)));
        }
        if let Some(hex) = s.strip_prefix(DICTIONARY_PREFIX) {
            return hex.parse().map(Self::Dictionary);
        }
        Err(CoreError::InvalidArgument(format!(
            "unrecognized global state key `{s}`"
        )))
    }
}

serde_via_string!(Key);

/// Address of a single dictionary item, formatted `dictionary-<hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictionaryAddr(pub Digest);

impl From<DictionaryAddr> for Key {
    fn from(addr: DictionaryAddr) -> Self {
        Self::Dictionary(addr.0)
    }
}

impl fmt::Display for DictionaryAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DICTIONARY_PREFIX}{}", self.0)
    }
}

impl FromStr for DictionaryAddr {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strip_prefix(s, DICTIONARY_PREFIX, "dictionary address")?
            .parse()
            .map(Self)
    }
}

serde_via_string!(DictionaryAddr);

// ==============================================================================
// Public Keys / Signatures
// ==============================================================================

const SYSTEM_TAG: u8 = 0;
const ED25519_TAG: u8 = 1;
const SECP256K1_TAG: u8 = 2;

/// A tagged public key: `00` (system), `01…` (ed25519), `02…` (secp256k1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKey {
    System,
    Ed25519([u8; 32]),
    Secp256k1([u8; 33]),
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "{SYSTEM_TAG:02x}"),
            Self::Ed25519(bytes) => write!(f, "{ED25519_TAG:02x}{}", hex::encode(bytes)),
            Self::Secp256k1(bytes) => write!(f, "{SECP256K1_TAG:02x}{}", hex::encode(bytes)),
        }
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|e| CoreError::InvalidArgument(format!("invalid public key `{s}`: {e}")))?;
        let (tag, key) = bytes
            .split_first()
            .ok_or_else(|| CoreError::InvalidArgument("empty public key".to_owned()))?;
        let bad_length = || {
            CoreError::InvalidArgument(format!(
                "public key with tag {tag:02x} has wrong length {}",
                key.len()
            ))
        };
        match *tag {
            SYSTEM_TAG if key.is_empty() => Ok(Self::System),
            SYSTEM_TAG => Err(bad_length()),
            ED25519_TAG => <[u8; 32]>::try_from(key)
                .map(Self::Ed25519)
                .map_err(|_| bad_length()),
            SECP256K1_TAG => <[u8; 33]>::try_from(key)
                .map(Self::Secp256k1)
                .map_err(|_| bad_length()),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown public key tag {other:02x}"
            ))),
        }
    }
}

serde_via_string!(PublicKey);

/// A tagged signature over a deploy hash, produced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    Ed25519([u8; 64]),
    Secp256k1([u8; 64]),
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(bytes) => write!(f, "{ED25519_TAG:02x}{}", hex::encode(bytes)),
            Self::Secp256k1(bytes) => write!(f, "{SECP256K1_TAG:02x}{}", hex::encode(bytes)),
        }
    }
}

impl FromStr for Signature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|e| CoreError::InvalidArgument(format!("invalid signature `{s}`: {e}")))?;
        let (tag, sig) = bytes
            .split_first()
            .ok_or_else(|| CoreError::InvalidArgument("empty signature".to_owned()))?;
        let sig = <[u8; 64]>::try_from(sig).map_err(|_| {
            CoreError::InvalidArgument(format!("signature has wrong length {}", sig.len()))
        })?;
        match *tag {
            ED25519_TAG => Ok(Self::Ed25519(sig)),
            SECP256K1_TAG => Ok(Self::Secp256k1(sig)),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown signature tag {other:02x}"
            ))),
        }
    }
}

serde_via_string!(Signature);
