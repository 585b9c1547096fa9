//! Blockchain Registration Model
//!
//! Represents a registered blockchain network and its RPC endpoints.

use std::fmt;
use std::str::FromStr;

/// Kind of blockchain network this service knows how to ingest from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    Evm,
    Megachain,
}

impl ChainKind {
    /// Wire/storage tag for this kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::Megachain => "megachain",
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a chain-type tag is not recognized.
///
/// A registration row carrying an unknown tag is a configuration fault; the
/// ingestion code has no adapter for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported blockchain type: {0}")]
pub struct UnsupportedChainKind(pub String);

impl FromStr for ChainKind {
    type Err = UnsupportedChainKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evm" => Ok(Self::Evm),
            "megachain" => Ok(Self::Megachain),
            other => Err(UnsupportedChainKind(other.to_string())),
        }
    }
}

/// Data required to register a new blockchain
#[derive(Debug, Clone)]
pub struct RegisterBlockchainData {
    pub kind: ChainKind,
    pub name: String,
    pub chain_id: String,
}

/// A registered blockchain network.
///
/// Registered once, immutable thereafter; `(kind, chain_id)` is unique.
#[derive(Debug, Clone)]
pub struct Blockchain {
    id: i32,
    kind: ChainKind,
    name: String,
    chain_id: String,
}

impl Blockchain {
    /// Restore a Blockchain from persisted data
    #[must_use]
    pub fn restore(id: i32, kind: ChainKind, name: String, chain_id: String) -> Self {
        Self {
            id,
            kind,
            name,
            chain_id,
        }
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

/// A remote URL registered for fetching chain data.
///
/// Append-only; removed only via cascading delete of the owning registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub id: i32,
    pub blockchain_id: i32,
    pub url: String,
}
