//! Remote Wire Payloads
//!
//! Typed shapes of the JSON returned by remote chain nodes. Payloads are
//! decoded once, at the ingestion boundary; anything that does not fit these
//! shapes is a format error before it reaches the entity model.

use serde::Deserialize;

/// Megachain block payload from `GET {endpoint}/blocks/{chainId}/height/{height}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MegachainBlockPayload {
    /// Hex-encoded 32-byte block identifier
    pub rid: String,
    #[serde(rename = "prevBlockRID")]
    pub prev_block_rid: String,
    /// Hex-encoded binary witness blob
    pub witness: String,
    #[serde(default)]
    pub block_number: Option<i64>,
    pub height: i64,
    pub timestamp: i64,
    #[serde(default)]
    pub transactions: Vec<TransactionPayload>,
    /// Hex-encoded compressed public keys of the block's witnesses
    #[serde(default)]
    pub witnesses: Vec<String>,
}

/// Transaction entry inside a Megachain block payload
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPayload {
    pub id: String,
    pub hash: String,
}

/// EVM block payload; quantities are hex strings per the JSON-RPC convention
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmBlockPayload {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    pub nonce: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub transactions: Vec<String>,
}

/// One element of `GET {endpoint}/blocks/{chainId}?limit=1`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSummaryPayload {
    pub height: i64,
}
