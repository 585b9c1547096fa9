//! Block Entity Model
//!
//! Polymorphic block and transaction representations: one variant per chain
//! kind, with the shared fields reachable through the common accessors. A
//! block is built transiently from a remote payload, validated, persisted at
//! most once, and never mutated afterwards.

use thiserror::Error;

use crate::domain::models::blockchain::ChainKind;
use crate::domain::models::payload::{EvmBlockPayload, MegachainBlockPayload, TransactionPayload};
use crate::domain::models::witness::{verify_block_witness, Witness};
use crate::shared::errors::IngestError;

/// Length of a Megachain block identifier
pub const BLOCK_RID_LEN: usize = 32;

/// Failure to turn a raw wire payload into a typed entity
#[derive(Debug, Error)]
pub enum BlockDecodeError {
    #[error("Malformed block payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Field {field} is not valid hex: {source}")]
    Hex {
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("Field {field} is not a valid hex quantity")]
    Quantity { field: &'static str },

    #[error("Unsupported blockchain type for this entity: {0}")]
    Unsupported(ChainKind),
}

impl From<BlockDecodeError> for IngestError {
    fn from(err: BlockDecodeError) -> Self {
        match err {
            BlockDecodeError::Unsupported(_) => IngestError::Configuration(err.to_string()),
            other => IngestError::Format(other.to_string()),
        }
    }
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, BlockDecodeError> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(trimmed).map_err(|source| BlockDecodeError::Hex { field, source })
}

fn decode_quantity(field: &'static str, value: &str) -> Result<u64, BlockDecodeError> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(trimmed, 16).map_err(|_| BlockDecodeError::Quantity { field })
}

/// A transaction recorded inside a Megachain block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegachainTransaction {
    pub id: String,
    pub hash: String,
}

/// Chain-specific transaction variants behind a shared shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Megachain(MegachainTransaction),
}

impl Transaction {
    /// Build a transaction of the given kind from a raw wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`BlockDecodeError::Unsupported`] for kinds without a
    /// transaction model and [`BlockDecodeError::Json`] for payloads that do
    /// not fit the kind's shape.
    pub fn from_wire(kind: ChainKind, raw: serde_json::Value) -> Result<Self, BlockDecodeError> {
        match kind {
            ChainKind::Megachain => {
                let payload: TransactionPayload = serde_json::from_value(raw)?;
                Ok(Self::Megachain(MegachainTransaction {
                    id: payload.id,
                    hash: payload.hash,
                }))
            }
            other => Err(BlockDecodeError::Unsupported(other)),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Megachain(tx) => &tx.id,
        }
    }

    #[must_use]
    pub fn hash(&self) -> &str {
        match self {
            Self::Megachain(tx) => &tx.hash,
        }
    }
}

/// A block from an EVM-style chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmBlock {
    pub chain_id: String,
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub nonce: String,
    pub timestamp: i64,
    pub transaction_hashes: Vec<String>,
}

impl EvmBlock {
    fn from_payload(chain_id: &str, payload: EvmBlockPayload) -> Result<Self, BlockDecodeError> {
        let number = decode_quantity("number", &payload.number)?;
        let timestamp = match payload.timestamp.as_deref() {
            Some(raw) => decode_quantity("timestamp", raw)? as i64,
            None => 0,
        };
        Ok(Self {
            chain_id: chain_id.to_string(),
            number,
            hash: payload.hash,
            parent_hash: payload.parent_hash,
            nonce: payload.nonce,
            timestamp,
            transaction_hashes: payload.transactions,
        })
    }
}

/// A block from a Megachain network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegachainBlock {
    pub chain_id: String,
    pub height: i64,
    pub timestamp: i64,
    /// 32-byte content identifier; the signed digest of the block
    pub rid: Vec<u8>,
    pub prev_block_rid: Vec<u8>,
    /// Raw witness blob as received from the node
    pub witness: Vec<u8>,
    pub transactions: Vec<MegachainTransaction>,
    pub witnesses: Vec<Witness>,
}

impl MegachainBlock {
    fn from_payload(
        chain_id: &str,
        payload: MegachainBlockPayload,
    ) -> Result<Self, BlockDecodeError> {
        let rid = decode_hex("rid", &payload.rid)?;
        let prev_block_rid = decode_hex("prevBlockRID", &payload.prev_block_rid)?;
        let witness = decode_hex("witness", &payload.witness)?;

        let transactions = payload
            .transactions
            .into_iter()
            .map(|tx| MegachainTransaction {
                id: tx.id,
                hash: tx.hash,
            })
            .collect();

        let witnesses = payload
            .witnesses
            .iter()
            .map(|raw| {
                decode_hex("witnesses", raw).map(|public_key| Witness { public_key })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            chain_id: chain_id.to_string(),
            height: payload.height,
            timestamp: payload.timestamp,
            rid,
            prev_block_rid,
            witness,
            transactions,
            witnesses,
        })
    }

    /// Check the block's authenticity against its own witness blob.
    ///
    /// Pure function of the rid and witness bytes; see
    /// [`verify_block_witness`] for the exact policy.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        verify_block_witness(&self.rid, &self.witness)
    }
}

/// Tagged union over the chain-specific block variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Evm(EvmBlock),
    Megachain(MegachainBlock),
}

impl Block {
    /// Build a block of the given kind from a raw wire payload.
    ///
    /// Single keyed constructor: the tag picks the variant, the payload is
    /// decoded into that variant's typed shape in one step.
    ///
    /// # Errors
    ///
    /// Returns a [`BlockDecodeError`] when the payload does not match the
    /// kind's wire shape or a hex field fails to decode.
    pub fn from_wire(
        kind: ChainKind,
        chain_id: &str,
        raw: serde_json::Value,
    ) -> Result<Self, BlockDecodeError> {
        match kind {
            ChainKind::Evm => {
                let payload: EvmBlockPayload = serde_json::from_value(raw)?;
                Ok(Self::Evm(EvmBlock::from_payload(chain_id, payload)?))
            }
            ChainKind::Megachain => {
                let payload: MegachainBlockPayload = serde_json::from_value(raw)?;
                Ok(Self::Megachain(MegachainBlock::from_payload(
                    chain_id, payload,
                )?))
            }
        }
    }

    #[must_use]
    pub fn chain_id(&self) -> &str {
        match self {
            Self::Evm(block) => &block.chain_id,
            Self::Megachain(block) => &block.chain_id,
        }
    }

    #[must_use]
    pub fn height(&self) -> i64 {
        match self {
            Self::Evm(block) => block.number as i64,
            Self::Megachain(block) => block.height,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Evm(block) => block.timestamp,
            Self::Megachain(block) => block.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn megachain_payload() -> serde_json::Value {
        json!({
            "rid": hex::encode([0xaa; 32]),
            "prevBlockRID": hex::encode([0xbb; 32]),
            "witness": hex::encode(0u32.to_be_bytes()),
            "blockNumber": 42,
            "height": 42,
            "timestamp": 1_700_000_000,
            "transactions": [
                { "id": "tx-1", "hash": "deadbeef" }
            ],
            "witnesses": [hex::encode([0x02; 33])]
        })
    }

    #[test]
    fn builds_megachain_block_from_wire() {
        let block = Block::from_wire(ChainKind::Megachain, "mega-1", megachain_payload()).unwrap();

        let Block::Megachain(block) = block else {
            panic!("expected megachain variant");
        };
        assert_eq!(block.chain_id, "mega-1");
        assert_eq!(block.height, 42);
        assert_eq!(block.timestamp, 1_700_000_000);
        assert_eq!(block.rid, vec![0xaa; 32]);
        assert_eq!(block.prev_block_rid, vec![0xbb; 32]);
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].id, "tx-1");
        assert_eq!(block.witnesses[0].public_key, vec![0x02; 33]);
    }

    #[test]
    fn builds_evm_block_from_wire() {
        let payload = json!({
            "number": "0x1b4",
            "hash": "0xabc",
            "parentHash": "0xdef",
            "nonce": "0x0000000000000042",
            "timestamp": "0x64",
            "transactions": ["0x111", "0x222"]
        });

        let block = Block::from_wire(ChainKind::Evm, "1", payload).unwrap();
        let Block::Evm(block) = block else {
            panic!("expected evm variant");
        };
        assert_eq!(block.number, 436);
        assert_eq!(block.timestamp, 100);
        assert_eq!(block.transaction_hashes.len(), 2);
    }

    #[test]
    fn shared_accessors_cover_both_variants() {
        let block = Block::from_wire(ChainKind::Megachain, "mega-1", megachain_payload()).unwrap();
        assert_eq!(block.chain_id(), "mega-1");
        assert_eq!(block.height(), 42);
        assert_eq!(block.timestamp(), 1_700_000_000);
    }

    #[test]
    fn bad_hex_field_is_a_decode_error() {
        let mut payload = megachain_payload();
        payload["rid"] = json!("not-hex");
        let err = Block::from_wire(ChainKind::Megachain, "mega-1", payload).unwrap_err();
        assert!(matches!(err, BlockDecodeError::Hex { field: "rid", .. }));
    }

    #[test]
    fn payload_missing_fields_is_a_decode_error() {
        let err =
            Block::from_wire(ChainKind::Megachain, "mega-1", json!({ "height": 1 })).unwrap_err();
        assert!(matches!(err, BlockDecodeError::Json(_)));
    }

    #[test]
    fn transaction_factory_rejects_evm() {
        let err = Transaction::from_wire(ChainKind::Evm, json!({})).unwrap_err();
        assert!(matches!(
            err,
            BlockDecodeError::Unsupported(ChainKind::Evm)
        ));
    }

    #[test]
    fn transaction_factory_builds_megachain() {
        let tx = Transaction::from_wire(
            ChainKind::Megachain,
            json!({ "id": "tx-9", "hash": "cafe" }),
        )
        .unwrap();
        assert_eq!(tx.id(), "tx-9");
        assert_eq!(tx.hash(), "cafe");
    }
}
