//! Blockchain DTOs
//!
//! Request and response shapes for the blockchain API endpoints.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::block::{Block, EvmBlock, MegachainBlock, MegachainTransaction};
use crate::domain::models::blockchain::{Blockchain, RpcEndpoint};

lazy_static! {
    /// Accepted chain-type tags
    static ref CHAIN_TYPE_REGEX: Regex = Regex::new(r"^(evm|megachain)$").expect("valid regex");
}

/// Validates a chain-type tag against the kinds the ingestion code supports
fn validate_chain_type(tag: &str) -> Result<(), validator::ValidationError> {
    if CHAIN_TYPE_REGEX.is_match(tag) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("chain_type");
        error.message = Some("type must be 'evm' or 'megachain'".into());
        Err(error)
    }
}

/// Validates a URL format (must start with http:// or https://)
fn validate_url(url: &str) -> Result<(), validator::ValidationError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        let mut error = validator::ValidationError::new("url");
        error.message = Some("URL must start with http:// or https://".into());
        return Err(error);
    }

    let without_protocol = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or("");
    if without_protocol.is_empty() || without_protocol.starts_with('/') {
        let mut error = validator::ValidationError::new("url");
        error.message = Some("URL must include a valid host".into());
        return Err(error);
    }

    Ok(())
}

/// Uniform success envelope: `{ success: true, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Request body for registering a blockchain
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBlockchainDto {
    #[validate(custom(function = "validate_chain_type"))]
    pub r#type: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "chain_id must be 1-100 characters"))]
    pub chain_id: String,
}

/// Request body for registering an RPC endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct AddRpcEndpointDto {
    #[validate(custom(function = "validate_url"))]
    #[validate(length(max = 500, message = "url must be at most 500 characters"))]
    pub url: String,
}

/// Request body for ingesting a block
#[derive(Debug, Deserialize)]
pub struct IngestBlockDto {
    pub height: i64,
}

/// Blockchain registration response
#[derive(Debug, Serialize)]
pub struct BlockchainDto {
    pub id: i32,
    pub r#type: String,
    pub name: String,
    pub chain_id: String,
}

impl From<Blockchain> for BlockchainDto {
    fn from(blockchain: Blockchain) -> Self {
        Self {
            id: blockchain.id(),
            r#type: blockchain.kind().as_str().to_string(),
            name: blockchain.name().to_string(),
            chain_id: blockchain.chain_id().to_string(),
        }
    }
}

/// RPC endpoint response
#[derive(Debug, Serialize)]
pub struct RpcEndpointDto {
    pub id: i32,
    pub blockchain_id: i32,
    pub url: String,
}

impl From<RpcEndpoint> for RpcEndpointDto {
    fn from(endpoint: RpcEndpoint) -> Self {
        Self {
            id: endpoint.id,
            blockchain_id: endpoint.blockchain_id,
            url: endpoint.url,
        }
    }
}

/// Transaction entry in a block response
#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: String,
    pub hash: String,
}

impl From<MegachainTransaction> for TransactionDto {
    fn from(tx: MegachainTransaction) -> Self {
        Self {
            id: tx.id,
            hash: tx.hash,
        }
    }
}

/// Block response, one shape per chain kind
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum BlockDto {
    #[serde(rename = "evm")]
    Evm {
        chain_id: String,
        number: u64,
        hash: String,
        parent_hash: String,
        nonce: String,
        timestamp: i64,
        transaction_hashes: Vec<String>,
    },
    #[serde(rename = "megachain")]
    Megachain {
        chain_id: String,
        height: i64,
        timestamp: i64,
        rid: String,
        prev_block_rid: String,
        transactions: Vec<TransactionDto>,
        witnesses: Vec<String>,
    },
}

impl From<Block> for BlockDto {
    fn from(block: Block) -> Self {
        match block {
            Block::Evm(block) => Self::from_evm(block),
            Block::Megachain(block) => Self::from_megachain(block),
        }
    }
}

impl BlockDto {
    fn from_evm(block: EvmBlock) -> Self {
        Self::Evm {
            chain_id: block.chain_id,
            number: block.number,
            hash: block.hash,
            parent_hash: block.parent_hash,
            nonce: block.nonce,
            timestamp: block.timestamp,
            transaction_hashes: block.transaction_hashes,
        }
    }

    fn from_megachain(block: MegachainBlock) -> Self {
        Self::Megachain {
            chain_id: block.chain_id,
            height: block.height,
            timestamp: block.timestamp,
            rid: hex::encode(&block.rid),
            prev_block_rid: hex::encode(&block.prev_block_rid),
            transactions: block
                .transactions
                .into_iter()
                .map(TransactionDto::from)
                .collect(),
            witnesses: block
                .witnesses
                .iter()
                .map(|witness| hex::encode(&witness.public_key))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_chain_type() {
        let dto = RegisterBlockchainDto {
            r#type: "solana".to_string(),
            name: "Solana".to_string(),
            chain_id: "sol-1".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn accepts_known_chain_types() {
        for tag in ["evm", "megachain"] {
            let dto = RegisterBlockchainDto {
                r#type: tag.to_string(),
                name: "Chain".to_string(),
                chain_id: "c-1".to_string(),
            };
            assert!(dto.validate().is_ok(), "{tag} should validate");
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in ["ftp://node.example", "http://", "node.example"] {
            let dto = AddRpcEndpointDto {
                url: url.to_string(),
            };
            assert!(dto.validate().is_err(), "{url} should be rejected");
        }
    }

    #[test]
    fn megachain_block_serializes_with_hex_rid() {
        let block = Block::Megachain(MegachainBlock {
            chain_id: "mega-1".to_string(),
            height: 4,
            timestamp: 99,
            rid: vec![0xaa; 32],
            prev_block_rid: vec![0xbb; 32],
            witness: vec![],
            transactions: vec![],
            witnesses: vec![],
        });

        let value = serde_json::to_value(BlockDto::from(block)).unwrap();
        assert_eq!(value["type"], "megachain");
        assert_eq!(value["rid"], hex::encode([0xaa; 32]));
    }
}
