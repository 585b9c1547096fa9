//! Blockchain Handlers
//!
//! HTTP handlers for blockchain registration, endpoint management and block
//! ingestion. Each handler resolves an adapter through the registry, runs
//! one adapter operation and wraps the outcome in the uniform envelope.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::domain::models::blockchain::{ChainKind, RegisterBlockchainData};
use crate::infrastructure::driving_adapters::api_rest::dto::{
    AddRpcEndpointDto, ApiResponse, BlockDto, BlockchainDto, IngestBlockDto,
    RegisterBlockchainDto, RpcEndpointDto,
};
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::ApiError;

/// Create the router for blockchain endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_blockchain))
        .route("/", get(list_blockchains))
        .route("/:kind/:chain_id/rpc-endpoints", get(list_rpc_endpoints))
        .route("/:kind/:chain_id/rpc-endpoints", post(add_rpc_endpoint))
        .route("/:kind/:chain_id/blocks", post(ingest_block))
        .route("/:kind/:chain_id/blocks/:height", get(get_block))
        .route("/:kind/:chain_id/latest-height", get(latest_height))
        .route("/:kind/:chain_id/synced-height", get(synced_height))
}

fn parse_kind(raw: &str) -> Result<ChainKind, ApiError> {
    raw.parse::<ChainKind>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// POST /blockchains - Register a new blockchain
///
/// # Responses
///
/// * 201 Created - Blockchain registered
/// * 400 Bad Request - Validation error
/// * 409 Conflict - (type, chain_id) already registered
#[axum::debug_handler]
async fn register_blockchain(
    State(state): State<AppState>,
    Json(dto): Json<RegisterBlockchainDto>,
) -> Result<(StatusCode, Json<ApiResponse<BlockchainDto>>), ApiError> {
    dto.validate()?;
    let kind = parse_kind(&dto.r#type)?;

    tracing::info!(r#type = %kind, chain_id = %dto.chain_id, "Registering blockchain");
    let blockchain = state
        .blockchains
        .create(&RegisterBlockchainData {
            kind,
            name: dto.name,
            chain_id: dto.chain_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BlockchainDto::from(blockchain))),
    ))
}

/// GET /blockchains - List every registered blockchain
#[axum::debug_handler]
async fn list_blockchains(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BlockchainDto>>>, ApiError> {
    let blockchains = state.blockchains.find_all().await?;
    let response: Vec<BlockchainDto> = blockchains.into_iter().map(BlockchainDto::from).collect();
    Ok(Json(ApiResponse::new(response)))
}

/// GET /blockchains/:kind/:chain_id/rpc-endpoints - List registered endpoints
#[axum::debug_handler]
async fn list_rpc_endpoints(
    State(state): State<AppState>,
    Path((kind, chain_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<RpcEndpointDto>>>, ApiError> {
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let endpoints = adapter.rpc_endpoints().await?;
    let response: Vec<RpcEndpointDto> = endpoints.into_iter().map(RpcEndpointDto::from).collect();
    Ok(Json(ApiResponse::new(response)))
}

/// POST /blockchains/:kind/:chain_id/rpc-endpoints - Register an endpoint
///
/// # Responses
///
/// * 201 Created - Endpoint registered
/// * 409 Conflict - URL already registered for this blockchain
#[axum::debug_handler]
async fn add_rpc_endpoint(
    State(state): State<AppState>,
    Path((kind, chain_id)): Path<(String, String)>,
    Json(dto): Json<AddRpcEndpointDto>,
) -> Result<(StatusCode, Json<ApiResponse<RpcEndpointDto>>), ApiError> {
    dto.validate()?;
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let endpoint = adapter.register_rpc_endpoint(&dto.url).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(RpcEndpointDto::from(endpoint))),
    ))
}

/// POST /blockchains/:kind/:chain_id/blocks - Ingest one block by height
///
/// # Responses
///
/// * 201 Created - Block fetched, validated and persisted
/// * 409 Conflict - Block already stored or being ingested
/// * 422 Unprocessable Entity - Witness verification failed
/// * 502 Bad Gateway - Remote fetch or payload decode failed
#[axum::debug_handler]
async fn ingest_block(
    State(state): State<AppState>,
    Path((kind, chain_id)): Path<(String, String)>,
    Json(dto): Json<IngestBlockDto>,
) -> Result<(StatusCode, Json<ApiResponse<BlockDto>>), ApiError> {
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let block = adapter.ingest_block(dto.height).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BlockDto::from(block))),
    ))
}

#[derive(Debug, Deserialize)]
struct BlockQuery {
    #[serde(default)]
    include_transactions: bool,
}

/// GET /blockchains/:kind/:chain_id/blocks/:height - Read a persisted block
#[axum::debug_handler]
async fn get_block(
    State(state): State<AppState>,
    Path((kind, chain_id, height)): Path<(String, String, i64)>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<ApiResponse<BlockDto>>, ApiError> {
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let block = adapter
        .block_at_height(height, query.include_transactions)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: format!("Block at height {height}"),
        })?;
    Ok(Json(ApiResponse::new(BlockDto::from(block))))
}

/// GET /blockchains/:kind/:chain_id/latest-height - Remote latest height
#[axum::debug_handler]
async fn latest_height(
    State(state): State<AppState>,
    Path((kind, chain_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let height = adapter.remote_latest_height().await?;
    Ok(Json(ApiResponse::new(height)))
}

/// GET /blockchains/:kind/:chain_id/synced-height - Highest persisted height
#[axum::debug_handler]
async fn synced_height(
    State(state): State<AppState>,
    Path((kind, chain_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Option<i64>>>, ApiError> {
    let adapter = state.registry.adapter(parse_kind(&kind)?, &chain_id).await?;
    let height = adapter.local_synced_height().await?;
    Ok(Json(ApiResponse::new(height)))
}
