//! Adapter Registry
//!
//! Resolves a `(chain kind, chain id)` pair to a configured adapter,
//! dispatching on the registration's kind. One registry handle is
//! constructed at process start and passed into the route layer; there is no
//! hidden global state.

use std::sync::Arc;

use crate::application::adapters::chain_adapter::ChainAdapter;
use crate::application::adapters::evm::EvmAdapter;
use crate::application::adapters::inflight::InflightIngestions;
use crate::application::adapters::megachain::MegachainAdapter;
use crate::domain::gateways::{BlockStore, BlockchainRepository, ChainClient, RpcEndpointRepository};
use crate::domain::models::blockchain::{Blockchain, ChainKind};
use crate::shared::errors::IngestError;

/// Registry resolving registrations to adapter instances
pub struct AdapterRegistry {
    blockchains: Arc<dyn BlockchainRepository>,
    endpoints: Arc<dyn RpcEndpointRepository>,
    blocks: Arc<dyn BlockStore>,
    client: Arc<dyn ChainClient>,
    inflight: Arc<InflightIngestions>,
    max_fetch_attempts: usize,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new(
        blockchains: Arc<dyn BlockchainRepository>,
        endpoints: Arc<dyn RpcEndpointRepository>,
        blocks: Arc<dyn BlockStore>,
        client: Arc<dyn ChainClient>,
        max_fetch_attempts: usize,
    ) -> Self {
        Self {
            blockchains,
            endpoints,
            blocks,
            client,
            inflight: InflightIngestions::new(),
            max_fetch_attempts,
        }
    }

    /// Resolve the adapter for a registered blockchain.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Configuration`] when no registration exists for
    /// the pair, and a persistence error when the lookup itself fails.
    pub async fn adapter(
        &self,
        kind: ChainKind,
        chain_id: &str,
    ) -> Result<Box<dyn ChainAdapter>, IngestError> {
        let blockchain = self
            .blockchains
            .find_by_kind_and_chain_id(kind, chain_id)
            .await?
            .ok_or_else(|| {
                IngestError::Configuration(format!(
                    "Blockchain {kind}/{chain_id} is not registered"
                ))
            })?;

        Ok(self.build(blockchain))
    }

    fn build(&self, blockchain: Blockchain) -> Box<dyn ChainAdapter> {
        match blockchain.kind() {
            ChainKind::Evm => Box::new(EvmAdapter::new(blockchain, Arc::clone(&self.endpoints))),
            ChainKind::Megachain => Box::new(MegachainAdapter::new(
                blockchain,
                Arc::clone(&self.endpoints),
                Arc::clone(&self.blocks),
                Arc::clone(&self.client),
                Arc::clone(&self.inflight),
                self.max_fetch_attempts,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::block::MegachainBlock;
    use crate::domain::models::blockchain::{RegisterBlockchainData, RpcEndpoint};
    use crate::shared::errors::RepositoryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockBlockchains {
        find_result: Mutex<Option<Result<Option<Blockchain>, RepositoryError>>>,
    }

    #[async_trait]
    impl BlockchainRepository for MockBlockchains {
        async fn find_by_kind_and_chain_id(
            &self,
            _kind: ChainKind,
            _chain_id: &str,
        ) -> Result<Option<Blockchain>, RepositoryError> {
            self.find_result.lock().unwrap().take().unwrap_or(Ok(None))
        }

        async fn find_all(&self) -> Result<Vec<Blockchain>, RepositoryError> {
            Ok(vec![])
        }

        async fn create(
            &self,
            _data: &RegisterBlockchainData,
        ) -> Result<Blockchain, RepositoryError> {
            Err(RepositoryError::Mapping("not used".to_string()))
        }
    }

    struct NoEndpoints;

    #[async_trait]
    impl RpcEndpointRepository for NoEndpoints {
        async fn list(&self, _blockchain_id: i32) -> Result<Vec<RpcEndpoint>, RepositoryError> {
            Ok(vec![])
        }

        async fn add(
            &self,
            _blockchain_id: i32,
            _url: &str,
        ) -> Result<RpcEndpoint, RepositoryError> {
            Err(RepositoryError::Conflict("not used".to_string()))
        }
    }

    struct NoBlocks;

    #[async_trait]
    impl BlockStore for NoBlocks {
        async fn insert_megachain_block(
            &self,
            _block: &MegachainBlock,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn find_by_height(
            &self,
            _blockchain_id: i32,
            _height: i64,
            _include_transactions: bool,
        ) -> Result<Option<MegachainBlock>, RepositoryError> {
            Ok(None)
        }

        async fn max_height(&self, _blockchain_id: i32) -> Result<Option<i64>, RepositoryError> {
            Ok(None)
        }
    }

    struct NoClient;

    #[async_trait]
    impl ChainClient for NoClient {
        async fn fetch_block(
            &self,
            _endpoint: &str,
            _chain_id: &str,
            _height: i64,
        ) -> Result<serde_json::Value, IngestError> {
            Err(IngestError::Fetch("not used".to_string()))
        }

        async fn fetch_latest_height(
            &self,
            _endpoint: &str,
            _chain_id: &str,
        ) -> Result<i64, IngestError> {
            Err(IngestError::Fetch("not used".to_string()))
        }
    }

    fn registry(find_result: Result<Option<Blockchain>, RepositoryError>) -> AdapterRegistry {
        AdapterRegistry::new(
            Arc::new(MockBlockchains {
                find_result: Mutex::new(Some(find_result)),
            }),
            Arc::new(NoEndpoints),
            Arc::new(NoBlocks),
            Arc::new(NoClient),
            3,
        )
    }

    #[tokio::test]
    async fn resolves_megachain_adapter_for_registered_chain() {
        let chain = Blockchain::restore(
            1,
            ChainKind::Megachain,
            "Megachain".to_string(),
            "mega-1".to_string(),
        );
        let registry = registry(Ok(Some(chain)));

        let adapter = registry.adapter(ChainKind::Megachain, "mega-1").await;
        assert!(adapter.is_ok());
    }

    #[tokio::test]
    async fn unregistered_chain_is_a_configuration_error() {
        let registry = registry(Ok(None));
        let err = registry
            .adapter(ChainKind::Megachain, "mega-9")
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, IngestError::Configuration(_)));
    }

    #[tokio::test]
    async fn evm_registration_gets_the_evm_adapter() {
        let chain = Blockchain::restore(2, ChainKind::Evm, "Ethereum".to_string(), "1".to_string());
        let registry = registry(Ok(Some(chain)));

        let adapter = registry.adapter(ChainKind::Evm, "1").await.unwrap();
        // The EVM adapter manages endpoints but reports the fetch gap.
        assert!(matches!(
            adapter.remote_latest_height().await.unwrap_err(),
            IngestError::Configuration(_)
        ));
    }
}
