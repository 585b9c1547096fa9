//! In-Flight Ingestion Guard
//!
//! Short-lived in-process dedupe of concurrent ingestion calls for the same
//! `(blockchain, height)`, so racing callers do not both pay for the remote
//! fetch. The database unique constraint remains the correctness backstop;
//! this guard only saves the wasted network round trip.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of `(blockchain_id, height)` pairs currently being ingested
#[derive(Debug, Default)]
pub struct InflightIngestions {
    inner: Mutex<HashSet<(i32, i64)>>,
}

impl InflightIngestions {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Try to claim an ingestion slot.
    ///
    /// Returns `None` when another call is already ingesting the same
    /// `(blockchain, height)`. The slot is released when the returned permit
    /// is dropped.
    #[must_use]
    pub fn try_begin(self: &Arc<Self>, blockchain_id: i32, height: i64) -> Option<IngestPermit> {
        let mut inflight = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight.insert((blockchain_id, height)) {
            Some(IngestPermit {
                registry: Arc::clone(self),
                key: (blockchain_id, height),
            })
        } else {
            None
        }
    }

    fn release(&self, key: (i32, i64)) {
        let mut inflight = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.remove(&key);
    }
}

/// Claim on one `(blockchain, height)` ingestion, released on drop
#[derive(Debug)]
pub struct IngestPermit {
    registry: Arc<InflightIngestions>,
    key: (i32, i64),
}

impl Drop for IngestPermit {
    fn drop(&mut self) {
        self.registry.release(self.key);
    }
}
