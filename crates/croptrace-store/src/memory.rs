use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use croptrace_canonical::{BatchId, BatchRecord, BatchStatus, Timestamp};
use croptrace_core::{BatchLookup, EnrichmentError};

use crate::error::StoreError;

/// Owner attribution for a stored batch. Lives in the store layer only and
/// never enters a signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOwner {
    /// User that registered the batch.
    pub user_id: String,
    /// Contact email, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// A batch record plus store-level bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBatch {
    /// The canonical batch record.
    #[serde(flatten)]
    pub record: BatchRecord,
    /// Owner attribution, if supplied at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<BatchOwner>,
    /// When the batch was registered in the store.
    pub created_at: Timestamp,
}

/// In-memory batch repository keyed by business key.
///
/// Reads and writes take independent lock guards; the payload core only
/// ever calls the single lookup method.
#[derive(Debug, Default)]
pub struct InMemoryBatchStore {
    inner: RwLock<BTreeMap<String, StoredBatch>>,
}

impl InMemoryBatchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new batch. Fails if the business key is taken.
    pub fn insert(
        &self,
        record: BatchRecord,
        owner: Option<BatchOwner>,
    ) -> Result<(), StoreError> {
        let key = record.batch_id.as_ref().to_string();
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.contains_key(&key) {
            return Err(StoreError::DuplicateBatch(key));
        }
        debug!(batch_id = %key, "batch registered");
        inner.insert(
            key,
            StoredBatch {
                record,
                owner,
                created_at: Timestamp::now(),
            },
        );
        Ok(())
    }

    /// Fetches a batch by business key.
    pub fn get(&self, batch_id: &BatchId) -> Option<StoredBatch> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(batch_id.as_ref()).cloned()
    }

    /// Lists all batches in key order.
    pub fn list(&self) -> Vec<StoredBatch> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.values().cloned().collect()
    }

    /// Lists batches registered by a given user.
    pub fn list_for_user(&self, user_id: &str) -> Vec<StoredBatch> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .values()
            .filter(|b| b.owner.as_ref().is_some_and(|o| o.user_id == user_id))
            .cloned()
            .collect()
    }

    /// Advances a batch's status. Transitions are forward-only; moving
    /// backwards or re-asserting the current status fails.
    pub fn update_status(
        &self,
        batch_id: &BatchId,
        next: BatchStatus,
    ) -> Result<BatchRecord, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let stored = inner
            .get_mut(batch_id.as_ref())
            .ok_or_else(|| StoreError::NotFound(batch_id.as_ref().to_string()))?;
        let current = stored.record.status;
        if !current.can_advance_to(next) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        debug!(batch_id = batch_id.as_ref(), from = ?current, to = ?next, "status advanced");
        stored.record.status = next;
        Ok(stored.record.clone())
    }

    /// Removes a batch by business key.
    pub fn remove(&self, batch_id: &BatchId) -> Result<StoredBatch, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner
            .remove(batch_id.as_ref())
            .ok_or_else(|| StoreError::NotFound(batch_id.as_ref().to_string()))
    }

    /// Number of batches in the store.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BatchLookup for InMemoryBatchStore {
    fn lookup_by_business_key(
        &self,
        batch_id: &BatchId,
    ) -> Result<Option<BatchRecord>, EnrichmentError> {
        Ok(self.get(batch_id).map(|stored| stored.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use croptrace_canonical::normalize_batch;
    use serde_json::json;

    fn sample_record(batch_id: &str) -> BatchRecord {
        normalize_batch(&json!({
            "batchId": batch_id,
            "produceType": "Tomatoes",
            "harvestDate": "2024-01-15",
            "qualityGrade": "A",
            "quantity": 100,
            "location": "Farm A"
        }))
        .unwrap()
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let store = InMemoryBatchStore::new();
        store.insert(sample_record("BCH001"), None).unwrap();
        let found = store
            .lookup_by_business_key(&BatchId::parse("BCH001").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.batch_id.as_ref(), "BCH001");
    }

    #[test]
    fn duplicate_business_key_is_rejected() {
        let store = InMemoryBatchStore::new();
        store.insert(sample_record("BCH001"), None).unwrap();
        assert_eq!(
            store.insert(sample_record("BCH001"), None),
            Err(StoreError::DuplicateBatch("BCH001".into()))
        );
    }

    #[test]
    fn status_advances_forward_only() {
        let store = InMemoryBatchStore::new();
        store.insert(sample_record("BCH001"), None).unwrap();
        let id = BatchId::parse("BCH001").unwrap();

        let updated = store.update_status(&id, BatchStatus::InTransit).unwrap();
        assert_eq!(updated.status, BatchStatus::InTransit);

        // Skipping forward is allowed.
        store.update_status(&id, BatchStatus::AtRetailer).unwrap();

        // Backwards and no-op transitions are not.
        assert!(matches!(
            store.update_status(&id, BatchStatus::Registered),
            Err(StoreError::InvalidTransition { .. })
        ));
        assert!(matches!(
            store.update_status(&id, BatchStatus::AtRetailer),
            Err(StoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn lookup_miss_is_ok_none() {
        let store = InMemoryBatchStore::new();
        let missing = store
            .lookup_by_business_key(&BatchId::parse("BCH404").unwrap())
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn list_for_user_filters_by_owner() {
        let store = InMemoryBatchStore::new();
        let owner = BatchOwner {
            user_id: "user-1".into(),
            user_email: None,
        };
        store
            .insert(sample_record("BCH001"), Some(owner))
            .unwrap();
        store.insert(sample_record("BCH002"), None).unwrap();

        assert_eq!(store.list_for_user("user-1").len(), 1);
        assert_eq!(store.list_for_user("user-2").len(), 0);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn remove_returns_the_stored_batch() {
        let store = InMemoryBatchStore::new();
        store.insert(sample_record("BCH001"), None).unwrap();
        let id = BatchId::parse("BCH001").unwrap();
        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.record.batch_id.as_ref(), "BCH001");
        assert!(store.is_empty());
        assert_eq!(store.remove(&id), Err(StoreError::NotFound("BCH001".into())));
    }
}
