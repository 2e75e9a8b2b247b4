// appliance/datasets.rs
// Dataset and snapshot operations: create, snapshot, lookup, delete

use super::client::ApplianceClient;
use crate::error::ApiError;
use crate::models::{CreateDataset, CreateSnapshot, DeleteDataset, SnapshotEntry};
use crate::utils::encode_dataset_id;

impl ApplianceClient {
    pub async fn create_dataset(&self, dataset: &CreateDataset) -> Result<(), ApiError> {
        self.post("/pool/dataset/", dataset).await?.ensure_ok()?;
        Ok(())
    }

    /// Snapshot `dataset` as `dataset@name`
    pub async fn create_snapshot(&self, dataset: &str, name: &str) -> Result<(), ApiError> {
        let payload = CreateSnapshot {
            dataset: dataset.to_string(),
            name: name.to_string(),
        };
        self.post("/zfs/snapshot/", &payload).await?.ensure_ok()?;
        Ok(())
    }

    /// Look up snapshots by full `dataset@name` id
    pub async fn query_snapshots(&self, snapshot_id: &str) -> Result<Vec<SnapshotEntry>, ApiError> {
        self.get_with_query("/zfs/snapshot/", &[("id", snapshot_id)])
            .await?
            .ensure_ok()?
            .json()
    }

    pub async fn delete_dataset(&self, dataset: &str, recursive: bool) -> Result<(), ApiError> {
        let path = format!("/pool/dataset/id/{}/", encode_dataset_id(dataset));
        self.delete(&path, Some(&DeleteDataset { recursive }))
            .await?
            .ensure_ok()?;
        Ok(())
    }
}
