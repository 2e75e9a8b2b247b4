use serde::{Deserialize, Serialize};

// Request structures

#[derive(Debug, Clone, Serialize)]
pub struct CreateDataset {
    pub name: String,
    pub share_type: String,
}

impl CreateDataset {
    /// Dataset with the appliance's SMB-oriented defaults
    pub fn smb(name: &str) -> Self {
        CreateDataset {
            name: name.to_string(),
            share_type: "SMB".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSnapshot {
    pub dataset: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub full_name: String,
    pub group_create: bool,
    pub password: String,
    pub uid: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSmbShare {
    pub comment: String,
    pub path: String,
    pub name: String,
    pub purpose: String,
    pub auxsmbconf: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestartService {
    pub service: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmbConfigUpdate {
    pub enable_smb1: bool,
    pub guest: String,
    pub smb_options: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteUser {
    pub delete_group: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteDataset {
    pub recursive: bool,
}

// Response structures

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmbShare {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataset_payload() {
        let payload = serde_json::to_value(CreateDataset::smb("tank/smb-vss")).unwrap();
        assert_eq!(payload, json!({"name": "tank/smb-vss", "share_type": "SMB"}));
    }

    #[test]
    fn test_share_payload_field_names() {
        let share = CreateSmbShare {
            comment: "c".to_string(),
            path: "/mnt/tank/smb-vss".to_string(),
            name: "SMBVSS".to_string(),
            purpose: "NO_PRESET".to_string(),
            auxsmbconf: "shadow:ignore_empty_snaps = no".to_string(),
        };
        let payload = serde_json::to_value(share).unwrap();
        assert_eq!(payload["auxsmbconf"], "shadow:ignore_empty_snaps = no");
        assert_eq!(payload["purpose"], "NO_PRESET");
    }

    #[test]
    fn test_share_response_ignores_extra_fields() {
        let share: SmbShare = serde_json::from_value(json!({
            "id": 3,
            "name": "SMBVSS",
            "path": "/mnt/tank/smb-vss",
            "enabled": true,
            "auxsmbconf": "shadow:ignore_empty_snaps = no"
        }))
        .unwrap();
        assert_eq!(share.id, 3);
        assert_eq!(share.name.as_deref(), Some("SMBVSS"));
    }

    #[test]
    fn test_snapshot_entry_ignores_extra_fields() {
        let entry: SnapshotEntry = serde_json::from_value(json!({
            "id": "tank/smb-vss@init",
            "name": "init",
            "dataset": "tank/smb-vss"
        }))
        .unwrap();
        assert_eq!(entry.id, "tank/smb-vss@init");
    }
}
