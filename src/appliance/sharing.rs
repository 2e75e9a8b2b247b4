// appliance/sharing.rs
// SMB share and service operations: share create/delete, service restart, global config

use super::client::ApplianceClient;
use crate::error::ApiError;
use crate::models::{CreateSmbShare, RestartService, SmbConfigUpdate, SmbShare};

impl ApplianceClient {
    pub async fn create_smb_share(&self, share: &CreateSmbShare) -> Result<SmbShare, ApiError> {
        self.post("/sharing/smb/", share).await?.ensure_ok()?.json()
    }

    pub async fn delete_smb_share(&self, id: u64) -> Result<(), ApiError> {
        let path = format!("/sharing/smb/id/{}/", id);
        self.delete::<()>(&path, None).await?.ensure_ok()?;
        Ok(())
    }

    pub async fn restart_service(&self, service: &str) -> Result<(), ApiError> {
        let payload = RestartService {
            service: service.to_string(),
        };
        self.post("/service/restart/", &payload).await?.ensure_ok()?;
        Ok(())
    }

    pub async fn update_smb_config(&self, config: &SmbConfigUpdate) -> Result<(), ApiError> {
        self.put("/smb/", config).await?.ensure_ok()?;
        Ok(())
    }
}
