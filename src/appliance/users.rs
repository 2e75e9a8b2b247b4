// appliance/users.rs
// Local user operations: uid allocation, create, delete

use super::client::ApplianceClient;
use crate::error::ApiError;
use crate::models::{CreateUser, DeleteUser};

impl ApplianceClient {
    /// Next unused uid as reported by the appliance
    pub async fn next_uid(&self) -> Result<u32, ApiError> {
        self.get("/user/get_next_uid/").await?.ensure_ok()?.json()
    }

    /// Create a local user and return its id
    pub async fn create_user(&self, user: &CreateUser) -> Result<u64, ApiError> {
        self.post("/user/", user).await?.ensure_ok()?.json()
    }

    pub async fn delete_user(&self, id: u64, delete_group: bool) -> Result<(), ApiError> {
        let path = format!("/user/id/{}/", id);
        self.delete(&path, Some(&DeleteUser { delete_group }))
            .await?
            .ensure_ok()?;
        Ok(())
    }
}
