// scenario/steps.rs
// Step bodies: provisioning, shadow copy validation and teardown

use tokio::time::{sleep, Instant};

use super::*;
use crate::error::StepError;
use crate::models::{CreateDataset, CreateSmbShare, CreateUser, SmbConfigUpdate};

impl VssScenario {
    /// Run the body of a single step
    pub async fn execute(&mut self, step: &VssStep) -> Result<(), StepError> {
        match step {
            VssStep::CreateDataset(dataset) => self.create_dataset(dataset).await,
            VssStep::CreateUser => self.create_user().await,
            VssStep::CreateShare => self.create_share().await,
            VssStep::RestartSmbService => self.restart_smb_service().await,
            VssStep::EnableSmb1 => self.enable_smb1().await,
            VssStep::CheckShadowCopies(dialect) => self.check_shadow_copies(*dialect).await,
            VssStep::RemoveShare => self.remove_share().await,
            VssStep::RemoveUser => self.remove_user().await,
            VssStep::RemoveDataset => self.remove_dataset().await,
        }
    }

    //-----------------------------------------------------
    // PROVISIONING
    //-----------------------------------------------------

    async fn create_dataset(&mut self, dataset: &str) -> Result<(), StepError> {
        self.api.create_dataset(&CreateDataset::smb(dataset)).await?;
        self.state.datasets.push(dataset.to_string());
        self.api.create_snapshot(dataset, VSS_INIT_SNAPSHOT).await?;

        let snapshot_id = format!("{}@{}", dataset, VSS_INIT_SNAPSHOT);
        let found = self.api.query_snapshots(&snapshot_id).await?;
        if found.len() != 1 {
            let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
            return Err(StepError::assertion(format!(
                "expected exactly one snapshot for {}, found {}: {:?}",
                snapshot_id,
                found.len(),
                ids
            )));
        }

        tracing::info!(dataset, snapshot = %snapshot_id, "dataset created");
        Ok(())
    }

    async fn create_user(&mut self) -> Result<(), StepError> {
        let uid = self.api.next_uid().await?;
        self.state.next_uid = Some(uid);

        let payload = CreateUser {
            username: VSS_SMB_USER.to_string(),
            full_name: VSS_SMB_USER_FULL_NAME.to_string(),
            group_create: true,
            password: VSS_SMB_PWD.to_string(),
            uid,
        };
        let id = self.api.create_user(&payload).await?;
        self.state.user_id = Some(id);

        tracing::info!(user = VSS_SMB_USER, uid, id, "share user created");
        Ok(())
    }

    async fn create_share(&mut self) -> Result<(), StepError> {
        let path = self.share_path();
        let payload = CreateSmbShare {
            comment: VSS_SHARE_COMMENT.to_string(),
            path: path.clone(),
            name: VSS_SMB_NAME.to_string(),
            purpose: VSS_SHARE_PURPOSE.to_string(),
            auxsmbconf: VSS_SHARE_AUXSMBCONF.to_string(),
        };
        let share = self.api.create_smb_share(&payload).await?;
        self.state.share_id = Some(share.id);

        let cmd = format!("mkdir {}/{}; zpool sync", path, VSS_SMB_USER);
        let res = self.remote.exec(&cmd).await?;
        if !res.result {
            return Err(StepError::RemoteCommand {
                cmd,
                output: res.output,
                stderr: res.stderr,
                exit_code: res.exit_code,
            });
        }

        tracing::info!(
            share = share.name.as_deref().unwrap_or(VSS_SMB_NAME),
            id = share.id,
            path = share.path.as_deref().unwrap_or(&path),
            "share created"
        );
        Ok(())
    }

    async fn restart_smb_service(&mut self) -> Result<(), StepError> {
        self.api.restart_service(SMB_SERVICE).await?;
        Ok(())
    }

    async fn enable_smb1(&mut self) -> Result<(), StepError> {
        let payload = SmbConfigUpdate {
            enable_smb1: true,
            guest: VSS_SMB_GUEST.to_string(),
            smb_options: VSS_SMB_OPTIONS.to_string(),
        };
        self.api.update_smb_config(&payload).await?;
        Ok(())
    }

    //-----------------------------------------------------
    // SHADOW COPY VALIDATION
    //-----------------------------------------------------

    async fn check_shadow_copies(&mut self, dialect: Dialect) -> Result<(), StepError> {
        sleep(self.options.settle).await;

        let target = self.share_target();
        let mut snaps = self
            .smb
            .get_shadow_copies(&target, dialect, SHADOW_ENUM_PATH)
            .await?;

        if !self.options.poll_timeout.is_zero() {
            let deadline = Instant::now() + self.options.poll_timeout;
            while snaps.len() != 1 && Instant::now() < deadline {
                tracing::debug!(%dialect, count = snaps.len(), "waiting for shadow copies");
                sleep(self.options.poll_interval).await;
                snaps = self
                    .smb
                    .get_shadow_copies(&target, dialect, SHADOW_ENUM_PATH)
                    .await?;
            }
        }

        self.state.shadow_copies.insert(dialect, snaps.clone());
        if snaps.len() != 1 {
            return Err(StepError::assertion(format!(
                "expected exactly one shadow copy over {}, found {}: {:?}",
                dialect,
                snaps.len(),
                snaps
            )));
        }

        tracing::info!(%dialect, shadow_copy = %snaps[0], "shadow copy visible");
        Ok(())
    }

    //-----------------------------------------------------
    // TEARDOWN
    //-----------------------------------------------------

    async fn remove_share(&mut self) -> Result<(), StepError> {
        let id = self
            .state
            .share_id
            .ok_or_else(|| StepError::assertion("no share id recorded"))?;
        self.api.delete_smb_share(id).await?;
        Ok(())
    }

    async fn remove_user(&mut self) -> Result<(), StepError> {
        let id = self
            .state
            .user_id
            .ok_or_else(|| StepError::assertion("no user id recorded"))?;
        self.api.delete_user(id, true).await?;
        Ok(())
    }

    async fn remove_dataset(&mut self) -> Result<(), StepError> {
        self.api.delete_dataset(&self.root_dataset(), true).await?;
        Ok(())
    }
}
