// scenario/previous_versions.rs
// Previous-version helpers: open or fetch a file through its @GMT path.
// Not part of the step plan; callable once snapshots with known content exist.

use std::path::Path;

use super::VssScenario;
use crate::error::{SmbError, StepError};
use crate::smb::StatusCheck;

/// Files written into the share between snapshots
pub const PREVIOUS_VERSION_FILES: [&str; 3] =
    ["testfile1", "smbshadowuser/testfile2", "sub1/testfile3"];

/// Snapshot name and the byte offset its marker is written at
pub const SNAPSHOT_OFFSETS: [(&str, usize); 3] =
    [("snapshot1", 18), ("snapshot2", 36), ("snapshot3", 54)];

/// `@GMT-YYYY.MM.DD-HH.MM.SS/`
const GMT_PREFIX_LEN: usize = 25;
const MARKER_LEN: usize = 9;

/// `<gmt token>/<file>`
pub fn previous_version_path(gmt: &str, file: &str) -> String {
    format!("{}/{}", gmt, file)
}

impl VssScenario {
    /// Open `path` on the VSS share, or on the user's home share when `home` is set
    pub async fn check_previous_version_exists(
        &self,
        path: &str,
        home: bool,
    ) -> Result<StatusCheck, SmbError> {
        let target = if home {
            self.home_target()
        } else {
            self.share_target()
        };
        self.smb.open_status(&target, path).await
    }

    /// Fetch `path` into `workdir` and compare the 9 bytes at `offset` to `expected`.
    ///
    /// A status other than OK is returned as is. The local copy is removed
    /// once its content has been read.
    pub async fn check_previous_version_contents(
        &self,
        path: &str,
        expected: &str,
        offset: usize,
        workdir: &Path,
    ) -> Result<StatusCheck, StepError> {
        let status = self
            .smb
            .mget_status(&self.share_target(), path, workdir)
            .await?;
        if !status.is_ok() {
            return Ok(status);
        }

        let relative = path.get(GMT_PREFIX_LEN..).ok_or_else(|| {
            StepError::assertion(format!("{} is not a previous version path", path))
        })?;
        let local = workdir.join(relative);
        let local_err = |source| SmbError::LocalFile {
            path: local.clone(),
            source,
        };

        let bytes = tokio::fs::read(&local).await.map_err(local_err)?;
        let tail = bytes.get(offset..).unwrap_or_default();
        if tail.len() != MARKER_LEN {
            return Err(StepError::assertion(format!(
                "path: {}, contents: {}",
                path,
                String::from_utf8_lossy(tail)
            )));
        }
        tokio::fs::remove_file(&local).await.map_err(local_err)?;

        let found = String::from_utf8_lossy(tail);
        if found != expected {
            return Err(StepError::assertion(format!(
                "{}: expected {:?}, found {:?}",
                path, expected, found
            )));
        }
        Ok(status)
    }
}
