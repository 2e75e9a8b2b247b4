// smb/client.rs
// smbclient invocation and NT status interpretation

use super::ntstatus::{self, FAIL_CHECK_NAME, NT_STATUS_FAIL_CHECK, NT_STATUS_OK, OK_NAME, PREFIX};
use super::{Dialect, ShareTarget};
use crate::error::SmbError;
use crate::utils::{execute_command_in, CommandOutput};
use std::path::Path;

pub type ClientOutput = CommandOutput;

/// Status smbclient reported for a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheck {
    /// None when smbclient printed a status name missing from our table
    pub code: Option<u32>,
    pub name: String,
    /// Output preceding the status token, or stderr when smbclient itself failed
    pub detail: String,
}

impl StatusCheck {
    pub fn is_ok(&self) -> bool {
        self.code == Some(NT_STATUS_OK)
    }
}

/// Map smbclient output onto an NT status.
///
/// A non-zero exit is always `NT_STATUS_FAIL_CHECK` with the raw stderr.
/// Output without any `NT_STATUS_` token is `NT_STATUS_OK`; otherwise the
/// last space-separated token of stdout is the status name.
pub fn interpret_status(out: &ClientOutput) -> StatusCheck {
    if !out.success() {
        return StatusCheck {
            code: Some(NT_STATUS_FAIL_CHECK),
            name: FAIL_CHECK_NAME.to_string(),
            detail: out.stderr.clone(),
        };
    }

    let text = out.stdout.trim();
    if !text.contains(PREFIX) {
        return StatusCheck {
            code: Some(NT_STATUS_OK),
            name: OK_NAME.to_string(),
            detail: text.to_string(),
        };
    }

    let (detail, token) = text.rsplit_once(' ').unwrap_or(("", text));
    StatusCheck {
        code: ntstatus::lookup(token),
        name: token.to_string(),
        detail: detail.to_string(),
    }
}

/// Wrapper around the external smbclient binary
#[derive(Debug, Clone)]
pub struct SmbClient {
    program: String,
}

impl SmbClient {
    pub fn new(program: &str) -> Self {
        SmbClient {
            program: program.to_string(),
        }
    }

    pub fn command_args(target: &ShareTarget, dialect: Option<Dialect>, command: &str) -> Vec<String> {
        let mut args = vec![target.unc(), "-U".to_string(), target.credentials()];
        if let Some(dialect) = dialect {
            args.extend(dialect.client_args());
        }
        args.push("-c".to_string());
        args.push(command.to_string());
        args
    }

    /// Run one `-c` command string against the share
    pub async fn run(
        &self,
        target: &ShareTarget,
        dialect: Option<Dialect>,
        command: &str,
    ) -> Result<ClientOutput, SmbError> {
        self.run_in(target, dialect, command, None).await
    }

    pub(crate) async fn run_in(
        &self,
        target: &ShareTarget,
        dialect: Option<Dialect>,
        command: &str,
        cwd: Option<&Path>,
    ) -> Result<ClientOutput, SmbError> {
        tracing::debug!(share = %target.unc(), ?dialect, command, "smbclient");
        let args = Self::command_args(target, dialect, command);
        execute_command_in(&self.program, &args, cwd)
            .await
            .map_err(|source| SmbError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    /// Try to open `path` and report the resulting status
    pub async fn open_status(&self, target: &ShareTarget, path: &str) -> Result<StatusCheck, SmbError> {
        let out = self.run(target, None, &format!("open {}", path)).await?;
        Ok(interpret_status(&out))
    }

    /// Download `path` into `dest_dir` with `mget` and report the resulting status
    pub async fn mget_status(
        &self,
        target: &ShareTarget,
        path: &str,
        dest_dir: &Path,
    ) -> Result<StatusCheck, SmbError> {
        let command = format!("prompt OFF; mget {}", path);
        let out = self.run_in(target, None, &command, Some(dest_dir)).await?;
        Ok(interpret_status(&out))
    }
}
