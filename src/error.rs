//-----------------------------------------------------
// ERROR TYPES
//-----------------------------------------------------

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors talking to the appliance management API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{method} {path} failed: {source}")]
    Transport {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path} returned {status}: {body}")]
    UnexpectedStatus {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {path}: {source} (body: {body})")]
    Decode {
        path: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the remote shell channel
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Errors from smbclient invocations
#[derive(Debug, Error)]
pub enum SmbError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("shadow copy enumeration on {share} over {dialect} exited with {code:?}: {stderr}")]
    Enumerate {
        share: String,
        dialect: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("local copy {}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Failure reason of a single scenario step
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Smb(#[from] SmbError),

    #[error(
        "remote command failed: {{\"cmd\": {cmd:?}, \"res\": {output:?}, \"stderr\": {stderr:?}, \"exit_code\": {exit_code:?}}}"
    )]
    RemoteCommand {
        cmd: String,
        output: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("{0}")]
    Assertion(String),
}

impl StepError {
    pub fn assertion(message: impl Into<String>) -> Self {
        StepError::Assertion(message.into())
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_command_reason_keeps_stderr() {
        let err = StepError::RemoteCommand {
            cmd: "mkdir /mnt/tank/smb-vss/smbshadowuser; zpool sync".to_string(),
            output: String::new(),
            stderr: "mkdir: cannot create directory: File exists\n".to_string(),
            exit_code: Some(1),
        };
        let reason = err.to_string();
        assert!(reason.starts_with("remote command failed: {\"cmd\": \"mkdir /mnt/tank/smb-vss/smbshadowuser; zpool sync\""));
        assert!(reason.contains("\"stderr\": \"mkdir: cannot create directory: File exists\\n\""));
        assert!(reason.ends_with("\"exit_code\": Some(1)}"));
    }
}
