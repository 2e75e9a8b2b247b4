//! Remote shell execution on the system under test
//!
//! Commands run through `sshpass` + `ssh` with host key checking disabled,
//! since test appliances are reinstalled often and never in known_hosts.

use crate::error::RemoteError;
use crate::settings::Settings;
use crate::utils::execute_command;

/// Outcome of one remote command
#[derive(Debug, Clone)]
pub struct SshResult {
    /// True when the remote command exited with status 0
    pub result: bool,
    pub output: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct RemoteShell {
    program: String,
    host: String,
    user: String,
    password: String,
}

impl RemoteShell {
    pub fn new(program: &str, host: &str, user: &str, password: &str) -> Self {
        RemoteShell {
            program: program.to_string(),
            host: host.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        RemoteShell::new(
            &settings.ssh_program,
            settings.host(),
            &settings.user,
            &settings.password,
        )
    }

    /// Argument vector handed to `sshpass`
    pub fn command_args(&self, command: &str) -> Vec<String> {
        vec![
            "-p".to_string(),
            self.password.clone(),
            "ssh".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            "VerifyHostKeyDNS=no".to_string(),
            format!("{}@{}", self.user, self.host),
            command.to_string(),
        ]
    }

    /// Run `command` on the remote host as the configured user
    pub async fn exec(&self, command: &str) -> Result<SshResult, RemoteError> {
        tracing::debug!(host = %self.host, user = %self.user, command, "remote exec");
        let out = execute_command(&self.program, &self.command_args(command))
            .await
            .map_err(|source| RemoteError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(SshResult {
            result: out.success(),
            output: out.stdout,
            stderr: out.stderr,
            exit_code: out.exit_code,
        })
    }
}
