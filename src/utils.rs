//-----------------------------------------------------
// HELPER FUNCTIONS
//-----------------------------------------------------

use std::path::Path;
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::process::Command;

/// Captured result of an external program
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run a program to completion and capture its output
pub async fn execute_command(program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
    execute_command_in(program, args, None).await
}

/// Same as `execute_command`, optionally from another working directory
pub async fn execute_command_in(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
) -> std::io::Result<CommandOutput> {
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    let output = command.output().await?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}

/// Dataset name as it appears in `/id/<name>` API paths
pub fn encode_dataset_id(dataset: &str) -> String {
    dataset.replace('/', "%2F")
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
