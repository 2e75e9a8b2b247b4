// smb/shadow.rs
// Shadow copy (previous version) enumeration through smbclient `allinfo`

use super::client::SmbClient;
use super::{Dialect, ShareTarget};
use crate::error::SmbError;

/// `@GMT-YYYY.MM.DD-HH.MM.SS`
const GMT_TOKEN_LEN: usize = 24;

/// Pull the distinct `@GMT-` tokens out of `allinfo` output, in order
pub fn parse_shadow_copies(stdout: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for line in stdout.lines() {
        let line = line.trim_start();
        if !line.starts_with("@GMT-") {
            continue;
        }
        let token = line
            .split(|c: char| c.is_whitespace() || c == ':' || c == '\\')
            .next()
            .unwrap_or_default();
        if token.len() == GMT_TOKEN_LEN && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

impl SmbClient {
    /// Shadow copies the server exposes for the share, enumerated through `path`
    pub async fn get_shadow_copies(
        &self,
        target: &ShareTarget,
        dialect: Dialect,
        path: &str,
    ) -> Result<Vec<String>, SmbError> {
        let command = format!("allinfo \"{}\"", path);
        let out = self.run(target, Some(dialect), &command).await?;
        if !out.success() {
            return Err(SmbError::Enumerate {
                share: target.share.clone(),
                dialect: dialect.to_string(),
                code: out.exit_code,
                stderr: out.stderr,
            });
        }

        let snaps = parse_shadow_copies(&out.stdout);
        tracing::debug!(share = %target.share, %dialect, count = snaps.len(), "shadow copies");
        Ok(snaps)
    }
}
