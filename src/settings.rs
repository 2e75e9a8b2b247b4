//! Scenario Settings
//!
//! Target appliance, credentials and timing knobs for a scenario run.
//!
//! Settings are looked up in this order:
//! - an explicit path given on the command line
//! - settings.json next to the executable
//! - `<config dir>/smb-vss/settings.json`
//! - built-in defaults
//!
//! `SMB_VSS_*` environment variables override whatever was loaded.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SettingsError;

const SETTINGS_FILE: &str = "settings.json";

pub const ENV_IP: &str = "SMB_VSS_IP";
pub const ENV_POOL: &str = "SMB_VSS_POOL";
pub const ENV_USER: &str = "SMB_VSS_USER";
pub const ENV_PASSWORD: &str = "SMB_VSS_PASSWORD";
pub const ENV_API_KEY: &str = "SMB_VSS_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Appliance address, optionally with a port
    pub ip: String,
    pub pool_name: String,
    /// Account used for both the management API and SSH
    pub user: String,
    pub password: String,
    /// Bearer key used instead of basic auth when present
    pub api_key: Option<String>,
    pub scheme: String,
    pub api_prefix: String,
    pub http_timeout_secs: u64,
    pub settle_secs: u64,
    /// Zero keeps the single blind wait before enumeration
    pub poll_timeout_secs: u64,
    pub poll_interval_millis: u64,
    pub ssh_program: String,
    pub smbclient_program: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ip: String::new(),
            pool_name: "tank".to_string(),
            user: "root".to_string(),
            password: String::new(),
            api_key: None,
            scheme: "http".to_string(),
            api_prefix: "/api/v2.0".to_string(),
            http_timeout_secs: 60,
            settle_secs: 5,
            poll_timeout_secs: 0,
            poll_interval_millis: 1000,
            ssh_program: "sshpass".to_string(),
            smbclient_program: "smbclient".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SMB_VSS_*` overrides through the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ip) = lookup(ENV_IP) {
            self.ip = ip;
        }
        if let Some(pool) = lookup(ENV_POOL) {
            self.pool_name = pool;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = password;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key).filter(|k| !k.is_empty());
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.ip.trim().is_empty() {
            return Err(SettingsError::Invalid(format!(
                "target ip is empty (set \"ip\" or {})",
                ENV_IP
            )));
        }
        if self.pool_name.trim().is_empty() || self.pool_name.contains('@') {
            return Err(SettingsError::Invalid(format!(
                "invalid pool name '{}'",
                self.pool_name
            )));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(SettingsError::Invalid(format!(
                "scheme must be http or https, got '{}'",
                self.scheme
            )));
        }
        Ok(())
    }

    /// Base URL of the management API, without a trailing slash
    pub fn api_base_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.scheme,
            self.ip,
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// Address without an API port, for ssh and smbclient
    pub fn host(&self) -> &str {
        match self.ip.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => host,
            _ => &self.ip,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis.max(1))
    }
}

/// Candidate locations for settings.json when none is given explicitly
pub fn default_locations() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(SETTINGS_FILE));
    }
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("smb-vss").join(SETTINGS_FILE));
    }
    candidates
}

/// Load settings from `explicit` or the default locations, then apply the environment
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = match explicit {
        Some(path) => Settings::from_file(path)?,
        None => match default_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!("loading settings from {}", path.display());
                Settings::from_file(&path)?
            }
            None => {
                tracing::debug!("no {} found, using default values", SETTINGS_FILE);
                Settings::default()
            }
        },
    };
    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}
