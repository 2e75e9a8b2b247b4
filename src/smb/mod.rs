//! SMB client side of the scenario
//!
//! Everything here goes through the external `smbclient` binary:
//! - `client`: invocation, output capture and NT status interpretation
//! - `shadow`: previous-version (shadow copy) enumeration
//! - `ntstatus`: the status names smbclient prints and their codes

mod client;
pub mod ntstatus;
mod shadow;

use std::fmt;

pub use client::{interpret_status, ClientOutput, SmbClient, StatusCheck};
pub use shadow::parse_shadow_copies;

/// Protocol family a session is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Smb1,
    Smb2,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Smb1, Dialect::Smb2];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Smb1 => "SMB1",
            Dialect::Smb2 => "SMB2",
        }
    }

    /// smbclient arguments pinning the session to this dialect
    pub fn client_args(self) -> Vec<String> {
        match self {
            Dialect::Smb1 => vec![
                "-m".to_string(),
                "NT1".to_string(),
                "--option=client min protocol=NT1".to_string(),
            ],
            Dialect::Smb2 => vec!["-m".to_string(), "SMB3".to_string()],
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share plus the credentials used to reach it
#[derive(Debug, Clone)]
pub struct ShareTarget {
    pub host: String,
    pub share: String,
    pub username: String,
    pub password: String,
}

impl ShareTarget {
    /// UNC path in the form smbclient expects
    pub fn unc(&self) -> String {
        format!("//{}/{}", self.host, self.share)
    }

    pub fn credentials(&self) -> String {
        format!("{}%{}", self.username, self.password)
    }
}
