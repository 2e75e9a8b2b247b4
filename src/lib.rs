//! SMB VSS scenario driver
//!
//! Provisions a dataset, user and SMB share on a storage appliance through its
//! management API and checks that ZFS snapshots surface as shadow copies
//! ("previous versions") over SMB1 and SMB2.

pub mod appliance;
pub mod error;
pub mod logging;
pub mod models;
pub mod remote;
pub mod report;
pub mod scenario;
pub mod sequencer;
pub mod settings;
pub mod smb;
pub mod utils;
