//! SMB VSS scenario
//!
//! Provisions a dataset pair, a share user and an SMB share on the appliance,
//! then checks that the share exposes exactly one shadow copy over SMB1 and
//! SMB2. Steps run in a fixed order through a [`Sequencer`]; each one records
//! a checkpoint that later steps depend on.

mod previous_versions;
mod steps;

pub use previous_versions::{previous_version_path, PREVIOUS_VERSION_FILES, SNAPSHOT_OFFSETS};

use std::collections::HashMap;
use std::time::Duration;

use crate::appliance::ApplianceClient;
use crate::error::ApiError;
use crate::remote::RemoteShell;
use crate::sequencer::{Sequencer, StepSpec};
use crate::settings::Settings;
use crate::smb::{Dialect, ShareTarget, SmbClient};

//-----------------------------------------------------
// SCENARIO CONSTANTS
//-----------------------------------------------------

pub const VSS_SMB_NAME: &str = "SMBVSS";
pub const VSS_SMB_USER: &str = "smbshadowuser";
pub const VSS_SMB_PWD: &str = "smb1234";
pub const VSS_SMB_USER_FULL_NAME: &str = "SMB User";
pub const VSS_SHARE_COMMENT: &str = "SMB VSS Testing Share";
pub const VSS_SHARE_PURPOSE: &str = "NO_PRESET";
pub const VSS_SHARE_AUXSMBCONF: &str = "shadow:ignore_empty_snaps = no";
pub const VSS_SMB_GUEST: &str = "nobody";
pub const VSS_SMB_OPTIONS: &str = "log level = 8 shadowzfs:10";
pub const VSS_INIT_SNAPSHOT: &str = "init";
pub const SMB_SERVICE: &str = "cifs";
/// Share root; the snapshot enumeration answer covers the whole share
pub const SHADOW_ENUM_PATH: &str = ".";

const DATASET_NAME: &str = "smb-vss";
const NESTED_DATASET_NAME: &str = "sub1";

// Checkpoints
pub const VSS_DATASET_CREATED: &str = "VSS_DATASET_CREATED";
pub const VSS_USER_CREATED: &str = "VSS_USER_CREATED";
pub const VSS_SHARE_CREATED: &str = "VSS_SHARE_CREATED";
pub const VSS_SMB_SERVICE_STARTED: &str = "VSS_SMB_SERVICE_STARTED";
pub const VSS_SMB1_ENABLED: &str = "VSS_SMB1_ENABLED";
pub const SHARE_HAS_SHADOW_COPIES: &str = "SHARE_HAS_SHADOW_COPIES";
pub const VSS_SHARE_REMOVED: &str = "VSS_SHARE_REMOVED";
pub const VSS_USER_REMOVED: &str = "VSS_USER_REMOVED";
pub const VSS_DATASET_REMOVED: &str = "VSS_DATASET_REMOVED";

// Resource markers, set once the appliance accepted the create call
pub const VSS_SHARE_EXISTS: &str = "VSS_SHARE_EXISTS";
pub const VSS_USER_EXISTS: &str = "VSS_USER_EXISTS";
pub const VSS_DATASET_EXISTS: &str = "VSS_DATASET_EXISTS";

//-----------------------------------------------------
// RUN STATE
//-----------------------------------------------------

/// Ids handed back by the appliance during a run
#[derive(Debug, Clone, Default)]
pub struct ScenarioState {
    pub next_uid: Option<u32>,
    pub user_id: Option<u64>,
    pub share_id: Option<u64>,
    /// Datasets the appliance created, in creation order
    pub datasets: Vec<String>,
    /// Last enumeration result per dialect
    pub shadow_copies: HashMap<Dialect, Vec<String>>,
}

/// Timing and teardown knobs
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub settle: Duration,
    /// Zero disables polling after the settle delay
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
    pub cleanup: bool,
}

impl ScenarioOptions {
    pub fn from_settings(settings: &Settings, cleanup: bool) -> Self {
        ScenarioOptions {
            settle: settings.settle_delay(),
            poll_timeout: settings.poll_timeout(),
            poll_interval: settings.poll_interval(),
            cleanup,
        }
    }
}

/// One entry of the ordered scenario plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VssStep {
    CreateDataset(String),
    CreateUser,
    CreateShare,
    RestartSmbService,
    EnableSmb1,
    CheckShadowCopies(Dialect),
    RemoveShare,
    RemoveUser,
    RemoveDataset,
}

pub struct VssScenario {
    pub(crate) api: ApplianceClient,
    pub(crate) remote: RemoteShell,
    pub(crate) smb: SmbClient,
    host: String,
    pool: String,
    pub(crate) options: ScenarioOptions,
    pub(crate) state: ScenarioState,
}

impl VssScenario {
    pub fn new(settings: &Settings, options: ScenarioOptions) -> Result<Self, ApiError> {
        Ok(VssScenario {
            api: ApplianceClient::new(settings)?,
            remote: RemoteShell::from_settings(settings),
            smb: SmbClient::new(&settings.smbclient_program),
            host: settings.host().to_string(),
            pool: settings.pool_name.clone(),
            options,
            state: ScenarioState::default(),
        })
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    pub fn options(&self) -> &ScenarioOptions {
        &self.options
    }

    /// `<pool>/smb-vss`
    pub fn root_dataset(&self) -> String {
        format!("{}/{}", self.pool, DATASET_NAME)
    }

    /// `<pool>/smb-vss/sub1`
    pub fn nested_dataset(&self) -> String {
        format!("{}/{}", self.root_dataset(), NESTED_DATASET_NAME)
    }

    /// Mount path of the root dataset, exported as the share
    pub fn share_path(&self) -> String {
        format!("/mnt/{}", self.root_dataset())
    }

    /// The VSS share, reached as the test user
    pub fn share_target(&self) -> ShareTarget {
        self.target_for(VSS_SMB_NAME)
    }

    /// The test user's home share
    pub fn home_target(&self) -> ShareTarget {
        self.target_for(VSS_SMB_USER)
    }

    fn target_for(&self, share: &str) -> ShareTarget {
        ShareTarget {
            host: self.host.clone(),
            share: share.to_string(),
            username: VSS_SMB_USER.to_string(),
            password: VSS_SMB_PWD.to_string(),
        }
    }

    /// Ordered steps with their ids, checkpoints and prerequisites
    pub fn plan(&self) -> Vec<(StepSpec, VssStep)> {
        let mut plan = Vec::new();

        for dataset in [self.root_dataset(), self.nested_dataset()] {
            plan.push((
                StepSpec::new(
                    format!("test_001_creating_smb_dataset[{}]", dataset),
                    VSS_DATASET_CREATED,
                    &[],
                ),
                VssStep::CreateDataset(dataset),
            ));
        }
        plan.push((
            StepSpec::new(
                "test_002_creating_shareuser_to_test_acls",
                VSS_USER_CREATED,
                &[VSS_DATASET_CREATED],
            ),
            VssStep::CreateUser,
        ));
        plan.push((
            StepSpec::new(
                "test_003_creating_a_smb_share_path",
                VSS_SHARE_CREATED,
                &[VSS_DATASET_CREATED],
            ),
            VssStep::CreateShare,
        ));
        plan.push((
            StepSpec::new(
                "test_004_starting_cifs_service",
                VSS_SMB_SERVICE_STARTED,
                &[VSS_SHARE_CREATED],
            ),
            VssStep::RestartSmbService,
        ));
        plan.push((
            StepSpec::new("test_005_enable_smb1", VSS_SMB1_ENABLED, &[VSS_SHARE_CREATED]),
            VssStep::EnableSmb1,
        ));
        for dialect in Dialect::ALL {
            plan.push((
                StepSpec::new(
                    format!("test_006_check_shadow_copies[{}]", dialect),
                    SHARE_HAS_SHADOW_COPIES,
                    &[VSS_USER_CREATED],
                ),
                VssStep::CheckShadowCopies(dialect),
            ));
        }

        if self.options.cleanup {
            plan.push((
                StepSpec::new(
                    "teardown_001_removing_smb_share",
                    VSS_SHARE_REMOVED,
                    &[VSS_SHARE_EXISTS],
                ),
                VssStep::RemoveShare,
            ));
            plan.push((
                StepSpec::new(
                    "teardown_002_removing_shareuser",
                    VSS_USER_REMOVED,
                    &[VSS_USER_EXISTS],
                ),
                VssStep::RemoveUser,
            ));
            plan.push((
                StepSpec::new(
                    format!("teardown_003_removing_smb_dataset[{}]", self.root_dataset()),
                    VSS_DATASET_REMOVED,
                    &[VSS_DATASET_EXISTS],
                ),
                VssStep::RemoveDataset,
            ));
        }

        plan
    }

    /// Run the whole plan through `seq`
    pub async fn run(&mut self, seq: &mut Sequencer) {
        for (spec, step) in self.plan() {
            seq.run(&spec, self.execute(&step)).await;
            self.mark_resources(seq);
        }
    }

    /// Teardown follows what exists on the appliance, not which steps passed:
    /// a share whose mkdir failed still has to be removed.
    fn mark_resources(&self, seq: &mut Sequencer) {
        if self.state.share_id.is_some() {
            seq.satisfy(VSS_SHARE_EXISTS);
        }
        if self.state.user_id.is_some() {
            seq.satisfy(VSS_USER_EXISTS);
        }
        if self.state.datasets.contains(&self.root_dataset()) {
            seq.satisfy(VSS_DATASET_EXISTS);
        }
    }
}
