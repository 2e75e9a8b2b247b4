//! Shared harness for the integration tests
//!
//! - `MockAppliance`: in-process management API served by warp on a loopback
//!   port, recording every call and answering like a real appliance
//! - `FakeTools`: `sshpass` and `smbclient` stand-ins written as shell scripts
//!   into a temp directory, logging their arguments

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::net::{SocketAddr, TcpListener};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::Filter;

use smb_vss_scenario::report::RunReport;
use smb_vss_scenario::scenario::{ScenarioOptions, ScenarioState, VssScenario};
use smb_vss_scenario::sequencer::{Selection, Sequencer};
use smb_vss_scenario::settings::Settings;

pub const API_PREFIX: &str = "/api/v2.0";
pub const NEXT_UID: u32 = 3000;
pub const USER_ID: u64 = 41;
pub const SHARE_ID: u64 = 7;
pub const GMT_1: &str = "@GMT-2024.01.01-09.59.58";
pub const GMT_2: &str = "@GMT-2024.01.02-09.59.58";

//-----------------------------------------------------
// MOCK APPLIANCE
//-----------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    /// Path below the API prefix, still percent-encoded
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    failures: HashMap<(String, String), u16>,
    /// Dataset name -> status for `POST /pool/dataset/`
    dataset_failures: HashMap<String, u16>,
    snapshots: Vec<String>,
    duplicate_snapshots: bool,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockAppliance {
    pub addr: SocketAddr,
    state: Shared,
}

/// Free loopback port; the listener is dropped before the server binds it
pub fn allocate_bind_addr() -> Result<SocketAddr, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("failed to bind loopback: {err}"))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("failed to read listener address: {err}"))?;
    drop(listener);
    Ok(addr)
}

impl MockAppliance {
    pub async fn start() -> MockAppliance {
        let addr = allocate_bind_addr().unwrap();
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let with_state = {
            let state = state.clone();
            warp::any().map(move || state.clone())
        };
        let routes = warp::method()
            .and(warp::path::full())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::optional::<String>("authorization"))
            .and(warp::body::bytes())
            .and(with_state)
            .map(handle);

        tokio::spawn(warp::serve(routes).run(addr));
        wait_until_listening(addr).await;

        MockAppliance { addr, state }
    }

    /// Answer `method path` with `status` from now on
    pub fn fail(&self, method: &str, path: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method.to_string(), path.to_string()), status);
    }

    /// Answer `POST /pool/dataset/` with `status` for `dataset` only
    pub fn fail_dataset(&self, dataset: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .dataset_failures
            .insert(dataset.to_string(), status);
    }

    /// Snapshot lookups return every match twice
    pub fn duplicate_snapshots(&self) {
        self.state.lock().unwrap().duplicate_snapshots = true;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn ip(&self) -> String {
        self.addr.to_string()
    }
}

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("mock appliance did not start listening on {}", addr);
}

fn handle<B: AsRef<[u8]>>(
    method: Method,
    full: FullPath,
    query: HashMap<String, String>,
    authorization: Option<String>,
    body: B,
    state: Shared,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let raw = body.as_ref();
    let body: Value = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(raw).unwrap_or(Value::Null)
    };
    let path = full
        .as_str()
        .strip_prefix(API_PREFIX)
        .unwrap_or(full.as_str())
        .to_string();

    let mut state = state.lock().unwrap();
    state.calls.push(RecordedCall {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization,
        body: body.clone(),
    });

    let mut injected = state.failures.get(&(method.to_string(), path.clone())).copied();
    if method == Method::POST && path == "/pool/dataset/" {
        if let Some(name) = body["name"].as_str() {
            injected = injected.or_else(|| state.dataset_failures.get(name).copied());
        }
    }
    if let Some(code) = injected {
        let status = StatusCode::from_u16(code).unwrap();
        return reply(json!({"message": "injected failure"}), status);
    }

    match (method.as_str(), path.as_str()) {
        ("POST", "/pool/dataset/") => reply(json!({"id": body["name"]}), StatusCode::OK),
        ("POST", "/zfs/snapshot/") => {
            let id = format!(
                "{}@{}",
                body["dataset"].as_str().unwrap_or_default(),
                body["name"].as_str().unwrap_or_default()
            );
            state.snapshots.push(id.clone());
            reply(json!({"id": id}), StatusCode::OK)
        }
        ("GET", "/zfs/snapshot/") => {
            let wanted = query.get("id").cloned().unwrap_or_default();
            let copies = if state.duplicate_snapshots { 2 } else { 1 };
            let found: Vec<Value> = state
                .snapshots
                .iter()
                .filter(|id| **id == wanted)
                .flat_map(|id| std::iter::repeat(json!({"id": id})).take(copies))
                .collect();
            reply(Value::Array(found), StatusCode::OK)
        }
        ("GET", "/user/get_next_uid/") => reply(json!(NEXT_UID), StatusCode::OK),
        ("POST", "/user/") => reply(json!(USER_ID), StatusCode::OK),
        ("POST", "/sharing/smb/") => reply(
            json!({"id": SHARE_ID, "name": body["name"], "path": body["path"], "enabled": true}),
            StatusCode::OK,
        ),
        ("POST", "/service/restart/") => reply(json!(true), StatusCode::OK),
        ("PUT", "/smb/") => reply(body, StatusCode::OK),
        ("DELETE", p) if p.starts_with("/sharing/smb/id/") => reply(json!(true), StatusCode::OK),
        ("DELETE", p) if p.starts_with("/user/id/") => reply(json!(USER_ID), StatusCode::OK),
        ("DELETE", p) if p.starts_with("/pool/dataset/id/") => reply(json!(true), StatusCode::OK),
        _ => reply(json!({"message": "not found"}), StatusCode::NOT_FOUND),
    }
}

fn reply(value: Value, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&value), status)
}

//-----------------------------------------------------
// FAKE EXTERNAL TOOLS
//-----------------------------------------------------

pub struct FakeTools {
    pub dir: TempDir,
    pub sshpass: PathBuf,
    pub smbclient: PathBuf,
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// smbclient body printing `allinfo` output with the given shadow copies
pub fn allinfo_script(shadow_copies: &[&str]) -> String {
    let mut out = String::from("echo 'altname: SMBSHA~1'\necho 'attributes: D (10)'\n");
    for gmt in shadow_copies {
        out.push_str(&format!("echo '{}'\n", gmt));
        out.push_str("echo 'create_time:    Mon Jan  1 09:59:58 AM 2024 UTC'\n");
    }
    out
}

impl FakeTools {
    /// `sshpass` exiting 0 and `smbclient` reporting one shadow copy
    pub fn healthy() -> FakeTools {
        FakeTools::new(0, "", &allinfo_script(&[GMT_1]))
    }

    pub fn new(ssh_exit: i32, ssh_output: &str, smbclient_body: &str) -> FakeTools {
        FakeTools::build(ssh_exit, ssh_output, "", smbclient_body)
    }

    /// `sshpass` exiting `ssh_exit` with `stderr` on standard error
    pub fn failing_ssh(ssh_exit: i32, stderr: &str) -> FakeTools {
        FakeTools::build(ssh_exit, "", stderr, &allinfo_script(&[GMT_1]))
    }

    fn build(ssh_exit: i32, ssh_stdout: &str, ssh_stderr: &str, smbclient_body: &str) -> FakeTools {
        let dir = tempfile::tempdir().unwrap();
        let ssh_log = dir.path().join("sshpass.log");
        let smb_log = dir.path().join("smbclient.log");

        let mut ssh_body = format!(
            "printf '%s\\n' \"$*\" >> '{}'\nprintf '%s' '{}'\n",
            ssh_log.display(),
            ssh_stdout
        );
        if !ssh_stderr.is_empty() {
            ssh_body.push_str(&format!("printf '%s\\n' '{}' >&2\n", ssh_stderr));
        }
        ssh_body.push_str(&format!("exit {}", ssh_exit));
        let sshpass = write_script(dir.path(), "sshpass", &ssh_body);
        let smbclient = write_script(
            dir.path(),
            "smbclient",
            &format!(
                "printf '%s\\n' \"$*\" >> '{}'\n{}",
                smb_log.display(),
                smbclient_body
            ),
        );

        FakeTools {
            dir,
            sshpass,
            smbclient,
        }
    }

    fn read_log(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    pub fn ssh_log(&self) -> String {
        self.read_log("sshpass.log")
    }

    pub fn smb_log(&self) -> String {
        self.read_log("smbclient.log")
    }
}

//-----------------------------------------------------
// SCENARIO HELPERS
//-----------------------------------------------------

pub fn settings_for(mock: &MockAppliance, tools: &FakeTools) -> Settings {
    Settings {
        ip: mock.ip(),
        pool_name: "tank".to_string(),
        user: "root".to_string(),
        password: "secret".to_string(),
        http_timeout_secs: 10,
        settle_secs: 0,
        ssh_program: tools.sshpass.to_string_lossy().into_owned(),
        smbclient_program: tools.smbclient.to_string_lossy().into_owned(),
        ..Settings::default()
    }
}

pub async fn run_scenario(
    settings: &Settings,
    cleanup: bool,
    selection: Selection,
) -> (RunReport, ScenarioState) {
    let options = ScenarioOptions::from_settings(settings, cleanup);
    let mut scenario = VssScenario::new(settings, options).unwrap();
    let mut seq = Sequencer::with_selection(selection);
    scenario.run(&mut seq).await;

    let state = scenario.state().clone();
    let report = RunReport::from_sequencer(RunReport::new_run_id(), &settings.ip, 0, seq);
    (report, state)
}
