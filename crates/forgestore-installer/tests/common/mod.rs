//! Scripted fakes shared by the integration tests.
//!
//! No real broker, processes, or desktop environment is touched: the
//! transport, spawner, launcher, and platform ports are all driven by
//! canned scripts and record what was asked of them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use forgestore_core::ports::{
    AppLauncher, BrokerNotification, BrokerTransport, CommandSpawner, DropLocationProvider,
    LaunchError, LaunchPayload, PackageRegistry, PlatformIntegration, SessionId, SpawnError,
    SystemProbe, TransportError,
};
use forgestore_installer::{BrokerClient, Installer, InstallerDeps, Platform};

// ── Broker transport ───────────────────────────────────────────────

/// A scripted in-memory broker transport.
///
/// Liveness and permission state are plain atomics; lifecycle
/// notifications are pushed through `notify`. Session traffic is counted
/// so tests can assert the fail-fast paths never touch the broker.
pub struct ScriptedTransport {
    rx: Mutex<Option<mpsc::Receiver<BrokerNotification>>>,
    pub notify: mpsc::Sender<BrokerNotification>,
    pub running: AtomicBool,
    pub permitted: AtomicBool,
    /// Reject the first `write_chunk` with a protocol error.
    pub fail_first_write: AtomicBool,
    /// On the first `write_chunk`, drop liveness and emit `BinderDead`
    /// before returning, simulating the broker dying mid-session.
    pub kill_on_first_write: AtomicBool,
    pub session_calls: AtomicUsize,
    pub bytes_written: AtomicUsize,
    pub abandoned: AtomicBool,
    pub committed: AtomicBool,
}

impl ScriptedTransport {
    pub fn online() -> Arc<Self> {
        Self::with_state(true, true)
    }

    pub fn offline() -> Arc<Self> {
        Self::with_state(false, false)
    }

    fn with_state(running: bool, permitted: bool) -> Arc<Self> {
        let (notify, rx) = mpsc::channel(16);
        Arc::new(Self {
            rx: Mutex::new(Some(rx)),
            notify,
            running: AtomicBool::new(running),
            permitted: AtomicBool::new(permitted),
            fail_first_write: AtomicBool::new(false),
            kill_on_first_write: AtomicBool::new(false),
            session_calls: AtomicUsize::new(0),
            bytes_written: AtomicUsize::new(0),
            abandoned: AtomicBool::new(false),
            committed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl BrokerTransport for ScriptedTransport {
    fn subscribe(&self) -> mpsc::Receiver<BrokerNotification> {
        self.rx
            .lock()
            .unwrap()
            .take()
            .expect("subscribe is called exactly once")
    }

    async fn ping(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn check_permission(&self) -> Result<bool, TransportError> {
        Ok(self.permitted.load(Ordering::SeqCst))
    }

    async fn request_permission(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn create_session(&self, _total_bytes: u64) -> Result<SessionId, TransportError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SessionId(7))
    }

    async fn write_chunk(&self, _session: SessionId, chunk: &[u8]) -> Result<(), TransportError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_first_write.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Protocol("write rejected".to_string()));
        }
        if self.kill_on_first_write.swap(false, Ordering::SeqCst) {
            self.running.store(false, Ordering::SeqCst);
            let _ = self.notify.send(BrokerNotification::BinderDead).await;
            // Yield long enough for the notification listener to observe
            // the death before the session loop polls again.
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        self.bytes_written.fetch_add(chunk.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn commit_session(&self, _session: SessionId) -> Result<String, TransportError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.committed.store(true, Ordering::SeqCst);
        Ok("com.example.app".to_string())
    }

    async fn abandon_session(&self, _session: SessionId) -> Result<(), TransportError> {
        self.abandoned.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn uninstall(&self, _package: &str) -> Result<bool, TransportError> {
        Ok(true)
    }

    async fn version(&self) -> Result<i32, TransportError> {
        Ok(13)
    }
}

// ── Spawner ────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum SpawnScript {
    Ok,
    NotFound,
    Fail(&'static str),
}

/// Spawner that answers from a per-program script and records every
/// invocation. Unscripted programs are reported as not found.
#[derive(Default)]
pub struct RecordingSpawner {
    script: Mutex<HashMap<String, SpawnScript>>,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingSpawner {
    pub fn with(programs: &[(&str, SpawnScript)]) -> Arc<Self> {
        let spawner = Self::default();
        {
            let mut script = spawner.script.lock().unwrap();
            for (program, behavior) in programs {
                script.insert((*program).to_string(), *behavior);
            }
        }
        Arc::new(spawner)
    }

    pub fn programs_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(program, _)| program.clone())
            .collect()
    }
}

#[async_trait]
impl CommandSpawner for RecordingSpawner {
    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<(), SpawnError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        let behavior = self
            .script
            .lock()
            .unwrap()
            .get(program)
            .copied()
            .unwrap_or(SpawnScript::NotFound);
        match behavior {
            SpawnScript::Ok => Ok(()),
            SpawnScript::NotFound => Err(SpawnError::ToolNotFound {
                program: program.to_string(),
            }),
            SpawnScript::Fail(detail) => Err(SpawnError::Failed {
                program: program.to_string(),
                detail: detail.to_string(),
            }),
        }
    }
}

// ── Launcher ───────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum LaunchScript {
    Ok,
    NoHandler,
    Fail(&'static str),
}

impl LaunchScript {
    fn into_result(self) -> Result<(), LaunchError> {
        match self {
            Self::Ok => Ok(()),
            Self::NoHandler => Err(LaunchError::NoHandler),
            Self::Fail(detail) => Err(LaunchError::Failed(detail.to_string())),
        }
    }
}

/// Launcher that answers from scripts and records every call.
pub struct RecordingLauncher {
    pub open_default_script: LaunchScript,
    pub launch_app_script: LaunchScript,
    /// Per-identity script for targeted opens; unscripted identities get
    /// `NoHandler`.
    package_script: Mutex<HashMap<String, LaunchScript>>,
    pub opened_defaults: Mutex<Vec<LaunchPayload>>,
    pub opened_in_packages: Mutex<Vec<(String, LaunchPayload)>>,
    pub launched_apps: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new(open_default: LaunchScript) -> Arc<Self> {
        Arc::new(Self {
            open_default_script: open_default,
            launch_app_script: LaunchScript::NoHandler,
            package_script: Mutex::new(HashMap::new()),
            opened_defaults: Mutex::new(Vec::new()),
            opened_in_packages: Mutex::new(Vec::new()),
            launched_apps: Mutex::new(Vec::new()),
        })
    }

    pub fn script_package(&self, identity: &str, behavior: LaunchScript) {
        self.package_script
            .lock()
            .unwrap()
            .insert(identity.to_string(), behavior);
    }
}

#[async_trait]
impl AppLauncher for RecordingLauncher {
    async fn open_in_package(
        &self,
        package: &str,
        payload: &LaunchPayload,
    ) -> Result<(), LaunchError> {
        self.opened_in_packages
            .lock()
            .unwrap()
            .push((package.to_string(), payload.clone()));
        self.package_script
            .lock()
            .unwrap()
            .get(package)
            .copied()
            .unwrap_or(LaunchScript::NoHandler)
            .into_result()
    }

    async fn open_default(&self, payload: &LaunchPayload) -> Result<(), LaunchError> {
        self.opened_defaults.lock().unwrap().push(payload.clone());
        self.open_default_script.into_result()
    }

    async fn launch_app(&self, package: &str) -> Result<(), LaunchError> {
        self.launched_apps.lock().unwrap().push(package.to_string());
        self.launch_app_script.into_result()
    }
}

// ── Remaining ports ────────────────────────────────────────────────

pub struct StaticProbe(pub &'static str);

impl SystemProbe for StaticProbe {
    fn raw_abi(&self) -> String {
        self.0.to_string()
    }
}

pub struct FixedDropDir(pub PathBuf);

impl DropLocationProvider for FixedDropDir {
    fn drop_dir(&self) -> std::io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

pub struct ScriptedIntegration {
    pub can_request: AtomicBool,
    pub settings_opened: AtomicUsize,
}

impl ScriptedIntegration {
    pub fn new(can_request: bool) -> Arc<Self> {
        Arc::new(Self {
            can_request: AtomicBool::new(can_request),
            settings_opened: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PlatformIntegration for ScriptedIntegration {
    async fn can_request_package_installs(&self) -> bool {
        self.can_request.load(Ordering::SeqCst)
    }

    async fn open_install_settings(&self) -> Result<(), LaunchError> {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct InstalledSet(pub Vec<&'static str>);

#[async_trait]
impl PackageRegistry for InstalledSet {
    async fn is_package_installed(&self, identity: &str) -> bool {
        self.0.contains(&identity)
    }
}

// ── Assembly helpers ───────────────────────────────────────────────

pub struct Rig {
    pub transport: Arc<ScriptedTransport>,
    pub spawner: Arc<RecordingSpawner>,
    pub launcher: Arc<RecordingLauncher>,
    pub integration: Arc<ScriptedIntegration>,
    pub drop_dir: tempfile::TempDir,
    pub installer: Installer,
}

/// Build an installer over fully scripted ports.
pub async fn rig(
    platform: Platform,
    transport: Arc<ScriptedTransport>,
    spawner: Arc<RecordingSpawner>,
    launcher: Arc<RecordingLauncher>,
    integration: Arc<ScriptedIntegration>,
) -> Rig {
    let drop_dir = tempfile::tempdir().unwrap();
    let broker = Arc::new(BrokerClient::connect(transport.clone() as Arc<dyn BrokerTransport>).await);
    let installer = Installer::new(
        platform,
        broker,
        InstallerDeps {
            probe: Arc::new(StaticProbe("x86_64")),
            spawner: spawner.clone(),
            launcher: launcher.clone(),
            integration: integration.clone(),
            locations: Arc::new(FixedDropDir(drop_dir.path().to_path_buf())),
        },
    );
    Rig {
        transport,
        spawner,
        launcher,
        integration,
        drop_dir,
        installer,
    }
}

/// Write a payload file into a fresh temp dir and return both.
pub fn payload_file(name: &str, bytes: usize) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, vec![0xAB_u8; bytes]).unwrap();
    (dir, path)
}
