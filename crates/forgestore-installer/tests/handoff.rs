//! Integration tests for external handoff to companion installer apps.
//!
//! # What is tested
//!
//! - Companion detection under either distribution identity
//! - The release-tracker deep link format
//! - Identity fallthrough and the caller-supplied fallback
//! - The broker manager launch chain: app, store listing, releases page

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{InstalledSet, LaunchScript, RecordingLauncher};
use forgestore_core::ports::LaunchPayload;
use forgestore_installer::{Handoff, BROKER_MANAGER, PACKAGE_INSPECTOR, RELEASE_TRACKER};

fn handoff(installed: Vec<&'static str>, launcher: Arc<RecordingLauncher>) -> Handoff {
    Handoff::new(Arc::new(InstalledSet(installed)), launcher)
}

#[tokio::test]
async fn companions_are_detected_under_either_identity() {
    let launcher = RecordingLauncher::new(LaunchScript::Ok);
    let handoff = handoff(vec!["dev.imranr.obtainium"], launcher);

    // Installed under the alternate identity only.
    assert!(handoff.is_app_installed(RELEASE_TRACKER).await);
    assert!(!handoff.is_app_installed(PACKAGE_INSPECTOR).await);
    assert!(!handoff.is_app_installed(BROKER_MANAGER).await);
}

#[tokio::test]
async fn tracker_handoff_builds_the_repo_deep_link() {
    let launcher = RecordingLauncher::new(LaunchScript::Ok);
    launcher.script_package("dev.imranr.obtainium.fdroid", LaunchScript::Ok);
    let handoff = handoff(vec![], launcher.clone());

    let mut fell_back = false;
    handoff
        .open_repo_in_tracker("octo", "tool", || fell_back = true)
        .await;

    assert!(!fell_back);
    let opened = launcher.opened_in_packages.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].0, "dev.imranr.obtainium.fdroid");
    assert_eq!(
        opened[0].1,
        LaunchPayload::Url("obtainium://add/https://github.com/octo/tool".to_string())
    );
}

#[tokio::test]
async fn handoff_tries_the_alternate_identity_then_falls_back() {
    let launcher = RecordingLauncher::new(LaunchScript::Ok);
    let handoff = handoff(vec![], launcher.clone());

    let mut fell_back = false;
    handoff
        .open_repo_in_tracker("octo", "tool", || fell_back = true)
        .await;

    assert!(fell_back);
    let opened = launcher.opened_in_packages.lock().unwrap();
    let identities: Vec<&str> = opened.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(
        identities,
        vec!["dev.imranr.obtainium.fdroid", "dev.imranr.obtainium"]
    );
}

#[tokio::test]
async fn inspector_handoff_passes_the_payload_file() {
    let launcher = RecordingLauncher::new(LaunchScript::Ok);
    launcher.script_package("io.github.muntashirakon.AppManager", LaunchScript::Ok);
    let handoff = handoff(vec![], launcher.clone());

    let mut fell_back = false;
    handoff
        .open_file_in_inspector(Path::new("/tmp/tool.apk"), || fell_back = true)
        .await;

    assert!(!fell_back);
    let opened = launcher.opened_in_packages.lock().unwrap();
    assert_eq!(
        opened[0].1,
        LaunchPayload::File(Path::new("/tmp/tool.apk").to_path_buf())
    );
}

#[tokio::test]
async fn broker_manager_falls_back_to_its_store_listing() {
    // launch_app is scripted NoHandler by default; open_default succeeds.
    let launcher = RecordingLauncher::new(LaunchScript::Ok);
    let handoff = handoff(vec![], launcher.clone());

    handoff.open_broker_manager().await;

    assert_eq!(
        launcher.launched_apps.lock().unwrap().as_slice(),
        ["moe.shizuku.privileged.api"]
    );
    let opened = launcher.opened_defaults.lock().unwrap();
    assert_eq!(opened.len(), 1);
    match &opened[0] {
        LaunchPayload::Url(url) => {
            assert!(url.contains("play.google.com"));
            assert!(url.contains("moe.shizuku.privileged.api"));
        }
        other => panic!("expected a store URL, got {other:?}"),
    }
}

#[tokio::test]
async fn broker_manager_falls_back_to_the_releases_page_last() {
    let launcher = RecordingLauncher::new(LaunchScript::Fail("no browser"));
    let handoff = handoff(vec![], launcher.clone());

    handoff.open_broker_manager().await;

    // Store listing first, releases page second; both attempted.
    let opened = launcher.opened_defaults.lock().unwrap();
    assert_eq!(opened.len(), 2);
    match &opened[1] {
        LaunchPayload::Url(url) => assert!(url.contains("/releases")),
        other => panic!("expected the releases URL, got {other:?}"),
    }
}
