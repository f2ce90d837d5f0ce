//! Shared setup for the scenario suites: a simulated storefront, one
//! bootstrapped identity and short waits.

#![allow(dead_code)]

use std::time::Duration;
use storewright_client::{
    Fixtures, PageSettings, PersistedIdentity, Scenario, SessionBootstrapper, open_scenario,
};
use storewright_core::TargetConfig;
use storewright_sim::SimBrowser;
use tempfile::TempDir;

pub struct Harness {
    pub browser: SimBrowser,
    pub fixtures: Fixtures,
    pub identity: PersistedIdentity,
    pub dir: TempDir,
}

pub fn settings(dir: &TempDir) -> PageSettings {
    PageSettings {
        target: TargetConfig::default(),
        timeout: Duration::from_millis(500),
        screenshot_dir: dir.path().join("screenshots"),
    }
}

/// Bootstraps the standard user on a throwaway browser, then hands out a
/// second browser for the scenarios themselves.
pub async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = Fixtures::default();
    let bootstrapper = SessionBootstrapper::new(settings(&dir), dir.path().join("auth-state.json"));
    let identity = bootstrapper
        .establish(
            &SimBrowser::new(),
            &fixtures.standard.username,
            &fixtures.standard.password,
        )
        .await
        .unwrap();
    Harness {
        browser: SimBrowser::new(),
        fixtures,
        identity,
        dir,
    }
}

impl Harness {
    /// A scenario already logged in as the standard user, on the inventory.
    pub async fn authenticated(&self) -> Scenario {
        open_scenario(&self.browser, settings(&self.dir), Some(&self.identity))
            .await
            .unwrap()
    }

    /// A scenario on the login screen with no session.
    pub async fn anonymous(&self) -> Scenario {
        open_scenario(&self.browser, settings(&self.dir), None)
            .await
            .unwrap()
    }
}
