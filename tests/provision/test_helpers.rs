//! Shared fixtures for provisioning BDD scenarios.

use rstest::fixture;
use slguest::test_support::ScriptedBackend;

#[derive(Clone, Debug)]
pub struct ProvisionContext {
    pub backend: ScriptedBackend,
    pub outcome: Option<ProvisionOutcome>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[fixture]
pub fn provision_context() -> ProvisionContext {
    ProvisionContext {
        backend: ScriptedBackend::new(),
        outcome: None,
    }
}
