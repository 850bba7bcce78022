//! BDD scenarios for the provisioning workflow.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ProvisionContext, provision_context};

#[scenario(
    path = "tests/features/provision.feature",
    name = "Publish connection details once provisioning completes"
)]
fn scenario_publish_details(provision_context: ProvisionContext) {
    drop(provision_context);
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Warn when SoftLayer omits connection details"
)]
fn scenario_sparse_details(provision_context: ProvisionContext) {
    drop(provision_context);
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Warn when a status check carries no transaction"
)]
fn scenario_missing_transaction(provision_context: ProvisionContext) {
    drop(provision_context);
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Report a fault raised while polling"
)]
fn scenario_status_fault(provision_context: ProvisionContext) {
    drop(provision_context);
}
