//! BDD step definitions for the provisioning workflow.

use std::time::Duration;

use rstest_bdd_macros::{given, then, when};
use slguest::app::provision_and_report;
use slguest::test_support::ScriptedFault;
use slguest::{ConnectionDetails, InstanceRequest, ProvisionOrchestrator};
use tokio::runtime::Runtime;

use super::test_helpers::{ProvisionContext, ProvisionOutcome};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a scripted SoftLayer account")]
fn scripted_account(provision_context: ProvisionContext) -> ProvisionContext {
    provision_context
}

#[given("the guest passes through transaction \"{name}\"")]
fn guest_passes_through(provision_context: ProvisionContext, name: String) -> ProvisionContext {
    provision_context.backend.push_status(Some(&name));
    provision_context
}

#[given("the guest reports no transaction")]
fn guest_reports_no_transaction(provision_context: ProvisionContext) -> ProvisionContext {
    provision_context.backend.push_status(None);
    provision_context
}

#[given("the guest returns no connection details")]
fn guest_returns_no_details(provision_context: ProvisionContext) -> ProvisionContext {
    provision_context
        .backend
        .set_details(ConnectionDetails::default());
    provision_context
}

#[given("status checks fail with \"{code}\"")]
fn status_checks_fail(provision_context: ProvisionContext, code: String) -> ProvisionContext {
    provision_context
        .backend
        .push_status_fault(ScriptedFault::new(code, "Guest is unavailable."));
    provision_context
}

#[when("I provision the guest")]
fn provision_guest(provision_context: ProvisionContext) -> Result<ProvisionContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let request = InstanceRequest::builder()
        .hostname("web01")
        .domain("example.com")
        .build()
        .map_err(|err| StepError::Assertion(err.to_string()))?;
    let orchestrator = ProvisionOrchestrator::new(provision_context.backend.clone())
        .with_poll_interval(Duration::ZERO);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = runtime.block_on(provision_and_report(
        &orchestrator,
        &request,
        &mut stdout,
        &mut stderr,
    ));

    Ok(ProvisionContext {
        outcome: Some(ProvisionOutcome {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }),
        ..provision_context
    })
}

fn outcome(provision_context: &ProvisionContext) -> Result<&ProvisionOutcome, StepError> {
    provision_context
        .outcome
        .as_ref()
        .ok_or_else(|| StepError::Assertion(String::from("missing outcome")))
}

#[then("the exit code is \"{code}\"")]
fn exit_code_is(provision_context: &ProvisionContext, code: i32) -> Result<(), StepError> {
    let outcome = outcome(provision_context)?;
    if outcome.exit_code == code {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected exit code {code}, got {} (stderr: {})",
            outcome.exit_code, outcome.stderr
        )))
    }
}

#[then("the output contains \"{text}\"")]
fn output_contains(provision_context: &ProvisionContext, text: String) -> Result<(), StepError> {
    let outcome = outcome(provision_context)?;
    if outcome.stdout.lines().any(|line| line == text) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected line '{text}' in output:\n{}",
            outcome.stdout
        )))
    }
}

#[then("the output ends with \"{text}\"")]
fn output_ends_with(provision_context: &ProvisionContext, text: String) -> Result<(), StepError> {
    let outcome = outcome(provision_context)?;
    if outcome.stdout.lines().last() == Some(text.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected final line '{text}' in output:\n{}",
            outcome.stdout
        )))
    }
}

#[then("the status was checked \"{count}\" times")]
fn status_checked(provision_context: &ProvisionContext, count: usize) -> Result<(), StepError> {
    let calls = provision_context.backend.status_calls();
    if calls == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} status checks, got {calls}"
        )))
    }
}

#[then("no properties are published")]
fn no_properties(provision_context: &ProvisionContext) -> Result<(), StepError> {
    let outcome = outcome(provision_context)?;
    if outcome.stdout.lines().any(|line| line.starts_with("ID=")) {
        Err(StepError::Assertion(format!(
            "unexpected properties in output:\n{}",
            outcome.stdout
        )))
    } else {
        Ok(())
    }
}
