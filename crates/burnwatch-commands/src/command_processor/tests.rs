//! Tests for operator command execution and authorization.

use std::path::Path;

use burnwatch_access::{ChatContext, OperatorGate};
use burnwatch_config::{ConfigStore, ThresholdConfig};
use tempfile::tempdir;

use super::{process_command, CommandStatus, ReplyTarget};
use crate::command_parsing::parse_command_invocation;

const OPERATOR: &str = "1001";

fn store_in(dir: &Path) -> ConfigStore {
    ConfigStore::load(dir.join("config-state.json"))
}

fn run(
    store: &mut ConfigStore,
    sender: &str,
    text: &str,
    context: ChatContext,
) -> super::CommandOutcome {
    let gate = OperatorGate::new(OPERATOR);
    let invocation = parse_command_invocation(sender, text).expect("command text");
    process_command(store, &gate, &invocation, context)
}

#[test]
fn functional_setmaxsol_updates_persists_and_confirms() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());

    let outcome = run(&mut store, OPERATOR, "/setmaxsol 50", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Applied);
    assert_eq!(outcome.command, "setmaxsol");
    let reply = outcome.reply.expect("reply");
    assert_eq!(reply.target, ReplyTarget::Operator);
    assert_eq!(reply.text, "🔹 Max SOL set to: 50");
    assert_eq!(store.get().max_sol, 50.0);

    let reloaded = store_in(temp.path());
    assert_eq!(reloaded.get().max_sol, 50.0);
}

#[test]
fn functional_status_toggles_enabled_each_time() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());

    let first = run(&mut store, OPERATOR, "/status", ChatContext::Private);
    assert_eq!(first.reply.expect("reply").text, "🔄 Posting: ⛔ OFF");
    assert!(!store.get().enabled);

    let second = run(&mut store, OPERATOR, "/status", ChatContext::Broadcast);
    assert_eq!(second.reply.expect("reply").text, "🔄 Posting: ✅ ON");
    assert!(store.get().enabled);
}

#[test]
fn functional_settings_reports_every_field_without_mutation() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());
    let before = store.get();

    let outcome = run(&mut store, OPERATOR, "/settings", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Reported);
    assert!(!outcome.status.mutated_state());
    let text = outcome.reply.expect("reply").text;
    for expected in [
        "Posting: ✅ ON",
        "Min SOL: 0",
        "Max SOL: 100",
        "Min MarketCap: 0",
        "Max MarketCap: unlimited",
    ] {
        assert!(text.contains(expected), "missing {expected} in {text}");
    }
    assert_eq!(store.get(), before);
    assert!(!store.path().exists(), "read-only command must not persist");
}

#[test]
fn functional_inverted_bounds_are_accepted_with_warning() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());

    let outcome = run(&mut store, OPERATOR, "/setminsol 500", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Applied);
    let text = outcome.reply.expect("reply").text;
    assert!(text.contains("every burn event will be dropped"));
    assert_eq!(store.get().min_sol, 500.0);
}

#[test]
fn regression_non_numeric_argument_rejected_without_mutation() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());
    let before = store.get();

    let outcome = run(&mut store, OPERATOR, "/setminsol abc", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Rejected);
    assert!(outcome
        .reply
        .expect("reply")
        .text
        .contains("is not a valid number"));
    assert_eq!(store.get(), before);
}

#[test]
fn regression_unknown_command_returns_usage_to_operator() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());

    let outcome = run(&mut store, OPERATOR, "/rugcheck", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Rejected);
    let reply = outcome.reply.expect("reply");
    assert_eq!(reply.target, ReplyTarget::Operator);
    assert!(reply.text.contains("Supported commands:"));
    assert_eq!(store.get(), ThresholdConfig::default());
}

#[test]
fn regression_non_operator_never_mutates_state() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());
    let before = store.get();

    for text in [
        "/status",
        "/setminsol 5",
        "/setmaxsol 1",
        "/setminmcap 9",
        "/setmaxmcap 10",
        "/settings",
    ] {
        let private = run(&mut store, "2002", text, ChatContext::Private);
        assert_eq!(private.status, CommandStatus::Denied);
        let reply = private.reply.expect("denial reply");
        assert_eq!(reply.target, ReplyTarget::Sender);
        assert!(reply.text.contains("not authorized"));

        let broadcast = run(&mut store, "2002", text, ChatContext::Broadcast);
        assert_eq!(broadcast.status, CommandStatus::Ignored);
        assert!(broadcast.reply.is_none());
    }

    assert_eq!(store.get(), before);
    assert!(!store.path().exists());
}

#[test]
fn regression_persist_failure_reports_warning_and_keeps_value() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config-state.json");
    std::fs::create_dir_all(&path).expect("block snapshot path");
    let mut store = ConfigStore::with_config(path, ThresholdConfig::default());

    let outcome = run(&mut store, OPERATOR, "/setminmcap 25000", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::AppliedNotPersisted);
    assert!(outcome.status.mutated_state());
    let text = outcome.reply.expect("reply").text;
    assert!(text.starts_with("🔹 Min MarketCap set to: 25000"));
    assert!(text.contains("Not saved to disk"));
    assert_eq!(store.get().min_mcap, 25_000.0);
}

#[test]
fn regression_setmaxmcap_unlimited_removes_ceiling() {
    let temp = tempdir().expect("tempdir");
    let mut store = store_in(temp.path());

    run(&mut store, OPERATOR, "/setmaxmcap 1000000", ChatContext::Private);
    assert_eq!(store.get().max_mcap, 1_000_000.0);

    let outcome = run(&mut store, OPERATOR, "/setmaxmcap unlimited", ChatContext::Private);
    assert_eq!(outcome.status, CommandStatus::Applied);
    assert_eq!(
        outcome.reply.expect("reply").text,
        "🔹 Max MarketCap set to: unlimited"
    );
    assert!(store.get().max_mcap_is_unbounded());
    assert!(store_in(temp.path()).get().max_mcap_is_unbounded());
}
