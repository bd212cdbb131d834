//! Round-trip behavior of the registry against its snapshot file.

use chrono::{Duration, Utc};
use taskdeck::registry::DEFAULT_MAX_TASKS;
use taskdeck::task::Status;

mod support;
use support::TestEnv;

#[test]
fn empty_registry_round_trips() {
    let env = TestEnv::new();
    {
        let registry = env.open_registry(DEFAULT_MAX_TASKS);
        assert!(registry.is_empty());
    }

    let registry = env.open_registry(DEFAULT_MAX_TASKS);
    assert!(registry.is_empty());
    assert_eq!(registry.next_id(), 1);
}

#[test]
fn records_round_trip_with_field_fidelity() {
    let env = TestEnv::new();
    let due = Utc::now() + Duration::hours(6);

    let created = {
        let mut registry = env.open_registry(DEFAULT_MAX_TASKS);
        let a = registry
            .create("Quarterly report", "Close the Q3 numbers", "high", due)
            .expect("a");
        let b = registry
            .create("File expenses", "", "low", due + Duration::hours(1))
            .expect("b");
        vec![a, b]
    };

    let registry = env.open_registry(DEFAULT_MAX_TASKS);
    assert_eq!(registry.len(), created.len());
    for original in created {
        let loaded = registry.find(original.id).expect("loaded");
        assert_eq!(loaded, original);
    }
    assert_eq!(registry.next_id(), 3);
}

#[test]
fn due_dates_survive_to_at_least_second_precision() {
    let env = TestEnv::new();
    let due = Utc::now() + Duration::hours(1);

    {
        let mut registry = env.open_registry(DEFAULT_MAX_TASKS);
        registry.create("t", "", "medium", due).expect("create");
    }

    let registry = env.open_registry(DEFAULT_MAX_TASKS);
    let loaded = registry.find(1).expect("find");
    assert_eq!(loaded.due_at.timestamp(), due.timestamp());
}

#[test]
fn every_mutation_rewrites_the_snapshot() {
    let env = TestEnv::new();
    let mut registry = env.open_registry(DEFAULT_MAX_TASKS);
    let due = Utc::now() + Duration::hours(1);

    registry.create("a", "", "low", due).expect("create");
    let after_create = env.read_snapshot();
    assert_eq!(after_create["tasks"].as_array().expect("tasks").len(), 1);
    assert_eq!(after_create["next_id"], 2);
    assert_eq!(after_create["tasks"][0]["status"], "pending");

    registry.update_status(1, "completada").expect("update");
    let after_update = env.read_snapshot();
    assert_eq!(after_update["tasks"][0]["status"], "completed");
    // Only the status differs between the two snapshots.
    assert_eq!(after_update["next_id"], after_create["next_id"]);
    assert_eq!(
        after_update["tasks"][0]["title"],
        after_create["tasks"][0]["title"]
    );
    assert_eq!(
        after_update["tasks"][0]["due_at"],
        after_create["tasks"][0]["due_at"]
    );
}

#[test]
fn failed_operations_do_not_touch_the_snapshot() {
    let env = TestEnv::new();
    let mut registry = env.open_registry(DEFAULT_MAX_TASKS);
    let due = Utc::now() + Duration::hours(1);

    registry.create("a", "", "low", due).expect("create");
    let before = env.read_snapshot();

    registry
        .create("b", "", "urgent", due)
        .expect_err("bad priority");
    registry
        .update_status(9, "completed")
        .expect_err("missing id");

    assert_eq!(env.read_snapshot(), before);
}

#[test]
fn completed_tasks_reload_as_completed() {
    let env = TestEnv::new();
    let due = Utc::now() + Duration::hours(1);

    {
        let mut registry = env.open_registry(DEFAULT_MAX_TASKS);
        registry.create("done soon", "", "medium", due).expect("create");
        registry.update_status(1, "completed").expect("update");
    }

    let registry = env.open_registry(DEFAULT_MAX_TASKS);
    assert_eq!(registry.find(1).expect("find").status, Status::Completed);
    assert!(registry.list_by_due_date().is_empty());
    assert_eq!(registry.list_by_priority(true).len(), 1);
}

#[test]
fn capacity_applies_to_reloaded_registries() {
    let env = TestEnv::new();
    let due = Utc::now() + Duration::hours(1);

    {
        let mut registry = env.open_registry(2);
        registry.create("a", "", "low", due).expect("a");
        registry.create("b", "", "low", due).expect("b");
    }

    let mut registry = env.open_registry(2);
    assert!(registry.create("c", "", "low", due).is_err());
    assert_eq!(registry.next_id(), 3);
}
