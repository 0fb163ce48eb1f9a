//! Scope Fork Tests
//!
//! `dup` must produce a scope sharing no mutable state with its source.
//!
use errscope_core::prelude::*;
use errscope_test_utils::{breadcrumb, test_scope, MarkerProcessor};
use proptest::prelude::*;
use serde_json::json;
use std::thread;

fn populated_scope() -> Scope {
    let mut scope = test_scope();
    scope.set_tags(json!({"service": "api"})).unwrap();
    scope.set_user(json!({"id": 1, "roles": ["admin"]})).unwrap();
    scope.set_extras(json!({"nested": {"depth": {"value": 1}}})).unwrap();
    scope.set_context("app", json!({"build": {"sha": "abc"}}));
    scope.set_fingerprint(json!(["{{ default }}"])).unwrap();
    scope.set_transaction_name("parent");
    scope.add_breadcrumb(breadcrumb("parent step"));
    scope.add_event_processor(MarkerProcessor::new("parent"));
    scope
}

#[test]
fn test_fork_tag_not_visible_in_original() {
    let s1 = test_scope();
    let mut s2 = s1.dup();

    s2.set_tag("k", "v");

    assert!(!s1.tags().contains_key("k"));
    assert_eq!(s2.tags()["k"], json!("v"));
}

#[test]
fn test_fork_copies_state() {
    let original = populated_scope();
    let fork = original.dup();

    assert_eq!(fork.tags(), original.tags());
    assert_eq!(fork.user(), original.user());
    assert_eq!(fork.extra(), original.extra());
    assert_eq!(fork.contexts(), original.contexts());
    assert_eq!(fork.fingerprint(), original.fingerprint());
    assert_eq!(fork.transaction_names(), original.transaction_names());
    assert_eq!(fork.level(), original.level());
    assert_eq!(fork.breadcrumbs().snapshot(), original.breadcrumbs().snapshot());
    assert_eq!(fork.event_processors().names(), vec!["parent"]);
}

#[test]
fn test_fork_independent_in_both_directions() {
    let mut original = populated_scope();
    let mut fork = original.dup();

    fork.set_extra("fork_only", true);
    fork.set_fingerprint(json!(["fork"])).unwrap();
    fork.set_transaction_name("child");
    fork.add_breadcrumb(breadcrumb("child step"));
    fork.add_event_processor(MarkerProcessor::new("child"));
    fork.set_level(Level::Debug);

    original.set_user(json!({"id": 2})).unwrap();
    original.set_context("original_only", json!({}));

    assert!(!original.extra().contains_key("fork_only"));
    assert_eq!(original.fingerprint(), ["{{ default }}"]);
    assert_eq!(original.transaction_name(), Some("parent"));
    assert_eq!(original.breadcrumbs().len(), 1);
    assert_eq!(original.event_processors().len(), 1);
    assert_eq!(original.level(), Level::Error);

    assert_eq!(fork.user()["id"], json!(1));
    assert!(!fork.contexts().contains_key("original_only"));
    assert_eq!(fork.transaction_names(), ["parent", "child"]);
    assert_eq!(fork.breadcrumbs().len(), 2);
}

#[test]
fn test_fork_breadcrumb_log_is_new_instance() {
    let original = populated_scope();
    let fork = original.dup();

    assert!(!fork.breadcrumbs().same_log(original.breadcrumbs()));
    assert_eq!(fork.breadcrumbs().capacity(), original.breadcrumbs().capacity());
}

#[test]
fn test_fork_applies_to_events_independently() {
    let parent = populated_scope();
    let mut child = parent.dup();
    child.set_tag("service", "worker");
    child.add_event_processor(MarkerProcessor::new("child"));

    let parent_event = parent.apply_to_event(Event::new()).unwrap().unwrap();
    let child_event = child.apply_to_event(Event::new()).unwrap().unwrap();

    assert_eq!(parent_event.tags["service"], json!("api"));
    assert_eq!(child_event.tags["service"], json!("worker"));
    assert_eq!(parent_event.extra["markers"], json!(["parent"]));
    assert_eq!(child_event.extra["markers"], json!(["parent", "child"]));
}

#[test]
fn test_fork_moves_across_threads() {
    let parent = populated_scope();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut child = parent.dup();
            thread::spawn(move || {
                child.set_tag("worker", i);
                child.add_breadcrumb(breadcrumb(&format!("worker {i}")));
                child.apply_to_event(Event::new()).unwrap().unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let event = handle.join().unwrap();
        assert_eq!(event.tags["worker"], json!(i));
        assert_eq!(event.breadcrumbs.map(|log| log.len()), Some(2));
    }

    assert!(!parent.tags().contains_key("worker"));
    assert_eq!(parent.breadcrumbs().len(), 1);
}

proptest! {
    #[test]
    fn prop_fork_mutations_never_leak(
        keys in proptest::collection::vec("[a-z]{1,6}", 1..8),
        value in any::<i64>(),
    ) {
        let original = populated_scope();
        let before_tags = original.tags().clone();
        let before_extra = original.extra().clone();
        let before_contexts = original.contexts().clone();

        let mut fork = original.dup();
        for key in &keys {
            fork.set_tag(key.as_str(), value);
            fork.set_extra(key.as_str(), json!({"v": value}));
            fork.set_context(key.as_str(), json!({"v": value}));
        }

        prop_assert_eq!(original.tags(), &before_tags);
        prop_assert_eq!(original.extra(), &before_extra);
        prop_assert_eq!(original.contexts(), &before_contexts);
    }

    #[test]
    fn prop_event_tags_win_on_collision(
        scope_tags in proptest::collection::btree_map("[a-d]", "[a-z]{1,4}", 0..4),
        event_tags in proptest::collection::btree_map("[a-d]", "[A-Z]{1,4}", 0..4),
    ) {
        let mut scope = test_scope();
        for (k, v) in &scope_tags {
            scope.set_tag(k.as_str(), v.as_str());
        }
        let mut event = Event::new();
        for (k, v) in &event_tags {
            event.tags.insert(k.clone(), json!(v));
        }

        let event = scope.apply_to_event(event).unwrap().unwrap();

        for (k, v) in &event_tags {
            prop_assert_eq!(&event.tags[k.as_str()], &json!(v));
        }
        for (k, v) in &scope_tags {
            if !event_tags.contains_key(k) {
                prop_assert_eq!(&event.tags[k.as_str()], &json!(v));
            }
        }
    }
}
