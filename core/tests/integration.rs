//! Store-level properties and the end-to-end list lifecycle.
//!
//! # Design
//! Drives the public API only, the same way a transport would: one
//! `ListStore`, lent to a `RequestHandler` per action.

use proptest::prelude::*;
use todo_core::{
    next_id, Entity, ListStore, Outcome, RequestHandler, Todo, TodoError,
};

fn store_with_lists(lists: &[(&str, &[bool])]) -> ListStore {
    let mut store = ListStore::new();
    for (name, todos) in lists {
        let list_id = store.create(name).unwrap().id;
        for (i, done) in todos.iter().enumerate() {
            let todo_id = store.add_todo(list_id, &format!("{name} {i}")).unwrap().id;
            store.set_todo_completed(list_id, todo_id, *done).unwrap();
        }
    }
    store
}

#[test]
fn duplicate_and_length_rules() {
    let mut store = store_with_lists(&[("Work", &[])]);
    assert_eq!(store.create("Work").unwrap_err(), TodoError::DuplicateName);
    assert_eq!(
        store.create(" \t ").unwrap_err(),
        TodoError::InvalidLength(Entity::List)
    );
    assert_eq!(
        store.create(&"x".repeat(101)).unwrap_err(),
        TodoError::InvalidLength(Entity::List)
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn next_id_examples() {
    assert_eq!(next_id([2, 5, 7]), 8);
    assert_eq!(next_id(std::iter::empty()), 1);
}

#[test]
fn deleting_missing_ids_is_a_no_op() {
    let mut store = store_with_lists(&[("Work", &[false, true])]);
    let before = store.clone();

    store.delete(42);
    store.delete_todo(1, 42).unwrap();

    assert_eq!(store, before);
}

#[test]
fn sorted_lists_is_a_stable_partition() {
    let store = store_with_lists(&[("A", &[false]), ("B", &[true]), ("C", &[])]);
    let names: Vec<&str> = store.sorted_lists().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "B"]);
}

#[test]
fn is_complete_requires_todos_all_done() {
    let store = store_with_lists(&[("Empty", &[]), ("Mixed", &[true, false]), ("Done", &[true])]);
    let flags: Vec<bool> = store.lists().iter().map(|l| l.is_complete()).collect();
    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn groceries_lifecycle() {
    let mut store = ListStore::new();

    let decision = RequestHandler::new(&mut store).create_list("Groceries");
    assert_eq!(decision.outcome, Outcome::Redirect("/lists".to_string()));
    let list_id = store.lists()[0].id;

    let decision = RequestHandler::new(&mut store).add_todo(list_id, "Milk");
    assert_eq!(decision.outcome, Outcome::Redirect(format!("/lists/{list_id}")));
    assert!(!store.find(list_id).unwrap().is_complete());

    RequestHandler::new(&mut store).toggle_todo(list_id, 1, true);
    assert!(store.find(list_id).unwrap().is_complete());

    RequestHandler::new(&mut store).add_todo(list_id, "Eggs");
    let before = store.find(list_id).unwrap().clone();
    assert_eq!(before.todos_remaining(), 1);

    let decision = RequestHandler::new(&mut store).complete_all(list_id);
    assert_eq!(
        decision.flash.success.as_deref(),
        Some("All todos have been completed.")
    );

    let after = store.find(list_id).unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.name, before.name);
    assert_eq!(
        after.todos,
        vec![
            Todo { id: 1, name: "Milk".to_string(), completed: true },
            Todo { id: 2, name: "Eggs".to_string(), completed: true },
        ]
    );
    assert!(after.is_complete());
}

#[test]
fn lists_page_reflects_sorting_and_counts() {
    let mut store = store_with_lists(&[("Done", &[true]), ("Open", &[false, true])]);
    let page = RequestHandler::new(&mut store).lists_page();
    assert_eq!(page[0].name, "Open");
    assert_eq!(page[0].todos_remaining, 1);
    assert_eq!(page[0].todos_count, 2);
    assert_eq!(page[1].name, "Done");
    assert!(page[1].complete);
}

proptest! {
    #[test]
    fn next_id_exceeds_every_existing_id(ids in proptest::collection::vec(0u64..10_000, 0..50)) {
        let next = next_id(ids.iter().copied());
        prop_assert!(ids.iter().all(|id| *id < next));
        prop_assert!(next >= 1);
    }

    #[test]
    fn sorted_todos_keeps_relative_order(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
        let store = store_with_lists(&[("L", flags.as_slice())]);
        let list = store.find(1).unwrap();
        let sorted: Vec<u64> = list.sorted_todos().iter().map(|t| t.id).collect();

        let open: Vec<u64> = list.todos.iter().filter(|t| !t.completed).map(|t| t.id).collect();
        let done: Vec<u64> = list.todos.iter().filter(|t| t.completed).map(|t| t.id).collect();
        let expected: Vec<u64> = open.into_iter().chain(done).collect();

        prop_assert_eq!(sorted, expected);
    }
}
