//! Domain records kept in a session's store.
//!
//! # Design
//! Both records serialize directly into the JSON view models, so the field
//! names here are the field names clients see.

use serde::{Deserialize, Serialize};

/// A single entry in a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// A named list of todos, kept in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl List {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }

    /// A list is complete once it has todos and every one of them is done.
    pub fn is_complete(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.completed)
    }

    pub fn todos_count(&self) -> usize {
        self.todos.len()
    }

    pub fn todos_remaining(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// Incomplete todos first, then completed ones, each group in insertion
    /// order.
    pub fn sorted_todos(&self) -> Vec<&Todo> {
        completion_order(&self.todos, |todo| todo.completed)
    }

    pub(crate) fn todo_mut(&mut self, todo_id: u64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}

/// Stable partition of `items` into not-done followed by done.
pub(crate) fn completion_order<T, F>(items: &[T], done: F) -> Vec<&T>
where
    F: Fn(&T) -> bool,
{
    let (complete, mut ordered): (Vec<&T>, Vec<&T>) = items.iter().partition(|item| done(item));
    ordered.extend(complete);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: u64, completed: bool) -> Todo {
        Todo {
            id,
            name: format!("todo {id}"),
            completed,
        }
    }

    #[test]
    fn empty_list_is_not_complete() {
        assert!(!List::new(1, "Empty").is_complete());
    }

    #[test]
    fn list_with_open_todo_is_not_complete() {
        let mut list = List::new(1, "Chores");
        list.todos = vec![todo(1, true), todo(2, false)];
        assert!(!list.is_complete());
        assert_eq!(list.todos_count(), 2);
        assert_eq!(list.todos_remaining(), 1);
    }

    #[test]
    fn list_with_all_done_is_complete() {
        let mut list = List::new(1, "Chores");
        list.todos = vec![todo(1, true), todo(2, true)];
        assert!(list.is_complete());
        assert_eq!(list.todos_remaining(), 0);
    }

    #[test]
    fn sorted_todos_puts_open_items_first() {
        let mut list = List::new(1, "Chores");
        list.todos = vec![todo(1, true), todo(2, false), todo(3, true), todo(4, false)];
        let ids: Vec<u64> = list.sorted_todos().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn todo_defaults_completed_to_false() {
        let todo: Todo = serde_json::from_str(r#"{"id":3,"name":"Milk"}"#).unwrap();
        assert!(!todo.completed);
    }
}
