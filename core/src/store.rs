//! In-memory collection of lists for one session.
//!
//! # Design
//! `ListStore` owns its lists outright and is handed to request logic by
//! `&mut`, so there is exactly one writer per call. Every lookup is a linear
//! scan by id; positions are never used as identifiers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Entity, TodoError};
use crate::ids::next_id;
use crate::types::{completion_order, List, Todo};
use crate::validation::{validate_list_name, validate_todo_name};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListStore {
    lists: Vec<List>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Validate `name` and append a new, empty list.
    pub fn create(&mut self, name: &str) -> Result<&List, TodoError> {
        validate_list_name(name, self.lists.iter().map(|list| list.name.as_str()))?;
        let id = next_id(self.lists.iter().map(|list| list.id));
        self.lists.push(List::new(id, name));
        debug!(list_id = id, "list created");
        Ok(&self.lists[self.lists.len() - 1])
    }

    pub fn find(&self, id: u64) -> Result<&List, TodoError> {
        self.lists
            .iter()
            .find(|list| list.id == id)
            .ok_or(TodoError::NotFound(Entity::List))
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut List, TodoError> {
        self.lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or(TodoError::NotFound(Entity::List))
    }

    /// Rename a list. The list's current name does not count as a duplicate.
    pub fn rename(&mut self, id: u64, name: &str) -> Result<(), TodoError> {
        self.find(id)?;
        validate_list_name(
            name,
            self.lists
                .iter()
                .filter(|list| list.id != id)
                .map(|list| list.name.as_str()),
        )?;
        let list = self.find_mut(id)?;
        list.name = name.to_string();
        debug!(list_id = id, "list renamed");
        Ok(())
    }

    /// Remove the list with `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: u64) {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        debug!(list_id = id, removed = before != self.lists.len(), "list delete");
    }

    pub fn add_todo(&mut self, list_id: u64, name: &str) -> Result<&Todo, TodoError> {
        let list = self.find_mut(list_id)?;
        validate_todo_name(name)?;
        let id = next_id(list.todos.iter().map(|todo| todo.id));
        list.todos.push(Todo {
            id,
            name: name.to_string(),
            completed: false,
        });
        debug!(list_id, todo_id = id, "todo added");
        Ok(&list.todos[list.todos.len() - 1])
    }

    /// Remove a todo by id. Only a missing list is an error; a missing todo
    /// leaves the list untouched.
    pub fn delete_todo(&mut self, list_id: u64, todo_id: u64) -> Result<(), TodoError> {
        let list = self.find_mut(list_id)?;
        let before = list.todos.len();
        list.todos.retain(|todo| todo.id != todo_id);
        debug!(list_id, todo_id, removed = before != list.todos.len(), "todo delete");
        Ok(())
    }

    pub fn set_todo_completed(
        &mut self,
        list_id: u64,
        todo_id: u64,
        completed: bool,
    ) -> Result<(), TodoError> {
        let todo = self
            .find_mut(list_id)?
            .todo_mut(todo_id)
            .ok_or(TodoError::NotFound(Entity::Todo))?;
        todo.completed = completed;
        debug!(list_id, todo_id, completed, "todo updated");
        Ok(())
    }

    pub fn complete_all(&mut self, list_id: u64) -> Result<(), TodoError> {
        let list = self.find_mut(list_id)?;
        for todo in &mut list.todos {
            todo.completed = true;
        }
        debug!(list_id, "all todos completed");
        Ok(())
    }

    /// Incomplete lists first, then complete ones, each group in creation
    /// order.
    pub fn sorted_lists(&self) -> Vec<&List> {
        completion_order(&self.lists, List::is_complete)
    }
}
