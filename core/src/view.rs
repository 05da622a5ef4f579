//! View models handed to the transport layer.
//!
//! # Design
//! These are plain serializable snapshots. They borrow nothing from the
//! store, so a caller can release its session lock before encoding them.

use serde::{Deserialize, Serialize};

use crate::types::{List, Todo};

/// One-shot messages shown on the next rendered view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_none() && self.error.is_none()
    }

    /// Overwrite the messages that `other` sets, keep the rest.
    pub fn absorb(&mut self, other: Flash) {
        if other.success.is_some() {
            self.success = other.success;
        }
        if other.error.is_some() {
            self.error = other.error;
        }
    }
}

/// Row on the lists index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSummary {
    pub id: u64,
    pub name: String,
    pub complete: bool,
    pub todos_count: usize,
    pub todos_remaining: usize,
}

impl From<&List> for ListSummary {
    fn from(list: &List) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            complete: list.is_complete(),
            todos_count: list.todos_count(),
            todos_remaining: list.todos_remaining(),
        }
    }
}

/// A single list with its todos in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListDetail {
    pub id: u64,
    pub name: String,
    pub complete: bool,
    pub todos: Vec<Todo>,
}

impl From<&List> for ListDetail {
    fn from(list: &List) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            complete: list.is_complete(),
            todos: list.sorted_todos().into_iter().cloned().collect(),
        }
    }
}

/// A form to display, optionally carrying the rejected input and the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Form {
    NewList {
        list_name: String,
        error: Option<String>,
    },
    EditList {
        list_id: u64,
        list_name: String,
        error: Option<String>,
    },
    AddTodo {
        list: ListDetail,
        todo: String,
        error: Option<String>,
    },
}

impl Form {
    pub fn error(&self) -> Option<&str> {
        match self {
            Form::NewList { error, .. } | Form::EditList { error, .. } | Form::AddTodo { error, .. } => {
                error.as_deref()
            }
        }
    }
}
