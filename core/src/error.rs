//! Error types for the list store.
//!
//! # Design
//! Every variant is recoverable. The `Display` text is the message shown to
//! the user, so the request handler can attach `err.to_string()` to a flash
//! or a redisplayed form without a second lookup table.

use std::fmt;

/// Which kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    List,
    Todo,
}

impl Entity {
    /// Capitalized form used at the start of a sentence.
    pub fn title(self) -> &'static str {
        match self {
            Entity::List => "List",
            Entity::Todo => "Todo",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::List => write!(f, "list"),
            Entity::Todo => write!(f, "todo"),
        }
    }
}

/// Errors returned by validation and `ListStore` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// The trimmed name is empty or longer than 100 characters.
    #[error("{} name must be between 1 and 100 characters.", .0.title())]
    InvalidLength(Entity),

    /// Another list in the store already uses this name.
    #[error("List name must be unique.")]
    DuplicateName,

    /// No record with the requested id exists.
    #[error("The specified {0} was not found.")]
    NotFound(Entity),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }
}
