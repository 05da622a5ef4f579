//! Name checks for lists and todos.

use crate::error::{Entity, TodoError};

const MAX_NAME_CHARS: usize = 100;

fn has_valid_length(candidate: &str) -> bool {
    (1..=MAX_NAME_CHARS).contains(&candidate.trim().chars().count())
}

/// Check a list name against the names already in use.
///
/// Uniqueness is tested first and compares the candidate exactly as given;
/// only the length check looks at the trimmed form.
pub fn validate_list_name<'a, I>(candidate: &str, existing: I) -> Result<(), TodoError>
where
    I: IntoIterator<Item = &'a str>,
{
    if existing.into_iter().any(|name| name == candidate) {
        return Err(TodoError::DuplicateName);
    }
    if !has_valid_length(candidate) {
        return Err(TodoError::InvalidLength(Entity::List));
    }
    Ok(())
}

pub fn validate_todo_name(candidate: &str) -> Result<(), TodoError> {
    if has_valid_length(candidate) {
        Ok(())
    } else {
        Err(TodoError::InvalidLength(Entity::Todo))
    }
}
