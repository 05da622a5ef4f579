//! Request decision logic for the todo-list actions.
//!
//! # Design
//! `RequestHandler` never performs I/O. Each action normalizes its input,
//! calls into the borrowed `ListStore`, and returns a `Decision` describing
//! what the transport should do next: redirect, redisplay a form, answer an
//! asynchronous caller with a bare path, or answer with no content. Missing
//! records surface as `TodoError::NotFound` from the store and are turned
//! into redirects here, so transports never see a hard failure.

use tracing::{debug, info};

use crate::error::{Entity, TodoError};
use crate::store::ListStore;
use crate::view::{Flash, Form, ListDetail, ListSummary};

pub const LISTS_PATH: &str = "/lists";

pub fn list_path(list_id: u64) -> String {
    format!("{LISTS_PATH}/{list_id}")
}

/// What the transport should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the client to another location.
    Redirect(String),
    /// Show the form again with the submitted value and its error.
    Rerender(Form),
    /// Reply to an asynchronous caller with a bare path string.
    Location(String),
    /// Reply to an asynchronous caller with an empty body.
    NoContent,
}

/// The result of one action: where to go next and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub flash: Flash,
}

impl Decision {
    fn redirect(path: impl Into<String>, flash: Flash) -> Self {
        Self {
            outcome: Outcome::Redirect(path.into()),
            flash,
        }
    }

    fn rerender(form: Form) -> Self {
        Self {
            outcome: Outcome::Rerender(form),
            flash: Flash::default(),
        }
    }

    /// Recovery for a missing list or todo: go back one level with the
    /// error as a flash message.
    pub fn not_found(list_id: u64, err: &TodoError) -> Self {
        let target = match err {
            TodoError::NotFound(Entity::Todo) => list_path(list_id),
            _ => LISTS_PATH.to_string(),
        };
        info!(list_id, target = %target, "{err}");
        Self::redirect(target, Flash::error(err.to_string()))
    }

    /// Back to the index when no list id could be read at all.
    pub fn list_not_found() -> Self {
        let err = TodoError::NotFound(Entity::List);
        Self::redirect(LISTS_PATH, Flash::error(err.to_string()))
    }
}

/// Applies one action to a single session's store.
pub struct RequestHandler<'a> {
    store: &'a mut ListStore,
}

impl<'a> RequestHandler<'a> {
    pub fn new(store: &'a mut ListStore) -> Self {
        Self { store }
    }

    pub fn lists_page(&self) -> Vec<ListSummary> {
        self.store
            .sorted_lists()
            .into_iter()
            .map(ListSummary::from)
            .collect()
    }

    pub fn list_page(&self, list_id: u64) -> Result<ListDetail, Decision> {
        self.store
            .find(list_id)
            .map(ListDetail::from)
            .map_err(|err| Decision::not_found(list_id, &err))
    }

    pub fn new_list_form(&self) -> Form {
        Form::NewList {
            list_name: String::new(),
            error: None,
        }
    }

    pub fn edit_list_form(&self, list_id: u64) -> Result<Form, Decision> {
        let list = self
            .store
            .find(list_id)
            .map_err(|err| Decision::not_found(list_id, &err))?;
        Ok(Form::EditList {
            list_id,
            list_name: list.name.clone(),
            error: None,
        })
    }

    pub fn create_list(&mut self, list_name: &str) -> Decision {
        let list_name = list_name.trim();
        match self.store.create(list_name) {
            Ok(list) => {
                debug!(list_id = list.id, "create_list accepted");
                Decision::redirect(LISTS_PATH, Flash::success("The list has been created."))
            }
            Err(err) => {
                debug!(error = %err, "create_list rejected");
                Decision::rerender(Form::NewList {
                    list_name: list_name.to_string(),
                    error: Some(err.to_string()),
                })
            }
        }
    }

    pub fn rename_list(&mut self, list_id: u64, list_name: &str) -> Decision {
        let list_name = list_name.trim();
        match self.store.rename(list_id, list_name) {
            Ok(()) => Decision::redirect(
                list_path(list_id),
                Flash::success("The list has been updated."),
            ),
            Err(err) if err.is_not_found() => Decision::not_found(list_id, &err),
            Err(err) => {
                debug!(list_id, error = %err, "rename_list rejected");
                Decision::rerender(Form::EditList {
                    list_id,
                    list_name: list_name.to_string(),
                    error: Some(err.to_string()),
                })
            }
        }
    }

    /// Deleting an id that is already gone still succeeds, so a repeated
    /// request lands in the same place.
    pub fn delete_list(&mut self, list_id: u64, asynchronous: bool) -> Decision {
        self.store.delete(list_id);
        let flash = Flash::success("The list has been deleted.");
        if asynchronous {
            Decision {
                outcome: Outcome::Location(LISTS_PATH.to_string()),
                flash,
            }
        } else {
            Decision::redirect(LISTS_PATH, flash)
        }
    }

    pub fn add_todo(&mut self, list_id: u64, todo_name: &str) -> Decision {
        let todo_name = todo_name.trim();
        match self.store.add_todo(list_id, todo_name) {
            Ok(todo) => {
                debug!(list_id, todo_id = todo.id, "add_todo accepted");
                Decision::redirect(list_path(list_id), Flash::success("The todo was added."))
            }
            Err(err) if err.is_not_found() => Decision::not_found(list_id, &err),
            Err(err) => {
                debug!(list_id, error = %err, "add_todo rejected");
                match self.store.find(list_id) {
                    Ok(list) => Decision::rerender(Form::AddTodo {
                        list: ListDetail::from(list),
                        todo: todo_name.to_string(),
                        error: Some(err.to_string()),
                    }),
                    Err(err) => Decision::not_found(list_id, &err),
                }
            }
        }
    }

    pub fn delete_todo(&mut self, list_id: u64, todo_id: u64, asynchronous: bool) -> Decision {
        if let Err(err) = self.store.delete_todo(list_id, todo_id) {
            return Decision::not_found(list_id, &err);
        }
        if asynchronous {
            Decision {
                outcome: Outcome::NoContent,
                flash: Flash::default(),
            }
        } else {
            Decision::redirect(
                list_path(list_id),
                Flash::success("The todo has been deleted."),
            )
        }
    }

    pub fn toggle_todo(&mut self, list_id: u64, todo_id: u64, completed: bool) -> Decision {
        match self.store.set_todo_completed(list_id, todo_id, completed) {
            Ok(()) => Decision::redirect(
                list_path(list_id),
                Flash::success("The todo has been updated."),
            ),
            Err(err) => Decision::not_found(list_id, &err),
        }
    }

    pub fn complete_all(&mut self, list_id: u64) -> Decision {
        match self.store.complete_all(list_id) {
            Ok(()) => Decision::redirect(
                list_path(list_id),
                Flash::success("All todos have been completed."),
            ),
            Err(err) => Decision::not_found(list_id, &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect_target(decision: &Decision) -> &str {
        match &decision.outcome {
            Outcome::Redirect(path) => path,
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn create_list_trims_and_redirects() {
        let mut store = ListStore::new();
        let decision = RequestHandler::new(&mut store).create_list("  Groceries  ");
        assert_eq!(redirect_target(&decision), "/lists");
        assert_eq!(decision.flash.success.as_deref(), Some("The list has been created."));
        assert_eq!(store.find(1).unwrap().name, "Groceries");
    }

    #[test]
    fn create_list_rerenders_with_submitted_name() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Groceries");
        let decision = handler.create_list("Groceries");
        assert_eq!(
            decision.outcome,
            Outcome::Rerender(Form::NewList {
                list_name: "Groceries".to_string(),
                error: Some("List name must be unique.".to_string()),
            })
        );
        assert!(decision.flash.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rename_list_goes_to_detail_page() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let decision = handler.rename_list(1, "Office");
        assert_eq!(redirect_target(&decision), "/lists/1");
        assert_eq!(store.find(1).unwrap().name, "Office");
    }

    #[test]
    fn rename_list_with_blank_name_rerenders_edit_form() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let decision = handler.rename_list(1, "   ");
        match decision.outcome {
            Outcome::Rerender(form @ Form::EditList { .. }) => {
                assert_eq!(form.error(), Some("List name must be between 1 and 100 characters."));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rename_missing_list_redirects_to_index() {
        let mut store = ListStore::new();
        let decision = RequestHandler::new(&mut store).rename_list(4, "Nope");
        assert_eq!(redirect_target(&decision), "/lists");
        assert_eq!(
            decision.flash.error.as_deref(),
            Some("The specified list was not found.")
        );
    }

    #[test]
    fn delete_list_asynchronous_returns_path() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let decision = handler.delete_list(1, true);
        assert_eq!(decision.outcome, Outcome::Location("/lists".to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_list_twice_is_not_an_error() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let first = handler.delete_list(1, false);
        let second = handler.delete_list(1, false);
        assert_eq!(first, second);
    }

    #[test]
    fn add_todo_error_redisplays_list() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let decision = handler.add_todo(1, "");
        match decision.outcome {
            Outcome::Rerender(Form::AddTodo { list, todo, error }) => {
                assert_eq!(list.id, 1);
                assert_eq!(todo, "");
                assert_eq!(
                    error.as_deref(),
                    Some("Todo name must be between 1 and 100 characters.")
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn add_todo_to_missing_list_redirects() {
        let mut store = ListStore::new();
        let decision = RequestHandler::new(&mut store).add_todo(2, "Milk");
        assert_eq!(redirect_target(&decision), "/lists");
    }

    #[test]
    fn delete_todo_uses_deleted_message() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        handler.add_todo(1, "Email");
        let decision = handler.delete_todo(1, 1, false);
        assert_eq!(redirect_target(&decision), "/lists/1");
        assert_eq!(decision.flash.success.as_deref(), Some("The todo has been deleted."));
    }

    #[test]
    fn delete_todo_asynchronous_has_no_content_and_no_flash() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        handler.add_todo(1, "Email");
        let decision = handler.delete_todo(1, 1, true);
        assert_eq!(decision.outcome, Outcome::NoContent);
        assert!(decision.flash.is_empty());
    }

    #[test]
    fn toggle_missing_todo_returns_to_list() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        let decision = handler.toggle_todo(1, 7, true);
        assert_eq!(redirect_target(&decision), "/lists/1");
        assert_eq!(
            decision.flash.error.as_deref(),
            Some("The specified todo was not found.")
        );
    }

    #[test]
    fn list_not_found_matches_missing_list_recovery() {
        assert_eq!(
            Decision::list_not_found(),
            Decision::not_found(9, &TodoError::NotFound(Entity::List))
        );
    }

    #[test]
    fn list_page_missing_list() {
        let mut store = ListStore::new();
        let handler = RequestHandler::new(&mut store);
        let decision = handler.list_page(3).unwrap_err();
        assert_eq!(redirect_target(&decision), "/lists");
    }

    #[test]
    fn edit_form_prefills_current_name() {
        let mut store = ListStore::new();
        let mut handler = RequestHandler::new(&mut store);
        handler.create_list("Work");
        assert_eq!(
            handler.edit_list_form(1).unwrap(),
            Form::EditList {
                list_id: 1,
                list_name: "Work".to_string(),
                error: None,
            }
        );
    }
}
