//! Session-scoped todo lists: validation, id allocation, storage and the
//! decision logic behind each request.
//!
//! # Overview
//! Everything here is synchronous and free of I/O. A transport owns one
//! `ListStore` per client session, lends it to a `RequestHandler` for the
//! duration of a request, and executes the returned `Decision`.
//!
//! # Design
//! - `validation` and `ids` are pure functions with no state.
//! - `ListStore` identifies records by id only; deletes of absent ids are
//!   no-ops so repeated requests are safe.
//! - Not-found is an explicit `TodoError::NotFound`, converted into a
//!   redirect by the handler rather than by the transport.
//! - View models in `view` are owned snapshots, ready for `serde`.

pub mod error;
pub mod handler;
pub mod ids;
pub mod store;
pub mod types;
pub mod validation;
pub mod view;

pub use error::{Entity, TodoError};
pub use handler::{Decision, Outcome, RequestHandler};
pub use ids::next_id;
pub use store::ListStore;
pub use types::{List, Todo};
pub use validation::{validate_list_name, validate_todo_name};
pub use view::{Flash, Form, ListDetail, ListSummary};
