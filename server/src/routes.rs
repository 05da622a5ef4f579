//! HTTP surface for the todo lists.
//!
//! # Design
//! Handlers only translate transport details: path segments into ids, form
//! fields into strings, the `X-Requested-With` header into a flag. All
//! decisions come from `todo_core::RequestHandler`; `respond` turns the
//! returned `Decision` into an axum response and stores its flash in the
//! session.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use serde::{Deserialize, Serialize};
use todo_core::handler::LISTS_PATH;
use todo_core::{Decision, Entity, Flash, ListDetail, ListSummary, Outcome, RequestHandler, TodoError};
use tracing::info;

use crate::session::{Session, SessionId};
use crate::AppState;

pub const ASYNC_HEADER: &str = "x-requested-with";
pub const ASYNC_HEADER_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Deserialize)]
pub struct ListNameInput {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub todo: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletedInput {
    #[serde(default)]
    pub completed: String,
}

/// Body of `GET /lists`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListsPage {
    pub lists: Vec<ListSummary>,
    pub flash: Flash,
}

/// Body of `GET /lists/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListPage {
    pub list: ListDetail,
    pub flash: Flash,
}

/// Body of every form view, including redisplayed invalid submissions.
#[derive(Debug, Serialize)]
pub struct FormPage {
    #[serde(flatten)]
    pub form: todo_core::Form,
    pub flash: Flash,
}

/// Routes that read or change a session's lists.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lists", get(lists).post(create_list))
        .route("/lists/new", get(new_list))
        .route("/lists/{list_id}", get(show_list).post(rename_list))
        .route("/lists/{list_id}/edit", get(edit_list))
        .route("/lists/{list_id}/destroy", post(delete_list))
        .route("/lists/{list_id}/complete_all", post(complete_all))
        .route("/lists/{list_id}/todos", post(add_todo))
        .route("/lists/{list_id}/todos/{todo_id}", post(toggle_todo))
        .route("/lists/{list_id}/todos/{todo_id}/destroy", post(delete_todo))
}

/// Routes that need no session.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

fn is_asynchronous(headers: &HeaderMap) -> bool {
    headers
        .get(ASYNC_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case(ASYNC_HEADER_VALUE))
}

fn parse_list_id(raw: &str) -> Result<u64, Decision> {
    raw.parse().map_err(|_| {
        info!(raw_list_id = %raw, "list id is not a number");
        Decision::list_not_found()
    })
}

fn parse_ids(raw_list: &str, raw_todo: &str) -> Result<(u64, u64), Decision> {
    let list_id = parse_list_id(raw_list)?;
    let todo_id = raw_todo.parse().map_err(|_| {
        info!(list_id, raw_todo_id = %raw_todo, "todo id is not a number");
        Decision::not_found(list_id, &TodoError::NotFound(Entity::Todo))
    })?;
    Ok((list_id, todo_id))
}

/// Execute a decision: keep its flash for the next view and build the reply.
fn respond(decision: Decision, session: &mut Session) -> Response {
    session.flash.absorb(decision.flash);
    match decision.outcome {
        Outcome::Redirect(path) => Redirect::to(&path).into_response(),
        Outcome::Rerender(form) => {
            let page = FormPage {
                form,
                flash: session.take_flash(),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response()
        }
        Outcome::Location(path) => (StatusCode::OK, path).into_response(),
        Outcome::NoContent => StatusCode::NO_CONTENT.into_response(),
    }
}

fn form_page(form: todo_core::Form, session: &mut Session) -> Response {
    Json(FormPage {
        form,
        flash: session.take_flash(),
    })
    .into_response()
}

async fn index() -> Redirect {
    Redirect::to(LISTS_PATH)
}

async fn lists(State(state): State<AppState>, Extension(SessionId(id)): Extension<SessionId>) -> Response {
    state
        .with_session(id, |session| {
            let lists = RequestHandler::new(&mut session.store).lists_page();
            Json(ListsPage {
                lists,
                flash: session.take_flash(),
            })
            .into_response()
        })
        .await
}

async fn new_list(State(state): State<AppState>, Extension(SessionId(id)): Extension<SessionId>) -> Response {
    state
        .with_session(id, |session| {
            let form = RequestHandler::new(&mut session.store).new_list_form();
            form_page(form, session)
        })
        .await
}

async fn create_list(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Form(input): Form<ListNameInput>,
) -> Response {
    state
        .with_session(id, |session| {
            let decision = RequestHandler::new(&mut session.store).create_list(&input.list_name);
            respond(decision, session)
        })
        .await
}

async fn show_list(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
) -> Response {
    state
        .with_session(id, |session| {
            let page = parse_list_id(&raw_list_id)
                .and_then(|list_id| RequestHandler::new(&mut session.store).list_page(list_id));
            match page {
                Ok(list) => Json(ListPage {
                    list,
                    flash: session.take_flash(),
                })
                .into_response(),
                Err(decision) => respond(decision, session),
            }
        })
        .await
}

async fn edit_list(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
) -> Response {
    state
        .with_session(id, |session| {
            let form = parse_list_id(&raw_list_id)
                .and_then(|list_id| RequestHandler::new(&mut session.store).edit_list_form(list_id));
            match form {
                Ok(form) => form_page(form, session),
                Err(decision) => respond(decision, session),
            }
        })
        .await
}

async fn rename_list(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
    Form(input): Form<ListNameInput>,
) -> Response {
    state
        .with_session(id, |session| {
            let decision = parse_list_id(&raw_list_id)
                .map(|list_id| {
                    RequestHandler::new(&mut session.store).rename_list(list_id, &input.list_name)
                })
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}

async fn delete_list(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let asynchronous = is_asynchronous(&headers);
    state
        .with_session(id, |session| {
            let decision = parse_list_id(&raw_list_id)
                .map(|list_id| RequestHandler::new(&mut session.store).delete_list(list_id, asynchronous))
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}

async fn add_todo(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
    Form(input): Form<TodoInput>,
) -> Response {
    state
        .with_session(id, |session| {
            let decision = parse_list_id(&raw_list_id)
                .map(|list_id| RequestHandler::new(&mut session.store).add_todo(list_id, &input.todo))
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}

async fn delete_todo(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path((raw_list_id, raw_todo_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let asynchronous = is_asynchronous(&headers);
    state
        .with_session(id, |session| {
            let decision = parse_ids(&raw_list_id, &raw_todo_id)
                .map(|(list_id, todo_id)| {
                    RequestHandler::new(&mut session.store).delete_todo(list_id, todo_id, asynchronous)
                })
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}

async fn toggle_todo(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path((raw_list_id, raw_todo_id)): Path<(String, String)>,
    Form(input): Form<CompletedInput>,
) -> Response {
    let completed = input.completed == "true";
    state
        .with_session(id, |session| {
            let decision = parse_ids(&raw_list_id, &raw_todo_id)
                .map(|(list_id, todo_id)| {
                    RequestHandler::new(&mut session.store).toggle_todo(list_id, todo_id, completed)
                })
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}

async fn complete_all(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw_list_id): Path<String>,
) -> Response {
    state
        .with_session(id, |session| {
            let decision = parse_list_id(&raw_list_id)
                .map(|list_id| RequestHandler::new(&mut session.store).complete_all(list_id))
                .unwrap_or_else(|decision| decision);
            respond(decision, session)
        })
        .await
}
