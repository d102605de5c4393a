/// Owner-scoped todo endpoints
///
/// Every handler here runs behind the session middleware, so a
/// [`CurrentUser`] extension is always present. The owner id is threaded
/// into every store call; a todo owned by someone else is indistinguishable
/// from one that does not exist and surfaces as 404.
///
/// Mutations redirect home on success, matching the form-driven flow. The
/// list read returns JSON, each item carrying a derived `overdue` flag
/// computed from the wall clock at read time — it is never stored, so the
/// same item can change status between two reads without a write.
///
/// # Endpoints
///
/// - `GET /` - List todos ascending by due time
/// - `POST /` - Create a todo
/// - `GET /update/:id` - Fetch one todo (edit form source)
/// - `POST /update/:id` - Update content and due time
/// - `GET /complete/:id` - Toggle the completed flag
/// - `GET /delete/:id` - Delete permanently

use crate::{
    app::{AppState, CurrentUser},
    error::{AppError, AppResult},
};
use axum::{
    extract::{Extension, Path, State},
    response::Redirect,
    Form, Json,
};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use todue_shared::models::todo::{parse_due_time, validate_content, CreateTodo, Todo};
use uuid::Uuid;

/// Create/update form body
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    /// Item text, 1 to 500 characters
    pub content: String,

    /// Due time in the literal format `YYYY-MM-DDTHH:MM`
    pub due_time: String,
}

/// A todo as returned to the client
///
/// `overdue` is derived at serialization time and never persisted.
#[derive(Debug, Serialize)]
pub struct TodoView {
    /// Todo ID
    pub id: Uuid,

    /// Item text
    pub content: String,

    /// When the item is due
    pub due_time: NaiveDateTime,

    /// Persisted completion flag
    pub completed: bool,

    /// Whether the due time has passed as of this read
    pub overdue: bool,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

impl TodoView {
    /// Builds a view of `todo` as of the instant `now`
    fn from_todo(todo: Todo, now: NaiveDateTime) -> Self {
        let overdue = todo.is_overdue(now);
        Self {
            id: todo.id,
            content: todo.content,
            due_time: todo.due_time,
            completed: todo.completed,
            overdue,
            created_at: todo.created_at,
        }
    }
}

/// Validates and parses a form body into content + due time
fn parse_form(form: TodoForm) -> AppResult<(String, NaiveDateTime)> {
    validate_content(&form.content)?;
    let due_time = parse_due_time(&form.due_time)?;
    Ok((form.content, due_time))
}

/// List the current user's todos, ascending by due time
///
/// Reflects store state at call time; nothing is cached.
pub async fn index(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TodoView>>> {
    let todos = Todo::list_for_owner(&state.db, current.user_id).await?;

    // One clock reading for the whole response
    let now = Local::now().naive_local();
    let views = todos
        .into_iter()
        .map(|todo| TodoView::from_todo(todo, now))
        .collect();

    Ok(Json(views))
}

/// Create a todo owned by the current user
///
/// # Errors
///
/// - `400 Bad Request`: empty or oversized content, or a due time that
///   does not match `YYYY-MM-DDTHH:MM`
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<TodoForm>,
) -> AppResult<Redirect> {
    let (content, due_time) = parse_form(form)?;

    let todo = Todo::create(
        &state.db,
        CreateTodo {
            owner_id: current.user_id,
            content,
            due_time,
        },
    )
    .await?;

    tracing::debug!(todo_id = %todo.id, "Todo created");

    Ok(Redirect::to("/"))
}

/// Fetch one todo for editing
///
/// # Errors
///
/// - `404 Not Found`: no such todo, or owned by another user
pub async fn edit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TodoView>> {
    let todo = Todo::find_owned(&state.db, id, current.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoView::from_todo(todo, Local::now().naive_local())))
}

/// Update a todo's content and due time
///
/// The ownership check and the write are one statement in the store layer.
///
/// # Errors
///
/// - `400 Bad Request`: invalid content or due time
/// - `404 Not Found`: no such todo, or owned by another user
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<TodoForm>,
) -> AppResult<Redirect> {
    let (content, due_time) = parse_form(form)?;

    Todo::update_owned(&state.db, id, current.user_id, content, due_time)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Redirect::to("/"))
}

/// Toggle a todo's completed flag
///
/// # Errors
///
/// - `404 Not Found`: no such todo, or owned by another user
pub async fn complete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    Todo::toggle_owned(&state.db, id, current.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Redirect::to("/"))
}

/// Delete a todo permanently
///
/// # Errors
///
/// - `404 Not Found`: no such todo, or owned by another user
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    let deleted = Todo::delete_owned(&state.db, id, current.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_form_valid() {
        let (content, due_time) = parse_form(TodoForm {
            content: "Buy milk".to_string(),
            due_time: "2025-01-01T10:00".to_string(),
        })
        .unwrap();

        assert_eq!(content, "Buy milk");
        assert_eq!(due_time, naive(2025, 1, 1, 10, 0));
    }

    #[test]
    fn test_parse_form_rejects_empty_content() {
        let result = parse_form(TodoForm {
            content: "".to_string(),
            due_time: "2025-01-01T10:00".to_string(),
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_parse_form_rejects_bad_due_time() {
        let result = parse_form(TodoForm {
            content: "Buy milk".to_string(),
            due_time: "next tuesday".to_string(),
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_view_derives_overdue_from_read_clock() {
        let todo = Todo {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            content: "Buy milk".to_string(),
            due_time: naive(2025, 1, 1, 10, 0),
            completed: false,
            created_at: Utc::now(),
        };

        let before = TodoView::from_todo(todo.clone(), naive(2025, 1, 1, 9, 0));
        assert!(!before.overdue);

        let after = TodoView::from_todo(todo, naive(2025, 1, 1, 11, 0));
        assert!(after.overdue);
    }
}
