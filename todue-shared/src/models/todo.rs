/// Todo model and database operations
///
/// To-do items are the core entity of the system. Every todo is owned by
/// exactly one user, and every query that reads or mutates a single todo
/// carries the owner in its `WHERE` clause. There is deliberately no
/// `find_by_id` without an owner: fetching by id and checking ownership
/// afterwards in application code would open a window for an authorization
/// bypass, so the lookup predicate itself encodes the restriction. A todo
/// owned by someone else is indistinguishable from one that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content VARCHAR(500) NOT NULL,
///     due_time TIMESTAMP NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `due_time` is a naive timestamp: it is stored exactly as the user typed
/// it, with no timezone normalization. "Overdue" is never persisted; it is
/// derived at read time by comparing `due_time` against the current local
/// wall clock, so the same row can change overdue status between two reads
/// without any write occurring.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Input format for due times, matching a standard `datetime-local`
/// form field. Any other shape is a validation failure.
pub const DUE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Maximum length of todo content in characters
pub const MAX_CONTENT_LEN: usize = 500;

/// Validation failures for todo input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    /// Content was empty or whitespace-only
    #[error("content must not be empty")]
    EmptyContent,

    /// Content exceeded [`MAX_CONTENT_LEN`] characters
    #[error("content must be at most {MAX_CONTENT_LEN} characters")]
    ContentTooLong,

    /// Due time did not match [`DUE_TIME_FORMAT`]
    #[error("due time must match the format YYYY-MM-DDTHH:MM")]
    InvalidDueTime,
}

/// Parses a user-supplied due time against the fixed input format
///
/// # Errors
///
/// Returns [`TodoValidationError::InvalidDueTime`] for any string that does
/// not match `YYYY-MM-DDTHH:MM` exactly.
///
/// # Example
///
/// ```
/// use todue_shared::models::todo::parse_due_time;
///
/// assert!(parse_due_time("2025-01-01T10:00").is_ok());
/// assert!(parse_due_time("2025-01-01 10:00").is_err());
/// assert!(parse_due_time("tomorrow").is_err());
/// ```
pub fn parse_due_time(input: &str) -> Result<NaiveDateTime, TodoValidationError> {
    NaiveDateTime::parse_from_str(input, DUE_TIME_FORMAT)
        .map_err(|_| TodoValidationError::InvalidDueTime)
}

/// Validates todo content against the length bounds
///
/// # Errors
///
/// Returns [`TodoValidationError::EmptyContent`] for empty input and
/// [`TodoValidationError::ContentTooLong`] for input over
/// [`MAX_CONTENT_LEN`] characters.
pub fn validate_content(content: &str) -> Result<(), TodoValidationError> {
    if content.trim().is_empty() {
        return Err(TodoValidationError::EmptyContent);
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(TodoValidationError::ContentTooLong);
    }
    Ok(())
}

/// Todo model representing a to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Unique todo ID
    pub id: Uuid,

    /// User this todo belongs to; never reassigned after creation
    pub owner_id: Uuid,

    /// Item text, 1 to 500 characters
    pub content: String,

    /// When the item is due (naive local time, as entered)
    pub due_time: NaiveDateTime,

    /// Whether the item has been marked done
    pub completed: bool,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new todo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    /// Owning user
    pub owner_id: Uuid,

    /// Item text (already validated)
    pub content: String,

    /// Due time (already parsed)
    pub due_time: NaiveDateTime,
}

impl Todo {
    /// Returns whether this todo is overdue as of `now`
    ///
    /// Derived fresh on every read from the current wall clock; never
    /// stored. Callers pass `Local::now().naive_local()` for live reads.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        now >= self.due_time
    }

    /// Creates a new todo owned by `data.owner_id`
    ///
    /// The database sets `created_at` and defaults `completed` to false.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (owner_id, content, due_time)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, content, due_time, completed, created_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.content)
        .bind(data.due_time)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists all todos belonging to `owner_id`, ordered by ascending due time
    ///
    /// Reflects store state at call time; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, content, due_time, completed, created_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY due_time ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds a todo by id, scoped to its owner
    ///
    /// Returns `None` both when no such todo exists and when it exists but
    /// is owned by a different user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, content, due_time, completed, created_at
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Updates content and due time of a todo, scoped to its owner
    ///
    /// A single statement performs both the ownership check and the write,
    /// so the check cannot race with the mutation. Returns `None` if the
    /// todo does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        content: String,
        due_time: NaiveDateTime,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET content = $3, due_time = $4
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, content, due_time, completed, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(content)
        .bind(due_time)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Flips the completed flag of a todo, scoped to its owner
    ///
    /// The flip happens inside the statement (`completed = NOT completed`)
    /// rather than read-modify-write in application code, so two concurrent
    /// toggles resolve at the row level without a lost update. Returns
    /// `None` if the todo does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn toggle_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET completed = NOT completed
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, content, due_time, completed, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Permanently deletes a todo, scoped to its owner
    ///
    /// Returns true if a row was deleted, false if the todo did not exist
    /// or belongs to someone else. There is no soft delete or recovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts todos belonging to `owner_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn count_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
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
    fn test_parse_due_time_valid() {
        let parsed = parse_due_time("2025-01-01T10:00").unwrap();
        assert_eq!(parsed, naive(2025, 1, 1, 10, 0));
    }

    #[test]
    fn test_parse_due_time_rejects_other_formats() {
        assert_eq!(
            parse_due_time("2025-01-01 10:00"),
            Err(TodoValidationError::InvalidDueTime)
        );
        assert_eq!(
            parse_due_time("01/01/2025 10:00"),
            Err(TodoValidationError::InvalidDueTime)
        );
        assert_eq!(parse_due_time(""), Err(TodoValidationError::InvalidDueTime));
        // Seconds are not part of the input format
        assert_eq!(
            parse_due_time("2025-01-01T10:00:30"),
            Err(TodoValidationError::InvalidDueTime)
        );
    }

    #[test]
    fn test_validate_content_empty() {
        assert_eq!(validate_content(""), Err(TodoValidationError::EmptyContent));
        assert_eq!(
            validate_content("   "),
            Err(TodoValidationError::EmptyContent)
        );
    }

    #[test]
    fn test_validate_content_too_long() {
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert_eq!(
            validate_content(&long),
            Err(TodoValidationError::ContentTooLong)
        );
    }

    #[test]
    fn test_validate_content_at_bounds() {
        assert!(validate_content("x").is_ok());
        let max = "x".repeat(MAX_CONTENT_LEN);
        assert!(validate_content(&max).is_ok());
    }

    #[test]
    fn test_is_overdue() {
        let todo = Todo {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            content: "Buy milk".to_string(),
            due_time: naive(2025, 1, 1, 10, 0),
            completed: false,
            created_at: Utc::now(),
        };

        // Before the due time
        assert!(!todo.is_overdue(naive(2025, 1, 1, 9, 59)));
        // Exactly at the due time counts as overdue
        assert!(todo.is_overdue(naive(2025, 1, 1, 10, 0)));
        // After the due time
        assert!(todo.is_overdue(naive(2025, 1, 2, 0, 0)));
    }

    #[test]
    fn test_is_overdue_is_read_time_derived() {
        // The same row flips status purely by the clock moving, no write.
        let todo = Todo {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            content: "Submit report".to_string(),
            due_time: naive(2025, 6, 1, 12, 0),
            completed: false,
            created_at: Utc::now(),
        };

        assert!(!todo.is_overdue(naive(2025, 5, 31, 12, 0)));
        assert!(todo.is_overdue(naive(2025, 6, 2, 12, 0)));
    }

    // Ownership and ordering properties against a live database are in
    // tests/store_tests.rs
}
