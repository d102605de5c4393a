/// Database models for ToDue
///
/// This module contains the database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (username, derived password credential, nickname)
/// - `todo`: To-do items, each owned by exactly one user
///
/// # Example
///
/// ```no_run
/// use todue_shared::models::user::{CreateUser, User};
/// use todue_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         nickname: Some("Alice".to_string()),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod todo;
pub mod user;
