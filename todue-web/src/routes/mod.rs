/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and logout
/// - `todos`: Owner-scoped todo list and mutations

pub mod auth;
pub mod health;
pub mod todos;
