/// Database layer
///
/// This module provides the PostgreSQL connection pool and the migration
/// runner used at startup and in tests.
///
/// - `pool`: Connection pool creation and health checks
/// - `migrations`: Embedded schema migrations

pub mod migrations;
pub mod pool;
