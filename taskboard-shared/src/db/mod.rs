/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded migration runner
///
/// Row mapping lives with the repositories in [`crate::repository::postgres`].

pub mod migrations;
pub mod pool;
