//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL`. The pool is
//! created once at startup and cloned into the application state.
//!
//! # Panics
//!
//! [`init_db_pool`] panics if `DATABASE_URL` is unset or the database
//! cannot be reached; the server is useless without it.

use sqlx::PgPool;
use std::env;

pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
