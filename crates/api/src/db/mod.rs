//! Database operations for the Prime Drip backend.
//!
//! # Tables
//!
//! - `users`, `roles`, `user_roles` - accounts and role assignments
//! - `categories`, `products` - the catalog
//! - `carts`, `cart_items` - shopping carts for users and guest sessions
//!
//! All queries are parameterized runtime queries against `SQLite`; the schema
//! is created by [`migrate`] at startup. Money columns are stored as TEXT and
//! parsed with `rust_decimal` on read.

pub mod carts;
pub mod categories;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// A single connection is used: `SQLite` permits limited write concurrency,
/// and `sqlite::memory:` databases are per-connection, so size 1 also keeps
/// in-memory test pools coherent.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let opts = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        // Prevent transient "database is locked" errors under concurrent access.
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(opts)
        .await
}

/// Create the schema and seed the role table.
///
/// Idempotent; safe to run on every startup.
///
/// # Errors
///
/// Returns `sqlx::Error` if any statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            phone         TEXT,
            password_hash TEXT NOT NULL,
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS roles (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO roles (id, name) VALUES (1, 'ROLE_USER'), (2, 'ROLE_ADMIN')")
        .execute(pool)
        .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS user_roles (
            user_id INTEGER NOT NULL REFERENCES users(id),
            role_id INTEGER NOT NULL REFERENCES roles(id),
            PRIMARY KEY (user_id, role_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS categories (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            description TEXT
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT,
            price       TEXT NOT NULL,
            stock       INTEGER NOT NULL,
            brand       TEXT NOT NULL,
            image_url   TEXT NOT NULL,
            active      INTEGER NOT NULL,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            tag         TEXT,
            is_featured INTEGER NOT NULL DEFAULT 0,
            audience    TEXT,
            created_at  TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    // Exactly one owner column is set: a cart belongs to a user or to an
    // anonymous session, never both and never neither.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS carts (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER,
            session_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK ((user_id IS NULL) != (session_id IS NULL))
        )
        ",
    )
    .execute(pool)
    .await?;

    // UNIQUE(cart_id, product_id) is what makes add-to-cart an upsert.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS cart_items (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            cart_id    INTEGER NOT NULL REFERENCES carts(id),
            product_id INTEGER NOT NULL,
            quantity   INTEGER NOT NULL,
            unit_price TEXT NOT NULL,
            added_at   TEXT NOT NULL,
            UNIQUE (cart_id, product_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Parse a money column stored as TEXT.
pub(crate) fn parse_money(raw: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid money value {raw:?}: {e}")))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let url = secrecy::SecretString::from("sqlite::memory:");
    let pool = create_pool(&url).await.expect("pool");
    migrate(&pool).await.expect("migrate");
    pool
}
