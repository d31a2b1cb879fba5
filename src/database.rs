//! User records over SQLite with sqlx.
//!
//! `UserStore` is the seam; `SqliteUserStore` is the only implementation
//! here. Tests run against an in-memory database.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Column, Row, TypeInfo};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<i64>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    async fn deactivate(&self, id: i64) -> Result<()>;
    async fn all(&self) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL
)";

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, is_active";

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Opens an in-memory database. The pool is capped at one connection so
    /// every query sees the same memory store.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::bootstrap(pool).await
    }

    /// Opens (creating if missing) a database file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::bootstrap(pool).await
    }

    async fn bootstrap(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: NewUser) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (email, password, first_name, last_name, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN ({placeholders}) ORDER BY id"
        );
        let mut query = sqlx::query_as::<_, User>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<User>> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// True when the error is a unique-constraint violation from the database.
pub fn is_unique_violation(err: &Error) -> bool {
    match err {
        Error::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    }
}

/// Column names of an arbitrary query, in result order.
pub async fn column_names(pool: &SqlitePool, sql: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    let Some(row) = rows.first() else {
        return Ok(Vec::new());
    };
    Ok(row
        .columns()
        .iter()
        .map(|column| column.name().to_owned())
        .collect())
}

/// Runs an arbitrary query and renders every value as text, `None` for NULL.
pub async fn rows_as_strings(pool: &SqlitePool, sql: &str) -> Result<Vec<Vec<Option<String>>>> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    let mut table = Vec::with_capacity(rows.len());
    for row in rows {
        let mut rendered = Vec::with_capacity(row.columns().len());
        for (i, column) in row.columns().iter().enumerate() {
            let value = match column.type_info().name() {
                "TEXT" => row.try_get::<Option<String>, _>(i)?,
                "INTEGER" => row.try_get::<Option<i64>, _>(i)?.map(|v| v.to_string()),
                "REAL" => row.try_get::<Option<f64>, _>(i)?.map(|v| v.to_string()),
                "BOOLEAN" => row.try_get::<Option<bool>, _>(i)?.map(|v| v.to_string()),
                _ => None,
            };
            rendered.push(value);
        }
        table.push(rendered);
    }
    Ok(table)
}
