/// Task status enumeration
///
/// Statuses live in their own table so tasks can reference them by id. The
/// rows are created once by the schema migration and never change.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE status (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL UNIQUE
/// );
/// INSERT INTO status (name) VALUES ('new'), ('in progress'), ('completed');
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the status assigned to freshly created tasks
pub const NEW: &str = "new";

/// Name of the status for tasks being worked on
pub const IN_PROGRESS: &str = "in progress";

/// Name of the status for finished tasks
pub const COMPLETED: &str = "completed";

/// Every status the schema creates, in id order
pub const ALL: [&str; 3] = [NEW, IN_PROGRESS, COMPLETED];

/// Status row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    /// Status ID
    pub id: i32,

    /// Unique status name
    pub name: String,
}

impl Status {
    /// Finds a status by its exact name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let status = sqlx::query_as::<_, Status>("SELECT id, name FROM status WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;

        Ok(status)
    }

    /// Finds a status by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let status = sqlx::query_as::<_, Status>("SELECT id, name FROM status WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(status)
    }

    /// Lists all statuses ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let statuses = sqlx::query_as::<_, Status>("SELECT id, name FROM status ORDER BY id")
            .fetch_all(pool)
            .await?;

        Ok(statuses)
    }
}
