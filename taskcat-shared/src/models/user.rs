/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     fullname VARCHAR(100) NOT NULL,
///     email VARCHAR(100) NOT NULL UNIQUE
/// );
/// ```
///
/// Deleting a user cascades to the user's tasks.
///
/// # Example
///
/// ```no_run
/// use taskcat_shared::models::user::{CreateUser, User};
/// use taskcat_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     fullname: "Ada Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
/// }).await?;
///
/// let found = User::find_by_email_fragment(&pool, "example.com").await?;
/// # Ok(())
/// # }
/// ```

use crate::render::TableRow;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Auto-assigned user ID
    pub id: i32,

    /// Full name
    pub fullname: String,

    /// Email address, unique across all users
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    /// Full name
    #[validate(length(min = 1, max = 100))]
    pub fullname: String,

    /// Email address
    #[validate(email, length(max = 100))]
    pub email: String,
}

/// Input for renaming a user
#[derive(Debug, Clone, Validate)]
pub struct RenameUser {
    /// New full name
    #[validate(length(min = 1, max = 100))]
    pub fullname: String,
}

/// A user together with the number of tasks they own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserTaskCount {
    pub id: i32,
    pub fullname: String,
    pub email: String,
    pub task_count: i64,
}

impl TableRow for User {
    const COLUMNS: &'static [&'static str] = &["User ID", "Full Name", "Email"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.fullname.clone(), self.email.clone()]
    }
}

impl TableRow for UserTaskCount {
    const COLUMNS: &'static [&'static str] = &["User ID", "Full Name", "Email", "Task Count"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.fullname.clone(),
            self.email.clone(),
            self.task_count.to_string(),
        ]
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (fullname, email)
            VALUES ($1, $2)
            RETURNING id, fullname, email
            "#,
        )
        .bind(data.fullname)
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>("SELECT id, fullname, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Finds users whose email contains the given fragment
    ///
    /// The fragment is used as a LIKE pattern, so `%` and `_` keep their
    /// wildcard meaning.
    pub async fn find_by_email_fragment(
        pool: &PgPool,
        fragment: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, fullname, email
            FROM users
            WHERE email LIKE '%' || $1 || '%'
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists users that own no tasks
    pub async fn list_without_tasks(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, fullname, email
            FROM users
            WHERE NOT EXISTS (SELECT 1 FROM tasks WHERE tasks.user_id = users.id)
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists every user with the number of tasks they own
    pub async fn list_with_task_counts(pool: &PgPool) -> Result<Vec<UserTaskCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserTaskCount>(
            r#"
            SELECT users.id, users.fullname, users.email, COUNT(tasks.id) AS task_count
            FROM users
            LEFT JOIN tasks ON users.id = tasks.user_id
            GROUP BY users.id
            ORDER BY users.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Renames a user
    ///
    /// Returns the number of rows affected (0 when the user does not exist).
    pub async fn update_fullname(
        pool: &PgPool,
        id: i32,
        fullname: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET fullname = $1 WHERE id = $2")
            .bind(fullname)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a user
    ///
    /// ⚠️  This also deletes all of the user's tasks due to CASCADE.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUser {
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateUser {
            fullname: "Ada Lovelace".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_name = CreateUser {
            fullname: String::new(),
            email: "ada@example.com".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_rename_length_limit() {
        let too_long = RenameUser {
            fullname: "x".repeat(101),
        };
        assert!(too_long.validate().is_err());

        let ok = RenameUser {
            fullname: "x".repeat(100),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_user_cells_follow_columns() {
        let user = User {
            id: 7,
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(user.cells().len(), User::COLUMNS.len());
        assert_eq!(user.cells()[0], "7");

        let counted = UserTaskCount {
            id: 7,
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            task_count: 3,
        };
        assert_eq!(counted.cells(), vec!["7", "Ada Lovelace", "ada@example.com", "3"]);
    }
}
