/// Task model and database operations
///
/// Tasks belong to a user and carry one of the fixed statuses.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     description TEXT,
///     status_id INTEGER NOT NULL REFERENCES status(id),
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskcat_shared::models::task::{CreateTask, Task};
/// use taskcat_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write paper".to_string(),
///     description: None,
///     status_id: 1,
///     user_id: 1,
/// }).await?;
///
/// Task::update_status(&pool, task.id, 3).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::status;
use crate::render::TableRow;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Auto-assigned task ID
    pub id: i32,

    /// Short title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Status reference
    pub status_id: i32,

    /// Owning user
    pub user_id: i32,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Task title
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    /// Task description (None stores NULL)
    pub description: Option<String>,

    /// Status ID, must reference an existing status
    pub status_id: i32,

    /// Owner ID, must reference an existing user
    pub user_id: i32,
}

/// Number of tasks carrying one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status_id: i32,
    pub task_count: i64,
}

/// A task currently in progress joined with its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InProgressTask {
    pub user_id: i32,
    pub fullname: String,
    pub email: String,
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status_id: i32,
}

impl TableRow for Task {
    const COLUMNS: &'static [&'static str] =
        &["Task ID", "Title", "Description", "Status ID", "User ID"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.description.clone().unwrap_or_default(),
            self.status_id.to_string(),
            self.user_id.to_string(),
        ]
    }
}

impl TableRow for StatusCount {
    const COLUMNS: &'static [&'static str] = &["Status ID", "Task Count"];

    fn cells(&self) -> Vec<String> {
        vec![self.status_id.to_string(), self.task_count.to_string()]
    }
}

impl TableRow for InProgressTask {
    const COLUMNS: &'static [&'static str] = &[
        "User ID",
        "Full Name",
        "Email",
        "Task ID",
        "Title",
        "Description",
        "Status ID",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.fullname.clone(),
            self.email.clone(),
            self.task_id.to_string(),
            self.title.clone(),
            self.description.clone().unwrap_or_default(),
            self.status_id.to_string(),
        ]
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the status or user reference is dangling
    /// (foreign key violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status_id, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status_id)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, status_id, user_id FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks owned by a user
    pub async fn list_by_user(pool: &PgPool, user_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status_id, user_id
            FROM tasks
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks carrying a status
    pub async fn list_by_status(pool: &PgPool, status_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status_id, user_id
            FROM tasks
            WHERE status_id = $1
            ORDER BY id
            "#,
        )
        .bind(status_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks that are not completed
    pub async fn list_uncompleted(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status_id, user_id
            FROM tasks
            WHERE status_id != (SELECT id FROM status WHERE name = $1)
            ORDER BY id
            "#,
        )
        .bind(status::COMPLETED)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks owned by users whose email is at the given domain
    pub async fn list_by_email_domain(
        pool: &PgPool,
        domain: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT tasks.id, tasks.title, tasks.description, tasks.status_id, tasks.user_id
            FROM tasks
            JOIN users ON tasks.user_id = users.id
            WHERE users.email LIKE '%@' || $1
            ORDER BY tasks.id
            "#,
        )
        .bind(domain)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks with a NULL or empty description
    pub async fn list_without_description(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status_id, user_id
            FROM tasks
            WHERE description IS NULL OR description = ''
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists in-progress tasks joined with their owners
    pub async fn list_in_progress(pool: &PgPool) -> Result<Vec<InProgressTask>, sqlx::Error> {
        let rows = sqlx::query_as::<_, InProgressTask>(
            r#"
            SELECT users.id AS user_id, users.fullname, users.email,
                   tasks.id AS task_id, tasks.title, tasks.description, tasks.status_id
            FROM users
            INNER JOIN tasks ON users.id = tasks.user_id
            WHERE tasks.status_id = (SELECT id FROM status WHERE name = $1)
            ORDER BY tasks.id
            "#,
        )
        .bind(status::IN_PROGRESS)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Counts tasks grouped by status
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status_id, COUNT(*) AS task_count
            FROM tasks
            GROUP BY status_id
            ORDER BY status_id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Sets a task's status
    ///
    /// Returns the number of rows affected (0 when the task does not exist).
    pub async fn update_status(pool: &PgPool, id: i32, status_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET status_id = $1 WHERE id = $2")
            .bind(status_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a task
    ///
    /// Returns the number of rows affected (0 when the task does not exist).
    pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
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
    fn test_missing_description_renders_empty() {
        let task = Task {
            id: 1,
            title: "Write paper".to_string(),
            description: None,
            status_id: 1,
            user_id: 2,
        };
        assert_eq!(task.cells(), vec!["1", "Write paper", "", "1", "2"]);
        assert_eq!(task.cells().len(), Task::COLUMNS.len());
    }

    #[test]
    fn test_in_progress_cells_follow_columns() {
        let row = InProgressTask {
            user_id: 2,
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            task_id: 5,
            title: "Notes".to_string(),
            description: Some("On the engine".to_string()),
            status_id: 2,
        };
        assert_eq!(row.cells().len(), InProgressTask::COLUMNS.len());
        assert_eq!(row.cells()[3], "5");
        assert_eq!(row.cells()[5], "On the engine");
    }

    #[test]
    fn test_create_task_title_validation() {
        let empty = CreateTask {
            title: String::new(),
            description: None,
            status_id: 1,
            user_id: 1,
        };
        assert!(empty.validate().is_err());

        let long = CreateTask {
            title: "t".repeat(101),
            description: None,
            status_id: 1,
            user_id: 1,
        };
        assert!(long.validate().is_err());
    }
}
