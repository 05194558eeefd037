//! PostgreSQL-backed task repository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::CliResult;
use crate::models::{
    CreateTask, CreateUser, InProgressTask, Status, StatusCount, Task, User, UserTaskCount,
};
use crate::store::TaskRepository;

/// Task repository over a shared connection pool.
///
/// Each call checks a connection out of the pool for one statement; the
/// pool reclaims it whether the statement succeeds or fails.
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_user(&self, id: i32) -> CliResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_status_by_name(&self, name: &str) -> CliResult<Option<Status>> {
        Ok(Status::find_by_name(&self.pool, name).await?)
    }

    async fn find_status_by_id(&self, id: i32) -> CliResult<Option<Status>> {
        Ok(Status::find_by_id(&self.pool, id).await?)
    }

    async fn list_statuses(&self) -> CliResult<Vec<Status>> {
        Ok(Status::list(&self.pool).await?)
    }

    async fn find_task(&self, id: i32) -> CliResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn create_user(&self, data: CreateUser) -> CliResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn delete_user(&self, id: i32) -> CliResult<u64> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn update_user_name(&self, id: i32, fullname: &str) -> CliResult<u64> {
        Ok(User::update_fullname(&self.pool, id, fullname).await?)
    }

    async fn create_task(&self, data: CreateTask) -> CliResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task_status(&self, id: i32, status_id: i32) -> CliResult<u64> {
        Ok(Task::update_status(&self.pool, id, status_id).await?)
    }

    async fn delete_task(&self, id: i32) -> CliResult<u64> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn tasks_by_user(&self, user_id: i32) -> CliResult<Vec<Task>> {
        Ok(Task::list_by_user(&self.pool, user_id).await?)
    }

    async fn tasks_by_status(&self, status_id: i32) -> CliResult<Vec<Task>> {
        Ok(Task::list_by_status(&self.pool, status_id).await?)
    }

    async fn users_without_tasks(&self) -> CliResult<Vec<User>> {
        Ok(User::list_without_tasks(&self.pool).await?)
    }

    async fn uncompleted_tasks(&self) -> CliResult<Vec<Task>> {
        Ok(Task::list_uncompleted(&self.pool).await?)
    }

    async fn users_by_email_fragment(&self, fragment: &str) -> CliResult<Vec<User>> {
        Ok(User::find_by_email_fragment(&self.pool, fragment).await?)
    }

    async fn task_counts_by_status(&self) -> CliResult<Vec<StatusCount>> {
        Ok(Task::count_by_status(&self.pool).await?)
    }

    async fn tasks_by_email_domain(&self, domain: &str) -> CliResult<Vec<Task>> {
        Ok(Task::list_by_email_domain(&self.pool, domain).await?)
    }

    async fn tasks_without_description(&self) -> CliResult<Vec<Task>> {
        Ok(Task::list_without_description(&self.pool).await?)
    }

    async fn in_progress_tasks(&self) -> CliResult<Vec<InProgressTask>> {
        Ok(Task::list_in_progress(&self.pool).await?)
    }

    async fn users_with_task_counts(&self) -> CliResult<Vec<UserTaskCount>> {
        Ok(User::list_with_task_counts(&self.pool).await?)
    }
}
