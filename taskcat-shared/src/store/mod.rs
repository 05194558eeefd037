//! Store abstractions.
//!
//! Operations talk to `TaskRepository` and `CatStore` rather than to a
//! driver, so the same operation code runs against PostgreSQL/MongoDB in the
//! binaries and against the in-memory stores in tests.

mod memory;
mod mongo;
mod postgres;

pub use memory::{MemoryCatStore, MemoryTaskRepository};
pub use mongo::MongoCatStore;
pub use postgres::PgTaskRepository;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::CliResult;
use crate::models::{
    Cat, CreateTask, CreateUser, InProgressTask, NewCat, Status, StatusCount, Task, User,
    UserTaskCount,
};

/// What an update by name actually touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateEffect {
    /// Documents that matched the filter.
    pub matched: u64,
    /// Documents whose content changed.
    pub modified: u64,
}

impl UpdateEffect {
    /// True when the filter matched nothing.
    pub fn is_miss(&self) -> bool {
        self.matched == 0
    }
}

/// Relational store operations: users, statuses and tasks.
///
/// Mutations return the affected-row count.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    // =========================================================================
    // Lookups
    // =========================================================================

    async fn find_user(&self, id: i32) -> CliResult<Option<User>>;

    async fn find_status_by_name(&self, name: &str) -> CliResult<Option<Status>>;

    async fn find_status_by_id(&self, id: i32) -> CliResult<Option<Status>>;

    async fn list_statuses(&self) -> CliResult<Vec<Status>>;

    async fn find_task(&self, id: i32) -> CliResult<Option<Task>>;

    // =========================================================================
    // Mutations
    // =========================================================================

    async fn create_user(&self, data: CreateUser) -> CliResult<User>;

    /// Deletes a user and, by cascade, the user's tasks.
    async fn delete_user(&self, id: i32) -> CliResult<u64>;

    async fn update_user_name(&self, id: i32, fullname: &str) -> CliResult<u64>;

    async fn create_task(&self, data: CreateTask) -> CliResult<Task>;

    async fn update_task_status(&self, id: i32, status_id: i32) -> CliResult<u64>;

    async fn delete_task(&self, id: i32) -> CliResult<u64>;

    // =========================================================================
    // Reports
    // =========================================================================

    async fn tasks_by_user(&self, user_id: i32) -> CliResult<Vec<Task>>;

    async fn tasks_by_status(&self, status_id: i32) -> CliResult<Vec<Task>>;

    async fn users_without_tasks(&self) -> CliResult<Vec<User>>;

    async fn uncompleted_tasks(&self) -> CliResult<Vec<Task>>;

    async fn users_by_email_fragment(&self, fragment: &str) -> CliResult<Vec<User>>;

    async fn task_counts_by_status(&self) -> CliResult<Vec<StatusCount>>;

    async fn tasks_by_email_domain(&self, domain: &str) -> CliResult<Vec<Task>>;

    async fn tasks_without_description(&self) -> CliResult<Vec<Task>>;

    async fn in_progress_tasks(&self) -> CliResult<Vec<InProgressTask>>;

    async fn users_with_task_counts(&self) -> CliResult<Vec<UserTaskCount>>;
}

/// Document store operations on the cats collection.
#[async_trait]
pub trait CatStore: Send + Sync {
    async fn insert(&self, cat: NewCat) -> CliResult<Cat>;

    /// Every stored document, with all of its fields.
    ///
    /// Reads return documents as stored rather than `Cat`, so a document
    /// with an unexpected field type or extra fields still displays.
    async fn find_all(&self) -> CliResult<Vec<JsonValue>>;

    /// Documents whose name matches `pattern` as a case-insensitive regex.
    ///
    /// The store's own regex engine decides what a valid pattern is and
    /// reports an invalid one as its error.
    async fn find_by_name_pattern(&self, pattern: &str) -> CliResult<Vec<JsonValue>>;

    /// Sets the age of the first cat with exactly this name.
    async fn set_age(&self, name: &str, age: i32) -> CliResult<UpdateEffect>;

    /// Appends a feature to the first cat with exactly this name.
    async fn push_feature(&self, name: &str, feature: &str) -> CliResult<UpdateEffect>;

    /// Deletes the first cat with exactly this name.
    async fn delete_by_name(&self, name: &str) -> CliResult<u64>;

    async fn delete_all(&self) -> CliResult<u64>;
}
