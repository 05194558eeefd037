/// Data models for taskcat
///
/// # Models
///
/// - `user`: Users and per-user task counts (relational)
/// - `status`: The fixed task status enumeration (relational)
/// - `task`: Tasks and the report rows built from them (relational)
/// - `cat`: Cat documents (document store)
///
/// Relational models carry their own sqlx queries against a `PgPool`;
/// `store::PgTaskRepository` composes them behind the `TaskRepository` trait.

pub mod cat;
pub mod status;
pub mod task;
pub mod user;

pub use cat::{Cat, NewCat};
pub use status::Status;
pub use task::{CreateTask, InProgressTask, StatusCount, Task};
pub use user::{CreateUser, RenameUser, User, UserTaskCount};
