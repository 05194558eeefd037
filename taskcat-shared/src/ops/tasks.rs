//! Relational operations over users, statuses and tasks.

use async_trait::async_trait;
use tracing::debug;
use validator::Validate;

use super::{arg, parse_id, Outcome};
use crate::error::CliResult;
use crate::guards::{require_status, require_status_ref, require_user, Guard};
use crate::menu::{Dispatch, Menu, MenuEntry};
use crate::models::{CreateTask, RenameUser};
use crate::store::TaskRepository;

/// Commands of the task tool, one per menu line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskCommand {
    TasksByUser,
    TasksByStatus,
    UpdateTaskStatus,
    UsersWithoutTasks,
    AddTask,
    UncompletedTasks,
    DeleteTask,
    UsersByEmail,
    UpdateUserName,
    TaskCountByStatus,
    TasksByEmailDomain,
    TasksWithoutDescription,
    InProgressTasks,
    UsersWithTaskCounts,
}

const USER_ID: &str = "Enter user ID: ";
const TASK_ID: &str = "Enter task ID: ";

const TASK_ENTRIES: &[MenuEntry<TaskCommand>] = &[
    MenuEntry {
        key: "1",
        label: "Get tasks by user ID",
        prompts: &[USER_ID],
        command: TaskCommand::TasksByUser,
    },
    MenuEntry {
        key: "2",
        label: "Get tasks by status",
        prompts: &["Enter status (new, in progress, completed): "],
        command: TaskCommand::TasksByStatus,
    },
    MenuEntry {
        key: "3",
        label: "Update task status",
        prompts: &[TASK_ID, "Enter new status (new, in progress, completed): "],
        command: TaskCommand::UpdateTaskStatus,
    },
    MenuEntry {
        key: "4",
        label: "Get users without tasks",
        prompts: &[],
        command: TaskCommand::UsersWithoutTasks,
    },
    MenuEntry {
        key: "5",
        label: "Add task for user",
        prompts: &[
            USER_ID,
            "Enter task title: ",
            "Enter task description: ",
            "Enter status (ID or name): ",
        ],
        command: TaskCommand::AddTask,
    },
    MenuEntry {
        key: "6",
        label: "Get uncompleted tasks",
        prompts: &[],
        command: TaskCommand::UncompletedTasks,
    },
    MenuEntry {
        key: "7",
        label: "Delete task",
        prompts: &[TASK_ID],
        command: TaskCommand::DeleteTask,
    },
    MenuEntry {
        key: "8",
        label: "Find users by email",
        prompts: &["Enter email: "],
        command: TaskCommand::UsersByEmail,
    },
    MenuEntry {
        key: "9",
        label: "Update user name",
        prompts: &[USER_ID, "Enter new name: "],
        command: TaskCommand::UpdateUserName,
    },
    MenuEntry {
        key: "10",
        label: "Get task count by status",
        prompts: &[],
        command: TaskCommand::TaskCountByStatus,
    },
    MenuEntry {
        key: "11",
        label: "Get tasks by email domain",
        prompts: &["Enter email domain: "],
        command: TaskCommand::TasksByEmailDomain,
    },
    MenuEntry {
        key: "12",
        label: "Get tasks without description",
        prompts: &[],
        command: TaskCommand::TasksWithoutDescription,
    },
    MenuEntry {
        key: "13",
        label: "Get in progress tasks",
        prompts: &[],
        command: TaskCommand::InProgressTasks,
    },
    MenuEntry {
        key: "14",
        label: "Get users and task count",
        prompts: &[],
        command: TaskCommand::UsersWithTaskCounts,
    },
];

/// The task tool's menu, in display order
pub static TASK_MENU: Menu<TaskCommand> = Menu::new(TASK_ENTRIES);

/// Task tool operations over any `TaskRepository`
pub struct TaskOps<R> {
    repo: R,
}

impl<R: TaskRepository> TaskOps<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn tasks_by_user(&self, raw_user_id: &str) -> CliResult<Outcome> {
        let user_id = parse_id("user ID", raw_user_id)?;
        if let Guard::Missing(outcome) = require_user(&self.repo, user_id).await? {
            return Ok(outcome);
        }

        let tasks = self.repo.tasks_by_user(user_id).await?;
        Ok(Outcome::rows_or_no_records(
            &tasks,
            format!("No tasks found for user with ID {}.", user_id),
        ))
    }

    pub async fn tasks_by_status(&self, raw_status: &str) -> CliResult<Outcome> {
        let name = raw_status.trim();
        let status = match require_status(&self.repo, name).await? {
            Guard::Passed(status) => status,
            Guard::Missing(outcome) => return Ok(outcome),
        };

        let tasks = self.repo.tasks_by_status(status.id).await?;
        Ok(Outcome::rows_or_no_records(
            &tasks,
            format!("No tasks found with status {}.", name),
        ))
    }

    pub async fn users_without_tasks(&self) -> CliResult<Outcome> {
        let users = self.repo.users_without_tasks().await?;
        Ok(Outcome::rows_or_all_clear(
            &users,
            "All users have tasks assigned to them.",
        ))
    }

    pub async fn uncompleted_tasks(&self) -> CliResult<Outcome> {
        let tasks = self.repo.uncompleted_tasks().await?;
        Ok(Outcome::rows_or_all_clear(&tasks, "All tasks are completed."))
    }

    /// Substring match; `%` and `_` in the input keep their LIKE meaning
    pub async fn users_by_email(&self, fragment: &str) -> CliResult<Outcome> {
        let users = self.repo.users_by_email_fragment(fragment).await?;
        Ok(Outcome::rows_or_no_records(
            &users,
            format!("No users found with email {}.", fragment),
        ))
    }

    pub async fn task_count_by_status(&self) -> CliResult<Outcome> {
        let counts = self.repo.task_counts_by_status().await?;
        Ok(Outcome::rows_or_no_records(&counts, "No tasks found."))
    }

    pub async fn tasks_by_email_domain(&self, raw_domain: &str) -> CliResult<Outcome> {
        let domain = raw_domain.trim();
        let tasks = self.repo.tasks_by_email_domain(domain).await?;
        Ok(Outcome::rows_or_no_records(
            &tasks,
            format!("No tasks found for users with email domain {}.", domain),
        ))
    }

    pub async fn tasks_without_description(&self) -> CliResult<Outcome> {
        let tasks = self.repo.tasks_without_description().await?;
        Ok(Outcome::rows_or_all_clear(
            &tasks,
            "No tasks found without description.",
        ))
    }

    pub async fn in_progress_tasks(&self) -> CliResult<Outcome> {
        let rows = self.repo.in_progress_tasks().await?;
        Ok(Outcome::rows_or_all_clear(&rows, "No tasks are in progress."))
    }

    pub async fn users_with_task_counts(&self) -> CliResult<Outcome> {
        let rows = self.repo.users_with_task_counts().await?;
        Ok(Outcome::rows_or_no_records(&rows, "No users found."))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn update_task_status(&self, raw_task_id: &str, raw_status: &str) -> CliResult<Outcome> {
        let task_id = parse_id("task ID", raw_task_id)?;
        let status = match require_status(&self.repo, raw_status.trim()).await? {
            Guard::Passed(status) => status,
            Guard::Missing(outcome) => return Ok(outcome),
        };

        let affected = self.repo.update_task_status(task_id, status.id).await?;
        debug!(task_id, status_id = status.id, affected, "Updated task status");

        Ok(Outcome::from_affected(
            affected,
            "Task status has been updated.",
            format!("No task found with ID {}.", task_id),
        ))
    }

    /// Adds a task; an empty description is stored as NULL
    pub async fn add_task(
        &self,
        raw_user_id: &str,
        title: &str,
        description: &str,
        raw_status: &str,
    ) -> CliResult<Outcome> {
        let user_id = parse_id("user ID", raw_user_id)?;
        let user = match require_user(&self.repo, user_id).await? {
            Guard::Passed(user) => user,
            Guard::Missing(outcome) => return Ok(outcome),
        };
        let status = match require_status_ref(&self.repo, raw_status).await? {
            Guard::Passed(status) => status,
            Guard::Missing(outcome) => return Ok(outcome),
        };

        let data = CreateTask {
            title: title.to_string(),
            description: Some(description.to_string()).filter(|d| !d.is_empty()),
            status_id: status.id,
            user_id: user.id,
        };
        data.validate()?;

        let task = self.repo.create_task(data).await?;
        debug!(task_id = task.id, user_id, "Added task");

        Ok(Outcome::Done("Task has been added.".to_string()))
    }

    pub async fn delete_task(&self, raw_task_id: &str) -> CliResult<Outcome> {
        let task_id = parse_id("task ID", raw_task_id)?;
        let affected = self.repo.delete_task(task_id).await?;

        Ok(Outcome::from_affected(
            affected,
            "Task has been deleted.",
            format!("No task found with ID {}.", task_id),
        ))
    }

    pub async fn update_user_name(&self, raw_user_id: &str, fullname: &str) -> CliResult<Outcome> {
        let user_id = parse_id("user ID", raw_user_id)?;
        if let Guard::Missing(outcome) = require_user(&self.repo, user_id).await? {
            return Ok(outcome);
        }

        let rename = RenameUser {
            fullname: fullname.to_string(),
        };
        rename.validate()?;

        let affected = self.repo.update_user_name(user_id, &rename.fullname).await?;
        Ok(Outcome::from_affected(
            affected,
            "User name has been updated.",
            format!("No user found with ID {}.", user_id),
        ))
    }
}

#[async_trait]
impl<R: TaskRepository> Dispatch for TaskOps<R> {
    type Command = TaskCommand;

    async fn dispatch(&self, command: TaskCommand, args: Vec<String>) -> CliResult<Outcome> {
        match command {
            TaskCommand::TasksByUser => self.tasks_by_user(arg(&args, 0)).await,
            TaskCommand::TasksByStatus => self.tasks_by_status(arg(&args, 0)).await,
            TaskCommand::UpdateTaskStatus => {
                self.update_task_status(arg(&args, 0), arg(&args, 1)).await
            }
            TaskCommand::UsersWithoutTasks => self.users_without_tasks().await,
            TaskCommand::AddTask => {
                self.add_task(arg(&args, 0), arg(&args, 1), arg(&args, 2), arg(&args, 3))
                    .await
            }
            TaskCommand::UncompletedTasks => self.uncompleted_tasks().await,
            TaskCommand::DeleteTask => self.delete_task(arg(&args, 0)).await,
            TaskCommand::UsersByEmail => self.users_by_email(arg(&args, 0)).await,
            TaskCommand::UpdateUserName => {
                self.update_user_name(arg(&args, 0), arg(&args, 1)).await
            }
            TaskCommand::TaskCountByStatus => self.task_count_by_status().await,
            TaskCommand::TasksByEmailDomain => self.tasks_by_email_domain(arg(&args, 0)).await,
            TaskCommand::TasksWithoutDescription => self.tasks_without_description().await,
            TaskCommand::InProgressTasks => self.in_progress_tasks().await,
            TaskCommand::UsersWithTaskCounts => self.users_with_task_counts().await,
        }
    }
}
