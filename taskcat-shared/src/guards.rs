/// Existence guards
///
/// A guard looks up a referenced entity before the statement that depends on
/// it runs. When the lookup misses, the caller gets `Guard::Missing` with a
/// ready-made not-found outcome and must return it without touching the
/// store again.
///
/// # Example
///
/// ```no_run
/// use taskcat_shared::guards::{require_user, Guard};
/// use taskcat_shared::ops::Outcome;
/// use taskcat_shared::store::TaskRepository;
///
/// # async fn example(repo: &dyn TaskRepository) -> taskcat_shared::error::CliResult<Outcome> {
/// let user = match require_user(repo, 42).await? {
///     Guard::Passed(user) => user,
///     Guard::Missing(outcome) => return Ok(outcome),
/// };
/// # Ok(Outcome::Done(user.fullname))
/// # }
/// ```

use tracing::debug;

use crate::error::CliResult;
use crate::models::{Status, User};
use crate::ops::Outcome;
use crate::store::TaskRepository;

/// Result of an existence check
#[derive(Debug, Clone, PartialEq)]
pub enum Guard<T> {
    /// The entity exists
    Passed(T),

    /// The entity is missing; return this outcome as-is
    Missing(Outcome),
}

impl<T> Guard<T> {
    pub fn passed(&self) -> bool {
        matches!(self, Guard::Passed(_))
    }
}

/// Requires a user with this ID
pub async fn require_user<R>(repo: &R, id: i32) -> CliResult<Guard<User>>
where
    R: TaskRepository + ?Sized,
{
    match repo.find_user(id).await? {
        Some(user) => Ok(Guard::Passed(user)),
        None => {
            debug!(user_id = id, "Guard miss: user");
            Ok(Guard::Missing(Outcome::NotFound(format!(
                "No user found with ID {}.",
                id
            ))))
        }
    }
}

/// Requires a status with this exact name
pub async fn require_status<R>(repo: &R, name: &str) -> CliResult<Guard<Status>>
where
    R: TaskRepository + ?Sized,
{
    match repo.find_status_by_name(name).await? {
        Some(status) => Ok(Guard::Passed(status)),
        None => {
            debug!(status = name, "Guard miss: status");
            Ok(Guard::Missing(Outcome::NotFound(format!(
                "No status found with name {}.",
                name
            ))))
        }
    }
}

/// Requires a status given either as its numeric ID or as its name
pub async fn require_status_ref<R>(repo: &R, raw: &str) -> CliResult<Guard<Status>>
where
    R: TaskRepository + ?Sized,
{
    let raw = raw.trim();
    let Ok(id) = raw.parse::<i32>() else {
        return require_status(repo, raw).await;
    };

    match repo.find_status_by_id(id).await? {
        Some(status) => Ok(Guard::Passed(status)),
        None => {
            debug!(status_id = id, "Guard miss: status");
            Ok(Guard::Missing(Outcome::NotFound(format!(
                "No status found with ID {}.",
                id
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use crate::store::MemoryTaskRepository;

    #[tokio::test]
    async fn test_require_user() {
        let repo = MemoryTaskRepository::new();
        let ada = repo
            .create_user(CreateUser {
                fullname: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            require_user(&repo, ada.id).await.unwrap(),
            Guard::Passed(ada.clone())
        );
        assert_eq!(
            require_user(&repo, 404).await.unwrap(),
            Guard::Missing(Outcome::NotFound("No user found with ID 404.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_require_status_by_name_is_exact() {
        let repo = MemoryTaskRepository::new();
        assert!(require_status(&repo, "in progress").await.unwrap().passed());
        assert!(!require_status(&repo, "In Progress").await.unwrap().passed());
        assert!(!require_status(&repo, "im progress").await.unwrap().passed());
    }

    #[tokio::test]
    async fn test_require_status_ref_accepts_id_or_name() {
        let repo = MemoryTaskRepository::new();

        match require_status_ref(&repo, " 3 ").await.unwrap() {
            Guard::Passed(status) => assert_eq!(status.name, "completed"),
            other => panic!("expected completed, got {:?}", other),
        }
        match require_status_ref(&repo, "new").await.unwrap() {
            Guard::Passed(status) => assert_eq!(status.id, 1),
            other => panic!("expected new, got {:?}", other),
        }
        assert_eq!(
            require_status_ref(&repo, "9").await.unwrap(),
            Guard::Missing(Outcome::NotFound("No status found with ID 9.".to_string()))
        );
    }
}
