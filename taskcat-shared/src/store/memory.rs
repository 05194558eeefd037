//! In-memory store implementations for testing.
//!
//! They mirror the constraints the real schema enforces: unique emails,
//! foreign keys on tasks, cascade on user deletion, and first-match
//! semantics for cat updates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::error::{CliError, CliResult};
use crate::models::{
    status, Cat, CreateTask, CreateUser, InProgressTask, NewCat, Status, StatusCount, Task, User,
    UserTaskCount,
};
use crate::store::{CatStore, TaskRepository, UpdateEffect};

/// Compiles a SQL LIKE pattern into an anchored regex.
///
/// `%` matches any run of characters and `_` any single one; a backslash
/// makes the next character literal. Matching is case-sensitive, as LIKE is.
fn like_regex(pattern: &str) -> CliResult<Regex> {
    let mut source = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let literal = match c {
            '%' => {
                source.push_str(".*");
                continue;
            }
            '_' => {
                source.push('.');
                continue;
            }
            '\\' => chars.next().unwrap_or('\\'),
            other => other,
        };
        source.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
    }
    source.push('$');

    RegexBuilder::new(&source)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| CliError::invalid_input("email pattern", pattern, e.to_string()))
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    statuses: BTreeMap<i32, Status>,
    tasks: BTreeMap<i32, Task>,
    next_user_id: i32,
    next_task_id: i32,
}

impl Tables {
    fn status_id(&self, name: &str) -> Option<i32> {
        self.statuses
            .values()
            .find(|s| s.name == name)
            .map(|s| s.id)
    }

    fn tasks_where<F>(&self, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.tasks.values().filter(|t| predicate(t)).cloned().collect()
    }
}

/// In-memory task repository, pre-populated with the fixed statuses.
#[derive(Debug)]
pub struct MemoryTaskRepository {
    tables: RwLock<Tables>,
}

impl MemoryTaskRepository {
    /// Creates an empty repository holding only the statuses.
    pub fn new() -> Self {
        let statuses = status::ALL
            .iter()
            .zip(1..)
            .map(|(name, id)| {
                (
                    id,
                    Status {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        Self {
            tables: RwLock::new(Tables {
                statuses,
                next_user_id: 1,
                next_task_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn find_user(&self, id: i32) -> CliResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_status_by_name(&self, name: &str) -> CliResult<Option<Status>> {
        let tables = self.tables.read().await;
        Ok(tables.statuses.values().find(|s| s.name == name).cloned())
    }

    async fn find_status_by_id(&self, id: i32) -> CliResult<Option<Status>> {
        Ok(self.tables.read().await.statuses.get(&id).cloned())
    }

    async fn list_statuses(&self) -> CliResult<Vec<Status>> {
        Ok(self.tables.read().await.statuses.values().cloned().collect())
    }

    async fn find_task(&self, id: i32) -> CliResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> CliResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(CliError::Conflict("Email already exists".to_string()));
        }

        let id = tables.next_user_id;
        tables.next_user_id += 1;

        let user = User {
            id,
            fullname: data.fullname,
            email: data.email,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> CliResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }
        tables.tasks.retain(|_, task| task.user_id != id);
        Ok(1)
    }

    async fn update_user_name(&self, id: i32, fullname: &str) -> CliResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.fullname = fullname.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn create_task(&self, data: CreateTask) -> CliResult<Task> {
        let mut tables = self.tables.write().await;
        if !tables.statuses.contains_key(&data.status_id) {
            return Err(CliError::Conflict(
                "Constraint violation: tasks_status_id_fkey".to_string(),
            ));
        }
        if !tables.users.contains_key(&data.user_id) {
            return Err(CliError::Conflict(
                "Constraint violation: tasks_user_id_fkey".to_string(),
            ));
        }

        let id = tables.next_task_id;
        tables.next_task_id += 1;

        let task = Task {
            id,
            title: data.title,
            description: data.description,
            status_id: data.status_id,
            user_id: data.user_id,
        };
        tables.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update_task_status(&self, id: i32, status_id: i32) -> CliResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.statuses.contains_key(&status_id) {
            return Err(CliError::Conflict(
                "Constraint violation: tasks_status_id_fkey".to_string(),
            ));
        }
        match tables.tasks.get_mut(&id) {
            Some(task) => {
                task.status_id = status_id;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_task(&self, id: i32) -> CliResult<u64> {
        let mut tables = self.tables.write().await;
        Ok(u64::from(tables.tasks.remove(&id).is_some()))
    }

    async fn tasks_by_user(&self, user_id: i32) -> CliResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks_where(|t| t.user_id == user_id))
    }

    async fn tasks_by_status(&self, status_id: i32) -> CliResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks_where(|t| t.status_id == status_id))
    }

    async fn users_without_tasks(&self) -> CliResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| !tables.tasks.values().any(|t| t.user_id == u.id))
            .cloned()
            .collect())
    }

    async fn uncompleted_tasks(&self) -> CliResult<Vec<Task>> {
        let tables = self.tables.read().await;
        // Comparing against a missing status yields NULL in SQL, matching nothing.
        let Some(completed) = tables.status_id(status::COMPLETED) else {
            return Ok(Vec::new());
        };
        Ok(tables.tasks_where(|t| t.status_id != completed))
    }

    async fn users_by_email_fragment(&self, fragment: &str) -> CliResult<Vec<User>> {
        let like = like_regex(&format!("%{}%", fragment))?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| like.is_match(&u.email))
            .cloned()
            .collect())
    }

    async fn task_counts_by_status(&self) -> CliResult<Vec<StatusCount>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for task in tables.tasks.values() {
            *counts.entry(task.status_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status_id, task_count)| StatusCount {
                status_id,
                task_count,
            })
            .collect())
    }

    async fn tasks_by_email_domain(&self, domain: &str) -> CliResult<Vec<Task>> {
        let like = like_regex(&format!("%@{}", domain))?;
        let tables = self.tables.read().await;
        Ok(tables.tasks_where(|t| {
            tables
                .users
                .get(&t.user_id)
                .map(|u| like.is_match(&u.email))
                .unwrap_or(false)
        }))
    }

    async fn tasks_without_description(&self) -> CliResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks_where(|t| t.description.as_deref().map_or(true, str::is_empty)))
    }

    async fn in_progress_tasks(&self) -> CliResult<Vec<InProgressTask>> {
        let tables = self.tables.read().await;
        let Some(in_progress) = tables.status_id(status::IN_PROGRESS) else {
            return Ok(Vec::new());
        };

        Ok(tables
            .tasks
            .values()
            .filter(|t| t.status_id == in_progress)
            .filter_map(|t| {
                tables.users.get(&t.user_id).map(|u| InProgressTask {
                    user_id: u.id,
                    fullname: u.fullname.clone(),
                    email: u.email.clone(),
                    task_id: t.id,
                    title: t.title.clone(),
                    description: t.description.clone(),
                    status_id: t.status_id,
                })
            })
            .collect())
    }

    async fn users_with_task_counts(&self) -> CliResult<Vec<UserTaskCount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .map(|u| UserTaskCount {
                id: u.id,
                fullname: u.fullname.clone(),
                email: u.email.clone(),
                task_count: tables.tasks.values().filter(|t| t.user_id == u.id).count() as i64,
            })
            .collect())
    }
}

#[derive(Debug, Default)]
struct Collection {
    cats: Vec<Cat>,
    next_id: u64,
}

/// In-memory cat collection, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCatStore {
    collection: RwLock<Collection>,
}

impl MemoryCatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored cats, typed
    pub async fn cats(&self) -> Vec<Cat> {
        self.collection.read().await.cats.clone()
    }
}

fn to_documents<'a>(cats: impl Iterator<Item = &'a Cat>) -> CliResult<Vec<JsonValue>> {
    cats.map(|cat| serde_json::to_value(cat).map_err(CliError::from))
        .collect()
}

/// Name patterns use the `regex` crate's syntax, which has no lookaround or
/// backreferences; MongoDB accepts full PCRE.
#[async_trait]
impl CatStore for MemoryCatStore {
    async fn insert(&self, cat: NewCat) -> CliResult<Cat> {
        let mut collection = self.collection.write().await;
        collection.next_id += 1;
        let cat = cat.with_id(format!("{:024x}", collection.next_id));
        collection.cats.push(cat.clone());
        Ok(cat)
    }

    async fn find_all(&self) -> CliResult<Vec<JsonValue>> {
        to_documents(self.collection.read().await.cats.iter())
    }

    async fn find_by_name_pattern(&self, pattern: &str) -> CliResult<Vec<JsonValue>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CliError::invalid_input("name pattern", pattern, e.to_string()))?;

        let collection = self.collection.read().await;
        to_documents(collection.cats.iter().filter(|c| regex.is_match(&c.name)))
    }

    async fn set_age(&self, name: &str, age: i32) -> CliResult<UpdateEffect> {
        let mut collection = self.collection.write().await;
        match collection.cats.iter_mut().find(|c| c.name == name) {
            Some(cat) => {
                let modified = u64::from(cat.age != age);
                cat.age = age;
                Ok(UpdateEffect {
                    matched: 1,
                    modified,
                })
            }
            None => Ok(UpdateEffect::default()),
        }
    }

    async fn push_feature(&self, name: &str, feature: &str) -> CliResult<UpdateEffect> {
        let mut collection = self.collection.write().await;
        match collection.cats.iter_mut().find(|c| c.name == name) {
            Some(cat) => {
                cat.features.push(feature.to_string());
                Ok(UpdateEffect {
                    matched: 1,
                    modified: 1,
                })
            }
            None => Ok(UpdateEffect::default()),
        }
    }

    async fn delete_by_name(&self, name: &str) -> CliResult<u64> {
        let mut collection = self.collection.write().await;
        match collection.cats.iter().position(|c| c.name == name) {
            Some(index) => {
                collection.cats.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_all(&self) -> CliResult<u64> {
        let mut collection = self.collection.write().await;
        let deleted = collection.cats.len() as u64;
        collection.cats.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> CreateUser {
        CreateUser {
            fullname: name.to_string(),
            email: email.to_string(),
        }
    }

    fn task(title: &str, status_id: i32, user_id: i32) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: None,
            status_id,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_statuses_are_preloaded() {
        let repo = MemoryTaskRepository::new();
        let names: Vec<String> = repo
            .list_statuses()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["new", "in progress", "completed"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MemoryTaskRepository::new();
        repo.create_user(user("Ada", "ada@example.com")).await.unwrap();
        let err = repo
            .create_user(user("Other Ada", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_task_foreign_keys_enforced() {
        let repo = MemoryTaskRepository::new();
        let ada = repo.create_user(user("Ada", "ada@example.com")).await.unwrap();

        assert!(repo.create_task(task("x", 99, ada.id)).await.is_err());
        assert!(repo.create_task(task("x", 1, 99)).await.is_err());
        assert!(repo.create_task(task("x", 1, ada.id)).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let repo = MemoryTaskRepository::new();
        let ada = repo.create_user(user("Ada", "ada@example.com")).await.unwrap();
        let bob = repo.create_user(user("Bob", "bob@example.com")).await.unwrap();
        let a = repo.create_task(task("a", 1, ada.id)).await.unwrap();
        let b = repo.create_task(task("b", 1, bob.id)).await.unwrap();

        assert_eq!(repo.delete_user(ada.id).await.unwrap(), 1);
        assert!(repo.find_task(a.id).await.unwrap().is_none());
        assert!(repo.find_task(b.id).await.unwrap().is_some());
        assert_eq!(repo.delete_user(ada.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_email_domain_matches_suffix_only() {
        let repo = MemoryTaskRepository::new();
        let ada = repo.create_user(user("Ada", "ada@example.com")).await.unwrap();
        let eve = repo
            .create_user(user("Eve", "eve@example.com.evil"))
            .await
            .unwrap();
        repo.create_task(task("a", 1, ada.id)).await.unwrap();
        repo.create_task(task("e", 1, eve.id)).await.unwrap();

        let tasks = repo.tasks_by_email_domain("example.com").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].user_id, ada.id);
    }

    #[tokio::test]
    async fn test_email_fragment_follows_like_wildcards() {
        let repo = MemoryTaskRepository::new();
        repo.create_user(user("Ada", "ada@example.com")).await.unwrap();
        repo.create_user(user("Bob", "bob@example.org")).await.unwrap();

        let emails =
            |users: Vec<User>| -> Vec<String> { users.into_iter().map(|u| u.email).collect() };

        assert_eq!(
            emails(repo.users_by_email_fragment("ada%example").await.unwrap()),
            vec!["ada@example.com"]
        );
        assert_eq!(
            emails(repo.users_by_email_fragment("_da@").await.unwrap()),
            vec!["ada@example.com"]
        );
        assert_eq!(repo.users_by_email_fragment("%").await.unwrap().len(), 2);
        assert_eq!(repo.users_by_email_fragment("EXAMPLE").await.unwrap().len(), 0);

        // Regex metacharacters are literal
        assert!(repo.users_by_email_fragment("a.a").await.unwrap().is_empty());
        // An escaped wildcard is literal too
        assert!(repo.users_by_email_fragment("ada\\%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_domain_accepts_wildcards() {
        let repo = MemoryTaskRepository::new();
        let ada = repo.create_user(user("Ada", "ada@example.com")).await.unwrap();
        let bob = repo.create_user(user("Bob", "bob@example.org")).await.unwrap();
        repo.create_task(task("a", 1, ada.id)).await.unwrap();
        repo.create_task(task("b", 1, bob.id)).await.unwrap();

        assert_eq!(repo.tasks_by_email_domain("example.%").await.unwrap().len(), 2);
        assert_eq!(repo.tasks_by_email_domain("example.co_").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cat_pattern_is_case_insensitive_substring() {
        let store = MemoryCatStore::new();
        for name in ["Whiskers", "whisky", "Tom"] {
            store
                .insert(NewCat {
                    name: name.to_string(),
                    age: 2,
                    features: vec![],
                })
                .await
                .unwrap();
        }

        let found = store.find_by_name_pattern("WHISK").await.unwrap();
        let names: Vec<&str> = found.iter().filter_map(|c| c["name"].as_str()).collect();
        assert_eq!(names, vec!["Whiskers", "whisky"]);

        let err = store.find_by_name_pattern("(").await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_cat_updates_target_first_match() {
        let store = MemoryCatStore::new();
        for age in [1, 2] {
            store
                .insert(NewCat {
                    name: "Tom".to_string(),
                    age,
                    features: vec![],
                })
                .await
                .unwrap();
        }

        let effect = store.set_age("Tom", 9).await.unwrap();
        assert_eq!(effect, UpdateEffect { matched: 1, modified: 1 });

        let ages: Vec<i32> = store.cats().await.iter().map(|c| c.age).collect();
        assert_eq!(ages, vec![9, 2]);

        let unchanged = store.set_age("Tom", 9).await.unwrap();
        assert_eq!(unchanged, UpdateEffect { matched: 1, modified: 0 });
        assert!(store.set_age("Nobody", 1).await.unwrap().is_miss());

        assert_eq!(store.delete_by_name("Tom").await.unwrap(), 1);
        let remaining = store.find_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["age"], 2);
    }
}
