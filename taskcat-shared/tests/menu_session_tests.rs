/// Scripted menu sessions over the in-memory stores
///
/// Each test feeds a full operator transcript to the menu loop and checks
/// the plain-text output, the same way an operator would read it.

use std::io::Cursor;

use taskcat_shared::menu::{self, CONTINUE_PROMPT};
use taskcat_shared::models::CreateUser;
use taskcat_shared::ops::{CatOps, TaskOps, CAT_MENU, TASK_MENU};
use taskcat_shared::render::Presenter;
use taskcat_shared::store::{CatStore, MemoryCatStore, MemoryTaskRepository, TaskRepository};

async fn task_session(ops: &TaskOps<MemoryTaskRepository>, script: &str) -> String {
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut output = Vec::new();
    menu::run(&TASK_MENU, ops, Presenter::plain(), &mut input, &mut output)
        .await
        .expect("session failed");
    String::from_utf8(output).expect("output is not UTF-8")
}

async fn cat_session(ops: &CatOps<MemoryCatStore>, script: &str) -> String {
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut output = Vec::new();
    menu::run(&CAT_MENU, ops, Presenter::plain(), &mut input, &mut output)
        .await
        .expect("session failed");
    String::from_utf8(output).expect("output is not UTF-8")
}

#[tokio::test]
async fn test_task_menu_lists_every_command() {
    let ops = TaskOps::new(MemoryTaskRepository::new());
    let out = task_session(&ops, "q\n").await;

    assert!(out.starts_with("1. Get tasks by user ID\n"));
    assert!(out.contains("14. Get users and task count\n"));
    assert!(out.contains("Enter 'q' to quit\n"));
}

#[tokio::test]
async fn test_ada_lovelace_session() {
    let ops = TaskOps::new(MemoryTaskRepository::new());
    let ada = ops
        .repo()
        .create_user(CreateUser {
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap();

    let script = format!(
        "5\n{id}\nWrite paper\n\nnew\n\n\
         3\n1\ncompleted\n\n\
         6\n\n\
         10\n\n\
         q\n",
        id = ada.id
    );
    let out = task_session(&ops, &script).await;

    assert!(out.contains("Task has been added."));
    assert!(out.contains("Task status has been updated."));
    assert!(out.contains("All tasks are completed."));
    assert!(out.contains("Status ID"));
    assert_eq!(out.matches(CONTINUE_PROMPT).count(), 4);

    let tasks = ops.repo().tasks_by_user(ada.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status_id, 3);
}

#[tokio::test]
async fn test_bad_input_keeps_session_alive() {
    let ops = TaskOps::new(MemoryTaskRepository::new());
    let out = task_session(&ops, "1\nabc\n\n7\n12\n\n99\n\n4\n\nq\n").await;

    assert!(out.contains("An error occurred while parsing the input for command 1: Invalid user ID 'abc'"));
    assert!(out.contains("No task found with ID 12."));
    assert!(out.contains("Unknown command: 99"));
    assert!(out.contains("All users have tasks assigned to them."));
}

#[tokio::test]
async fn test_duplicate_email_is_a_store_error() {
    let repo = MemoryTaskRepository::new();
    let user = CreateUser {
        fullname: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    };
    repo.create_user(user.clone()).await.unwrap();

    let err = repo.create_user(user).await.unwrap_err();
    assert!(err.is_store_error());
    assert_eq!(
        menu::describe_failure("0", &err),
        "An error occurred while executing the command 0: Conflict: Email already exists"
    );
}

#[tokio::test]
async fn test_cascade_then_lookup() {
    let ops = TaskOps::new(MemoryTaskRepository::new());
    let ada = ops
        .repo()
        .create_user(CreateUser {
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap();

    let script = format!("5\n{id}\nfirst\nnotes\n1\n\n5\n{id}\nsecond\n\n2\n\nq\n", id = ada.id);
    task_session(&ops, &script).await;

    let ids: Vec<i32> = ops
        .repo()
        .tasks_by_user(ada.id)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids.len(), 2);

    assert_eq!(ops.repo().delete_user(ada.id).await.unwrap(), 1);
    for id in ids {
        assert!(ops.repo().find_task(id).await.unwrap().is_none());
    }

    let out = task_session(&ops, &format!("1\n{}\n\nq\n", ada.id)).await;
    assert!(out.contains(&format!("No user found with ID {}.", ada.id)));
}

#[tokio::test]
async fn test_cat_session() {
    let ops = CatOps::new(MemoryCatStore::new());
    let out = cat_session(
        &ops,
        "1\n\n2\n\n7\n\n2\n\n4\nGhost\n3\n\n4\nGhost\nold\n\nq\n",
    )
    .await;

    assert!(out.starts_with("1. Add random cat\n"));
    assert!(out.contains("Random cat has been added."));
    assert!(out.contains("\"features\": ["));
    assert!(out.contains("All cats have been deleted."));
    assert!(out.contains("No records found."));
    assert!(out.contains("No cats found with the name Ghost."));
    assert!(out.contains("An error occurred while parsing the input for command 4: Invalid age 'old'"));
    assert!(ops.store().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_whiskers_session() {
    let ops = CatOps::new(MemoryCatStore::new());
    ops.store()
        .insert(taskcat_shared::models::NewCat {
            name: "Whiskers".to_string(),
            age: 3,
            features: vec!["fluffy".to_string()],
        })
        .await
        .unwrap();

    let out = cat_session(
        &ops,
        "4\nWhiskers\n4\n\n5\nWhiskers\nvocal\n\n3\nwhisk\n\nq\n",
    )
    .await;

    assert!(out.contains("Age has been updated for cat named Whiskers."));
    assert!(out.contains("Feature has been added to cat named Whiskers."));
    assert!(out.contains("\"name\": \"Whiskers\""));
    assert!(out.contains("\"age\": 4"));
    assert!(out.contains("        \"vocal\"\n"));
}

#[tokio::test]
async fn test_end_of_input_mid_prompt_ends_session() {
    let ops = CatOps::new(MemoryCatStore::new());
    let out = cat_session(&ops, "5\nWhiskers\n").await;
    assert!(out.ends_with("Enter new feature: "));
}
