//! Document operations over the cats collection.

use async_trait::async_trait;
use tracing::debug;

use super::{arg, parse_age, Outcome};
use crate::error::CliResult;
use crate::menu::{Dispatch, Menu, MenuEntry};
use crate::models::NewCat;
use crate::store::CatStore;

/// Commands of the cat tool, one per menu line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatCommand {
    AddRandomCat,
    AllCats,
    CatByName,
    UpdateAge,
    AddFeature,
    DeleteByName,
    DeleteAll,
}

const CAT_NAME: &str = "Enter cat name: ";

const CAT_ENTRIES: &[MenuEntry<CatCommand>] = &[
    MenuEntry {
        key: "1",
        label: "Add random cat",
        prompts: &[],
        command: CatCommand::AddRandomCat,
    },
    MenuEntry {
        key: "2",
        label: "Get all cats",
        prompts: &[],
        command: CatCommand::AllCats,
    },
    MenuEntry {
        key: "3",
        label: "Get cat by name",
        prompts: &[CAT_NAME],
        command: CatCommand::CatByName,
    },
    MenuEntry {
        key: "4",
        label: "Update cat age",
        prompts: &[CAT_NAME, "Enter new age: "],
        command: CatCommand::UpdateAge,
    },
    MenuEntry {
        key: "5",
        label: "Add feature to cat",
        prompts: &[CAT_NAME, "Enter new feature: "],
        command: CatCommand::AddFeature,
    },
    MenuEntry {
        key: "6",
        label: "Delete cat by name",
        prompts: &[CAT_NAME],
        command: CatCommand::DeleteByName,
    },
    MenuEntry {
        key: "7",
        label: "Delete all cats",
        prompts: &[],
        command: CatCommand::DeleteAll,
    },
];

/// The cat tool's menu, in display order
pub static CAT_MENU: Menu<CatCommand> = Menu::new(CAT_ENTRIES);

/// Cat tool operations over any `CatStore`
pub struct CatOps<S> {
    store: S,
}

impl<S: CatStore> CatOps<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts a generated cat
    pub async fn add_random_cat(&self) -> CliResult<Outcome> {
        // thread_rng is not Send; it must be gone before the first await
        let cat = {
            let mut rng = rand::thread_rng();
            NewCat::random(&mut rng)
        };

        let inserted = self.store.insert(cat).await?;
        debug!(id = ?inserted.id, name = %inserted.name, "Inserted cat");
        Ok(Outcome::Done("Random cat has been added.".to_string()))
    }

    pub async fn all_cats(&self) -> CliResult<Outcome> {
        let docs = self.store.find_all().await?;
        if docs.is_empty() {
            return Ok(Outcome::NoRecords("No records found.".to_string()));
        }
        Ok(Outcome::Documents(docs))
    }

    /// Case-insensitive regex search over names
    ///
    /// The pattern goes to the store untouched, so MongoDB's PCRE dialect
    /// (lookahead, backreferences) is available and a pattern the store
    /// rejects is reported as its error.
    pub async fn cat_by_name(&self, pattern: &str) -> CliResult<Outcome> {
        let docs = self.store.find_by_name_pattern(pattern).await?;
        if docs.is_empty() {
            return Ok(Outcome::NoRecords(format!(
                "No cats found with the name {}.",
                pattern
            )));
        }
        Ok(Outcome::Documents(docs))
    }

    /// Sets the age of the first cat with this exact name
    ///
    /// A match that already has this age still counts as success.
    pub async fn update_age(&self, name: &str, raw_age: &str) -> CliResult<Outcome> {
        let age = parse_age(raw_age)?;
        let effect = self.store.set_age(name, age).await?;
        debug!(name, age, ?effect, "Updated cat age");

        if effect.is_miss() {
            return Ok(Outcome::NotFound(format!("No cats found with the name {}.", name)));
        }
        Ok(Outcome::Done(format!("Age has been updated for cat named {}.", name)))
    }

    pub async fn add_feature(&self, name: &str, feature: &str) -> CliResult<Outcome> {
        let effect = self.store.push_feature(name, feature).await?;

        if effect.is_miss() {
            return Ok(Outcome::NotFound(format!("No cats found with the name {}.", name)));
        }
        Ok(Outcome::Done(format!(
            "Feature has been added to cat named {}.",
            name
        )))
    }

    pub async fn delete_by_name(&self, name: &str) -> CliResult<Outcome> {
        let deleted = self.store.delete_by_name(name).await?;
        Ok(Outcome::from_affected(
            deleted,
            format!("Cat with the name {} has been deleted.", name),
            format!("No cats found with the name {}.", name),
        ))
    }

    pub async fn delete_all(&self) -> CliResult<Outcome> {
        let deleted = self.store.delete_all().await?;
        debug!(deleted, "Deleted all cats");
        Ok(Outcome::Done("All cats have been deleted.".to_string()))
    }
}

#[async_trait]
impl<S: CatStore> Dispatch for CatOps<S> {
    type Command = CatCommand;

    async fn dispatch(&self, command: CatCommand, args: Vec<String>) -> CliResult<Outcome> {
        match command {
            CatCommand::AddRandomCat => self.add_random_cat().await,
            CatCommand::AllCats => self.all_cats().await,
            CatCommand::CatByName => self.cat_by_name(arg(&args, 0)).await,
            CatCommand::UpdateAge => self.update_age(arg(&args, 0), arg(&args, 1)).await,
            CatCommand::AddFeature => self.add_feature(arg(&args, 0), arg(&args, 1)).await,
            CatCommand::DeleteByName => self.delete_by_name(arg(&args, 0)).await,
            CatCommand::DeleteAll => self.delete_all().await,
        }
    }
}
