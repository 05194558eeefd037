//! MongoDB-backed cat store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::config::MongoSettings;
use crate::error::CliResult;
use crate::models::{Cat, NewCat};
use crate::store::{CatStore, UpdateEffect};

/// Converts a stored document to JSON for display, keeping every field.
///
/// Values map through relaxed extended JSON, so an `i32` age stays a plain
/// number and a double or null age comes through as-is. An ObjectId `_id`
/// is shown as its hex string.
fn document_to_json(mut document: Document) -> JsonValue {
    if let Ok(oid) = document.get_object_id("_id") {
        document.insert("_id", oid.to_hex());
    }
    Bson::Document(document).into_relaxed_extjson()
}

/// Cat store over one MongoDB collection.
///
/// The driver's client pools connections internally and is kept for the
/// whole session.
#[derive(Debug, Clone)]
pub struct MongoCatStore {
    collection: Collection<Document>,
}

impl MongoCatStore {
    /// Connects to the configured deployment and verifies it answers a ping.
    pub async fn connect(settings: &MongoSettings) -> CliResult<Self> {
        info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connecting to document store"
        );

        let client = Client::with_uri_str(&settings.uri).await?;
        let database = client.database(&settings.database);
        database.run_command(doc! { "ping": 1 }, None).await?;

        debug!("Document store ping succeeded");
        Ok(Self {
            collection: database.collection::<Document>(&settings.collection),
        })
    }

    async fn find_documents(&self, filter: Document) -> CliResult<Vec<JsonValue>> {
        let cursor = self.collection.find(filter, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(count = documents.len(), "Read cat documents");

        Ok(documents.into_iter().map(document_to_json).collect())
    }
}

#[async_trait]
impl CatStore for MongoCatStore {
    async fn insert(&self, cat: NewCat) -> CliResult<Cat> {
        let document = bson::to_document(&cat)?;
        let result = self.collection.insert_one(document, None).await?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        Ok(cat.with_id(id))
    }

    async fn find_all(&self) -> CliResult<Vec<JsonValue>> {
        self.find_documents(doc! {}).await
    }

    async fn find_by_name_pattern(&self, pattern: &str) -> CliResult<Vec<JsonValue>> {
        self.find_documents(doc! { "name": { "$regex": pattern, "$options": "i" } })
            .await
    }

    async fn set_age(&self, name: &str, age: i32) -> CliResult<UpdateEffect> {
        let result = self
            .collection
            .update_one(doc! { "name": name }, doc! { "$set": { "age": age } }, None)
            .await?;

        Ok(UpdateEffect {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn push_feature(&self, name: &str, feature: &str) -> CliResult<UpdateEffect> {
        let result = self
            .collection
            .update_one(
                doc! { "name": name },
                doc! { "$push": { "features": feature } },
                None,
            )
            .await?;

        Ok(UpdateEffect {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_name(&self, name: &str) -> CliResult<u64> {
        let result = self.collection.delete_one(doc! { "name": name }, None).await?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> CliResult<u64> {
        let result = self.collection.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}
