//! MongoDB-backed item store.
//!
//! # Responsibilities
//! - Parse the connection URI and pick the database it names
//! - Map `ItemStore` operations onto single-document driver calls
//! - Convert driver documents into wire `Item`s
//!
//! The driver maintains its own connection pool; `MongoItemStore` is cheap
//! to clone and share across handlers.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::store::types::{Item, ItemId, StoreError, StoreResult, UpdateOutcome};
use crate::store::ItemStore;

/// Database used when the URI does not name one.
pub const DEFAULT_DATABASE: &str = "items";

/// Document shape in the `items` collection.
#[derive(Debug, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
}

impl TryFrom<ItemDocument> for Item {
    type Error = StoreError;

    fn try_from(doc: ItemDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::UnexpectedId("missing _id".to_string()))?;
        Ok(Item {
            id: ItemId::from(id),
            name: doc.name,
        })
    }
}

/// Item store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoItemStore {
    database: Database,
    collection: Collection<ItemDocument>,
}

impl MongoItemStore {
    /// Connect using the configured URI and collection name.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = ClientOptions::parse(&config.uri).await?;
        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let client = Client::with_options(options)?;
        let database = client.database(&database_name);
        let collection = database.collection::<ItemDocument>(&config.collection);

        tracing::info!(
            database = %database_name,
            collection = %config.collection,
            "MongoDB item store initialized"
        );

        Ok(Self { database, collection })
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn insert(&self, name: &str) -> StoreResult<ItemId> {
        let document = ItemDocument {
            id: None,
            name: name.to_string(),
        };
        let result = self.collection.insert_one(&document).await?;
        result
            .inserted_id
            .as_object_id()
            .map(ItemId::from)
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Item::try_from).collect()
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn update_name(&self, id: ItemId, name: &str) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "name": name } },
            )
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count > 0,
            modified: result.modified_count > 0,
        })
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
