//! Item persistence subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → ItemStore trait (injected via AppState)
//!     → mongo.rs (MongoDB `items` collection)
//!       or memory.rs (in-process, used for local runs and tests)
//! ```
//!
//! # Design Decisions
//! - Handlers only see the trait; the backend is picked at startup from config
//! - Every operation is a single round-trip with single-document atomicity
//! - Identifiers are always assigned by the store, never by callers

pub mod memory;
pub mod mongo;
pub mod types;

use async_trait::async_trait;

pub use memory::MemoryItemStore;
pub use mongo::MongoItemStore;
pub use types::{Item, ItemId, ItemIdError, StoreError, StoreResult, UpdateOutcome};

/// Operations the HTTP layer needs from the backing collection.
#[async_trait]
pub trait ItemStore: Send + Sync + 'static {
    /// Insert a new item and return its store-assigned id.
    async fn insert(&self, name: &str) -> StoreResult<ItemId>;

    /// Fetch every item in the collection's natural order.
    async fn find_all(&self) -> StoreResult<Vec<Item>>;

    /// Fetch a single item.
    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// Set the name of an existing item.
    async fn update_name(&self, id: ItemId, name: &str) -> StoreResult<UpdateOutcome>;

    /// Delete an item. Returns `true` when a record was removed.
    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool>;

    /// Round-trip to the backend to check connectivity.
    async fn ping(&self) -> StoreResult<()>;
}
