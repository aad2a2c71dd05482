//! Persistence for menu documents.
//!
//! [`DocumentStore`] is the narrow interface the menu needs from a document
//! database: collections of JSON documents addressed by string keys.
//! [`MenuStore`] layers the menu schema on top of it:
//!
//! - `categories/{id}`: `title`, `icon`
//! - `categories/{id}/items/{item_id}`: `id`, `name`, `description`, `price`,
//!   `tags`, `imageUrl`, `order`

mod memory;
mod menu_store;
mod postgres;

pub use memory::MemoryStore;
pub use menu_store::MenuStore;
pub use postgres::PgStore;

use crate::error::MenuError;
use crate::retry::{is_transient, with_retry_if, RetryConfig};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Open the configured backend: Postgres when a URL is given (retrying while
/// the database comes up), otherwise a fresh in-memory store.
pub async fn open(database_url: Option<&str>) -> Result<MenuStore, MenuError> {
    match database_url {
        Some(url) => {
            let pg = with_retry_if(
                &RetryConfig::store_connect(),
                "Connect to PostgreSQL",
                || PgStore::connect(url),
                is_transient,
            )
            .await?;
            Ok(MenuStore::new(Arc::new(pg)))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (changes are lost on restart)");
            Ok(MenuStore::in_memory())
        }
    }
}

/// A stored document and its key within the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub data: Value,
}

/// Document database operations consumed by the menu.
///
/// No transactions, range queries or joins are needed. Every method may fail
/// independently; callers decide whether to retry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, ordered by key.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, MenuError>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, MenuError>;

    /// Create or overwrite a document.
    async fn set(&self, collection: &str, key: &str, data: Value) -> Result<(), MenuError>;

    /// Merge top-level fields into an existing document.
    ///
    /// Returns `MenuError::NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Result<(), MenuError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), MenuError>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, MenuError>;
}
