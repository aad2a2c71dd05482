use super::{Document, DocumentStore};
use crate::error::MenuError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::info;

/// Document store backed by a single PostgreSQL table of JSONB documents.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and create the documents table if it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self, MenuError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!("✓ Connected to PostgreSQL document store");
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn migrate(&self) -> Result<(), MenuError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS menu_documents (
                collection TEXT NOT NULL,
                key TEXT NOT NULL,
                data JSONB NOT NULL,
                PRIMARY KEY (collection, key)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn to_documents(rows: Vec<(String, Json<Value>)>) -> Vec<Document> {
    rows.into_iter()
        .map(|(key, Json(data))| Document { key, data })
        .collect()
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, MenuError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            "SELECT key, data FROM menu_documents WHERE collection = $1 ORDER BY key",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(to_documents(rows))
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, MenuError> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            "SELECT data FROM menu_documents WHERE collection = $1 AND key = $2",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(data),)| data))
    }

    async fn set(&self, collection: &str, key: &str, data: Value) -> Result<(), MenuError> {
        sqlx::query(
            "INSERT INTO menu_documents (collection, key, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, key) DO UPDATE SET data = EXCLUDED.data",
        )
        .bind(collection)
        .bind(key)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Result<(), MenuError> {
        // jsonb || jsonb replaces top-level keys present on the right
        let result = sqlx::query(
            "UPDATE menu_documents SET data = data || $3 WHERE collection = $1 AND key = $2",
        )
        .bind(collection)
        .bind(key)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(MenuError::NotFound(format!("Document {}/{}", collection, key)));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), MenuError> {
        sqlx::query("DELETE FROM menu_documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, MenuError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            "SELECT key, data FROM menu_documents
             WHERE collection = $1 AND data -> $2 = $3
             ORDER BY key",
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        Ok(to_documents(rows))
    }
}
