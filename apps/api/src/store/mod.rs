//! Document store seam over the `interviews` and `feedback` collections.
//!
//! Backends: `PgDocumentStore` (JSONB rows in PostgreSQL) and
//! `MemoryDocumentStore` (in-process maps, used for local runs and tests).
//! `AppState` holds an `Arc<dyn DocumentStore>`, chosen at startup via config.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document {collection}/{id} is not a JSON object")]
    NotAnObject { collection: Collection, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Interviews,
    Feedback,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Interviews => "interviews",
            Collection::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document: its id plus the JSON object it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Deserializes the document with its id merged in as `id`.
    /// A stored `id` field takes precedence over the document id.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let Document { id, mut data } = self;
        data.entry("id").or_insert(Value::String(id));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Equality filters on top-level fields, optionally limited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when every filter matches the corresponding top-level field.
    pub fn matches(&self, data: &Map<String, Value>) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Documents matching every equality filter. Result order is unspecified.
    async fn query(&self, collection: Collection, query: &Query)
        -> Result<Vec<Document>, StoreError>;

    /// Writes a new document under a store-generated id and returns that id.
    async fn create(&self, collection: Collection, data: Value) -> Result<String, StoreError>;

    /// Full overwrite of the document at `id`, creating it if absent.
    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<(), StoreError>;
}

/// Generates a fresh document id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn into_object(
    collection: Collection,
    id: &str,
    data: Value,
) -> Result<Map<String, Value>, StoreError> {
    match data {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            collection,
            id: id.to_string(),
        }),
    }
}
