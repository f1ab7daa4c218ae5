use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{generate_id, into_object, Collection, Document, DocumentStore, Query, StoreError};

/// In-process document store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, HashMap<String, Map<String, Value>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let matching = docs
            .iter()
            .filter(|(_, data)| query.matches(data))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            });

        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn create(&self, collection: Collection, data: Value) -> Result<String, StoreError> {
        let id = generate_id();
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<(), StoreError> {
        let data = into_object(collection, id, data)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), data);
        debug!("memory store: wrote {collection}/{id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get(Collection::Interviews, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_document() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Feedback, "f1", json!({"a": 1, "b": 2}))
            .await
            .unwrap();
        store
            .set(Collection::Feedback, "f1", json!({"a": 3}))
            .await
            .unwrap();

        let doc = store.get(Collection::Feedback, "f1").await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.data), json!({"a": 3}));
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let store = MemoryDocumentStore::new();
        let a = store.create(Collection::Feedback, json!({})).await.unwrap();
        let b = store.create(Collection::Feedback, json!({})).await.unwrap();
        assert_ne!(a, b);

        let all = store.query(Collection::Feedback, &Query::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_query_filters_and_limits() {
        let store = MemoryDocumentStore::new();
        for (id, user) in [("i1", "u1"), ("i2", "u1"), ("i3", "u2")] {
            store
                .set(Collection::Interviews, id, json!({"userId": user}))
                .await
                .unwrap();
        }

        let by_user = store
            .query(Collection::Interviews, &Query::new().where_eq("userId", "u1"))
            .await
            .unwrap();
        assert_eq!(by_user.len(), 2);

        let limited = store
            .query(
                Collection::Interviews,
                &Query::new().where_eq("userId", "u1").limit(1),
            )
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].data["userId"], "u1");
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store
            .set(Collection::Interviews, "x", json!({"k": 1}))
            .await
            .unwrap();
        assert!(store.get(Collection::Feedback, "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_rejects_non_object() {
        let store = MemoryDocumentStore::new();
        let err = store
            .set(Collection::Feedback, "f1", json!("text"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { .. }));
    }
}
