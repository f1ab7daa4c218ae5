use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use crate::store::{generate_id, into_object, Collection, Document, DocumentStore, Query, StoreError};

/// Document store backed by a single JSONB table:
/// `documents(collection, id, data, PRIMARY KEY (collection, id))`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn to_document(collection: Collection, row: DocumentRow) -> Result<Document, StoreError> {
        let data = into_object(collection, &row.id, row.data.0)?;
        Ok(Document { id: row.id, data })
    }
}

/// Equality filters folded into one object for JSONB containment (`@>`).
fn containment_filter(query: &Query) -> Value {
    let filter: Map<String, Value> = query.filters.iter().cloned().collect();
    Value::Object(filter)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|row| Self::to_document(collection, row)).transpose()
    }

    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, StoreError> {
        // LIMIT NULL means no limit
        let limit = query.limit.map(|l| l as i64);

        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 AND data @> $2 LIMIT $3",
        )
        .bind(collection.as_str())
        .bind(Json(containment_filter(query)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!("postgres store: {} rows from {collection}", rows.len());

        rows.into_iter()
            .map(|row| Self::to_document(collection, row))
            .collect()
    }

    async fn create(&self, collection: Collection, data: Value) -> Result<String, StoreError> {
        let id = generate_id();
        let data = into_object(collection, &id, data)?;

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(&id)
            .bind(Json(Value::Object(data)))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<(), StoreError> {
        let data = into_object(collection, id, data)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(Value::Object(data)))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_containment_filter_empty_query_matches_everything() {
        assert_eq!(containment_filter(&Query::new()), json!({}));
    }

    #[test]
    fn test_containment_filter_folds_equality_filters() {
        let query = Query::new()
            .where_eq("interviewId", "i1")
            .where_eq("userId", "u1")
            .limit(1);
        assert_eq!(
            containment_filter(&query),
            json!({"interviewId": "i1", "userId": "u1"})
        );
    }

    #[test]
    fn test_containment_filter_keeps_boolean_values() {
        let query = Query::new().where_eq("finalized", true);
        assert_eq!(containment_filter(&query), json!({"finalized": true}));
    }
}
