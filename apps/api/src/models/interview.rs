use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::timestamp::{self, StoredTimestamp};
use crate::store::Document;

/// Interview document. Written by other services; this one only reads it,
/// so the stored fields are kept exactly as they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct Interview {
    /// Document id.
    pub id: String,
    /// Stored fields, untouched.
    pub data: Map<String, Value>,
}

impl Interview {
    pub fn user_id(&self) -> Option<&str> {
        self.data.get("userId").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<StoredTimestamp> {
        self.data.get("createdAt").and_then(StoredTimestamp::from_json)
    }

    /// Normalized creation time in epoch milliseconds (0 when absent or unreadable).
    pub fn created_at_millis(&self) -> i64 {
        timestamp::to_millis(self.created_at().as_ref())
    }
}

impl From<Document> for Interview {
    fn from(doc: Document) -> Self {
        Interview {
            id: doc.id,
            data: doc.data,
        }
    }
}

/// `{ id, ...data }`: a stored `id` field wins over the document id.
impl Serialize for Interview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_own_id = self.data.contains_key("id");
        let len = self.data.len() + usize::from(!has_own_id);
        let mut map = serializer.serialize_map(Some(len))?;
        if !has_own_id {
            map.serialize_entry("id", &self.id)?;
        }
        for (key, value) in &self.data {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One speaker turn of an interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}
