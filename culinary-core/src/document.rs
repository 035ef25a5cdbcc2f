//! Core traits for entities and the boundary conversion applied to stored documents.
//!
//! Documents travel through backends as [`bson::Document`]s carrying a storage-native
//! `_id`. Before a document leaves the gateway it is turned into plain JSON by
//! [`into_public`]: the `_id` becomes a string `id` and datetimes become ISO-8601 text.

use bson::{Bson, Document, ser::serialize_to_document};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::DocumentStoreResult;

/// Name of the storage-internal identifier field.
pub const INTERNAL_ID: &str = "_id";
/// Name of the public identifier field exposed to callers.
pub const PUBLIC_ID: &str = "id";

/// Trait implemented by every payload type persisted through the gateway.
///
/// # Example
///
/// ```ignore
/// use culinary_core::document::Entity;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Video {
///     pub title: String,
///     pub video_url: String,
/// }
///
/// impl Entity for Video {
///     fn collection_name() -> &'static str {
///         "video"
///     }
/// }
/// ```
pub trait Entity: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this entity is stored in.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for entities.
pub trait EntityExt: Entity {
    /// Converts this entity to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Serialization`](crate::error::DocumentStoreError::Serialization)
    /// if the entity does not serialize to a map.
    fn to_document(&self) -> DocumentStoreResult<Document>;
}

impl<E: Entity> EntityExt for E {
    fn to_document(&self) -> DocumentStoreResult<Document> {
        Ok(serialize_to_document(self)?)
    }
}

/// Converts a stored document into its public JSON form.
///
/// `_id` is renamed to `id` and rendered as a string; every datetime, at any depth,
/// is rendered as an RFC 3339 string in UTC.
pub fn into_public(document: Document) -> Value {
    let mut map = Map::with_capacity(document.len());

    for (key, value) in document {
        if key == INTERNAL_ID {
            map.insert(PUBLIC_ID.to_string(), Value::String(id_to_string(&value)));
        } else {
            map.insert(key, bson_to_json(value));
        }
    }

    Value::Object(map)
}

/// Renders a storage identifier as an opaque string.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => {
            Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        other => Value::String(other.to_string()),
    }
}
