use mongodb::bson::{spec::BinarySubtype, Binary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Evidence document as stored in the `evidence` collection.
///
/// `payment_id` is a plain value, not a database reference: referential
/// integrity (cascade delete, one-evidence-per-payment) is enforced by the
/// service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "_id", with = "uuid::serde::hyphenated")]
    pub id: Uuid,
    #[serde(with = "uuid::serde::hyphenated")]
    pub payment_id: Uuid,
    pub file_name: String,
    pub file_data: Binary,
    pub file_type: String,
}

impl Evidence {
    pub fn new(payment_id: Uuid, file_name: String, file_data: Vec<u8>, file_type: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            payment_id,
            file_name,
            file_data: Binary {
                subtype: BinarySubtype::Generic,
                bytes: file_data,
            },
            file_type,
        }
    }
}

/// Bytes-free view of an evidence row, used by listing lookups so a page of
/// results never drags file payloads out of the store.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceMeta {
    pub file_name: String,
}
