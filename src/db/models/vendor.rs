//! Vendor Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Seller account
///
/// Keyed by the owning user's id: the existence of a vendor record is what
/// grants a caller vendor privileges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            created_at: Utc::now(),
        }
    }
}
