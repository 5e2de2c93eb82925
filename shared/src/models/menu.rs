//! Menu catalog model

use serde::{Deserialize, Serialize};

/// Menu catalog entry (read-only reference data)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuCatalogEntry {
    pub id: String,
    pub name: String,
    /// Unit price in currency unit
    pub price: f64,
    /// Expected preparation time; absent disables the countdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_duration_minutes: Option<u32>,
}
