use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// Room name the kitchen display subscribes to
pub const KITCHEN_ROOM: &str = "kitchen";

/// Join-room control payload (client -> broker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room: String,
}

/// Minimal ticket reference carried by channel events
///
/// Enough to announce the ticket to an operator; never enough to patch
/// state, which always comes from a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KotRef {
    pub display_number: Option<String>,
}

/// A new order was placed (broker -> kitchen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub table_no: Option<String>,
    pub item_count: u32,
}

/// A new kitchen ticket was issued (broker -> kitchen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKotPayload {
    pub kot: KotRef,
    pub table_no: Option<String>,
}

/// A ticket's status changed (broker -> kitchen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KotStatusChangedPayload {
    pub kot: KotRef,
    pub status: OrderStatus,
}

/// A ticket item's status changed (broker -> kitchen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KotItemStatusChangedPayload {
    pub kot: KotRef,
}
