//! Kitchen Order Ticket (KOT) model
//!
//! A ticket is one kitchen work order. An order may have several tickets
//! issued over time (splits, late additions); the engine merges them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::OrderStatus;

/// Preparation status of a single ticket item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Served,
    Delivered,
    Cancelled,
}

impl ItemStatus {
    /// Whether `self -> to` is a legal transition.
    ///
    /// Forward-only: pending -> served -> delivered. Cancellation is
    /// reachable from pending or served, never from delivered.
    pub fn can_transition(self, to: ItemStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Served)
                | (Self::Pending, Self::Cancelled)
                | (Self::Served, Self::Delivered)
                | (Self::Served, Self::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Served => "served",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Status annotation for one item, addressed by position in the item array
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusRecord {
    pub item_index: usize,
    pub status: ItemStatus,
}

/// One line of a ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketItem {
    /// Menu item reference
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price as recorded on the ticket, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Legacy recorded rate, used when `price` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// Kitchen Order Ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    /// Owning logical order
    pub order_id: String,
    /// Human-facing ticket number
    #[serde(default)]
    pub display_number: Option<String>,
    #[serde(default)]
    pub table_no: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TicketItem>,
    #[serde(default)]
    pub item_statuses: Vec<ItemStatusRecord>,
}
