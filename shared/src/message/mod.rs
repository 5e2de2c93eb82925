//! Realtime channel message types
//!
//! Shared between the kitchen clients and the broker. Every server->client
//! event is a pure "something changed" signal: payloads are never trusted
//! for incremental updates.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod payload;
pub use payload::*;

/// Channel event kinds
///
/// The discriminant is the wire tag (first frame byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Control message, client -> broker: subscribe to kitchen events
    JoinKitchenRoom = 0,
    /// A new order was placed
    NewOrder = 1,
    /// A new kitchen ticket was issued
    NewKot = 2,
    /// A ticket's status changed
    KotStatusChanged = 3,
    /// A ticket item's status changed
    KotItemStatusChanged = 4,
}

impl EventKind {
    /// Server->client kitchen events (everything except control messages)
    pub fn is_kitchen_event(self) -> bool {
        !matches!(self, Self::JoinKitchenRoom)
    }
}

impl TryFrom<u8> for EventKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::JoinKitchenRoom),
            1 => Ok(EventKind::NewOrder),
            2 => Ok(EventKind::NewKot),
            3 => Ok(EventKind::KotStatusChanged),
            4 => Ok(EventKind::KotItemStatusChanged),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::JoinKitchenRoom => write!(f, "join-kitchen-room"),
            EventKind::NewOrder => write!(f, "new-order"),
            EventKind::NewKot => write!(f, "new-kot"),
            EventKind::KotStatusChanged => write!(f, "kot-status-changed"),
            EventKind::KotItemStatusChanged => write!(f, "kot-item-status-changed"),
        }
    }
}

/// Channel message body
///
/// Wire frame: 1 byte kind, 4-byte LE payload length, JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub kind: EventKind,
    pub payload: Vec<u8>,
}

impl ChannelMessage {
    pub fn new(kind: EventKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Control message subscribing to the kitchen room
    pub fn join_kitchen_room() -> Self {
        let payload = JoinRoomPayload {
            room: KITCHEN_ROOM.to_string(),
        };
        Self::new(
            EventKind::JoinKitchenRoom,
            serde_json::to_vec(&payload).expect("Failed to serialize join payload"),
        )
    }

    pub fn new_order(payload: &NewOrderPayload) -> Self {
        Self::new(
            EventKind::NewOrder,
            serde_json::to_vec(payload).expect("Failed to serialize new-order payload"),
        )
    }

    pub fn new_kot(payload: &NewKotPayload) -> Self {
        Self::new(
            EventKind::NewKot,
            serde_json::to_vec(payload).expect("Failed to serialize new-kot payload"),
        )
    }

    pub fn kot_status_changed(payload: &KotStatusChangedPayload) -> Self {
        Self::new(
            EventKind::KotStatusChanged,
            serde_json::to_vec(payload).expect("Failed to serialize status payload"),
        )
    }

    pub fn kot_item_status_changed(payload: &KotItemStatusChangedPayload) -> Self {
        Self::new(
            EventKind::KotItemStatusChanged,
            serde_json::to_vec(payload).expect("Failed to serialize item-status payload"),
        )
    }

    /// Parse the payload as a specific type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
