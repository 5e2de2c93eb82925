//! Shared types for the KDS workspace
//!
//! Data models, status machines, and channel message types shared
//! between the network client and the kitchen engine.

pub mod client;
pub mod message;
pub mod models;

pub use client::ApiResponse;
pub use models::{
    ItemStatus, ItemStatusRecord, MenuCatalogEntry, Order, OrderStatus, Ticket, TicketItem,
};
