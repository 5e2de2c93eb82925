//! Data models shared between the client and the kitchen engine

pub mod menu;
pub mod order;
pub mod ticket;

pub use menu::MenuCatalogEntry;
pub use order::{Order, OrderStatus};
pub use ticket::{ItemStatus, ItemStatusRecord, Ticket, TicketItem};
