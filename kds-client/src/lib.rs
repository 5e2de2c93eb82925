//! KDS Client - network edge for the kitchen display
//!
//! HTTP calls against the order backend and the realtime event channel.

pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod http;

pub use api::KitchenApi;
pub use channel::{ChannelClient, ChannelError, MemoryTransport, TcpTransport, Transport};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;

// Re-export shared types for convenience
pub use shared::{ApiResponse, ItemStatusRecord, MenuCatalogEntry, Order, OrderStatus, Ticket};
