//! Realtime event channel
//!
//! Persistent bidirectional channel to the backend broker. Incoming events
//! are re-derivation triggers only; the client never patches state from a
//! payload.

pub mod client;
pub mod transport;

pub use client::ChannelClient;
pub use transport::{MemoryTransport, TcpTransport, Transport};

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Connection could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O error on the transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be decoded
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
