use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};

use shared::message::{ChannelMessage, EventKind};

use crate::channel::ChannelError;

/// Transport abstraction for the event channel
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError>;
    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError>;
    async fn close(&self) -> Result<(), ChannelError>;
}

/// TCP transport
///
/// Frame layout: 1 byte event kind, 4-byte LE payload length, payload.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError> {
        let mut reader = self.reader.lock().await;

        // Read event kind (1 byte)
        let mut kind_buf = [0u8; 1];
        reader
            .read_exact(&mut kind_buf)
            .await
            .map_err(ChannelError::Io)?;

        let kind = EventKind::try_from(kind_buf[0])
            .map_err(|_| ChannelError::InvalidMessage("Invalid event kind".into()))?;

        // Read payload length (4 bytes)
        let mut len_buf = [0u8; 4];
        reader
            .read_exact(&mut len_buf)
            .await
            .map_err(ChannelError::Io)?;

        let len = u32::from_le_bytes(len_buf) as usize;

        // Read payload
        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(ChannelError::Io)?;

        Ok(ChannelMessage { kind, payload })
    }

    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        let mut writer = self.writer.lock().await;
        let mut data = Vec::with_capacity(5 + msg.payload.len());
        data.push(msg.kind as u8);
        data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&msg.payload);

        writer.write_all(&data).await.map_err(ChannelError::Io)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        // Dropping the Arc references will eventually close the stream
        Ok(())
    }
}

/// In-memory transport (for in-process brokers and tests)
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    /// Receiver for messages FROM the broker (broadcasts)
    rx: Arc<Mutex<broadcast::Receiver<ChannelMessage>>>,
    /// Sender for messages TO the broker
    tx: broadcast::Sender<ChannelMessage>,
}

impl MemoryTransport {
    /// Create a new memory transport
    ///
    /// # Arguments
    /// * `broker_broadcast_tx` - The broker's broadcast sender (to subscribe to events)
    /// * `client_to_broker_tx` - The channel to send control messages TO the broker
    pub fn new(
        broker_broadcast_tx: &broadcast::Sender<ChannelMessage>,
        client_to_broker_tx: &broadcast::Sender<ChannelMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(broker_broadcast_tx.subscribe())),
            tx: client_to_broker_tx.clone(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| ChannelError::Connection(format!("Memory channel error: {}", e)))
    }

    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| ChannelError::Connection(format!("Failed to send to broker: {}", e)))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
