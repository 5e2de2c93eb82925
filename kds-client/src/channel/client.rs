use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use shared::message::ChannelMessage;

use crate::channel::transport::{MemoryTransport, TcpTransport, Transport};
use crate::channel::ChannelError;

/// Realtime channel client
///
/// Joins the kitchen room on connect, then fans every incoming event out
/// on a broadcast channel. Events carry no authoritative state; consumers
/// re-fetch on every one.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    transport: ClientTransport,
    event_tx: broadcast::Sender<ChannelMessage>,
    connected: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
enum ClientTransport {
    Tcp(TcpTransport),
    Memory(MemoryTransport),
}

impl ClientTransport {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError> {
        match self {
            ClientTransport::Tcp(t) => t.read_message().await,
            ClientTransport::Memory(t) => t.read_message().await,
        }
    }

    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        match self {
            ClientTransport::Tcp(t) => t.write_message(msg).await,
            ClientTransport::Memory(t) => t.write_message(msg).await,
        }
    }

    async fn close(&self) -> Result<(), ChannelError> {
        match self {
            ClientTransport::Tcp(t) => t.close().await,
            ClientTransport::Memory(t) => t.close().await,
        }
    }
}

impl ChannelClient {
    /// Connect via TCP
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let transport = TcpTransport::connect(addr).await?;
        Self::start(ClientTransport::Tcp(transport)).await
    }

    /// Create an in-process client over a memory transport
    pub async fn memory(
        broker_broadcast_tx: &broadcast::Sender<ChannelMessage>,
        client_to_broker_tx: &broadcast::Sender<ChannelMessage>,
    ) -> Result<Self, ChannelError> {
        let transport = MemoryTransport::new(broker_broadcast_tx, client_to_broker_tx);
        Self::start(ClientTransport::Memory(transport)).await
    }

    async fn start(transport: ClientTransport) -> Result<Self, ChannelError> {
        // Subscribe to kitchen events before anything can arrive
        transport
            .write_message(&ChannelMessage::join_kitchen_room())
            .await?;

        let (event_tx, _) = broadcast::channel(256);
        let connected = Arc::new(AtomicBool::new(true));

        let client = Self {
            transport: transport.clone(),
            event_tx: event_tx.clone(),
            connected: connected.clone(),
        };

        // Background task: fan incoming events out to subscribers
        tokio::spawn(async move {
            loop {
                match transport.read_message().await {
                    Ok(msg) => {
                        tracing::debug!(kind = %msg.kind, "Channel event received");
                        if let Err(e) = event_tx.send(msg) {
                            tracing::debug!("No subscribers for event: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Channel read error: {}", e);
                        connected.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
        });

        Ok(client)
    }

    /// Subscribe to incoming channel events
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.event_tx.subscribe()
    }

    /// Whether the channel is still connected
    ///
    /// Flips to false when the read loop hits a transport error. Reconnect
    /// policy is left to the caller.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Send a message to the broker
    pub async fn send(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        self.transport.write_message(msg).await
    }

    /// Close the channel
    pub async fn close(&self) -> Result<(), ChannelError> {
        self.connected.store(false, Ordering::SeqCst);
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{EventKind, JoinRoomPayload, NewKotPayload, KITCHEN_ROOM};

    #[tokio::test]
    async fn test_join_room_sent_on_connect() {
        let (broker_tx, _) = broadcast::channel(16);
        let (client_tx, mut to_broker) = broadcast::channel(16);

        let client = ChannelClient::memory(&broker_tx, &client_tx).await.unwrap();
        assert!(client.is_connected());

        let control = to_broker.recv().await.unwrap();
        assert_eq!(control.kind, EventKind::JoinKitchenRoom);
        let payload: JoinRoomPayload = control.parse_payload().unwrap();
        assert_eq!(payload.room, KITCHEN_ROOM);
    }

    #[tokio::test]
    async fn test_events_fan_out_to_subscribers() {
        let (broker_tx, _) = broadcast::channel(16);
        let (client_tx, _keep) = broadcast::channel(16);

        let client = ChannelClient::memory(&broker_tx, &client_tx).await.unwrap();
        let mut rx = client.subscribe();

        let event = ChannelMessage::new_kot(&NewKotPayload {
            kot: shared::message::KotRef {
                display_number: Some("KOT-12".to_string()),
            },
            table_no: Some("T3".to_string()),
        });
        broker_tx.send(event.clone()).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_disconnect_flips_connected_flag() {
        let (broker_tx, _) = broadcast::channel(16);
        let (client_tx, _keep) = broadcast::channel(16);

        let client = ChannelClient::memory(&broker_tx, &client_tx).await.unwrap();
        assert!(client.is_connected());

        // Dropping the broker side closes the subscription; the read loop
        // observes the error and flips the flag.
        drop(broker_tx);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!client.is_connected());
    }
}
