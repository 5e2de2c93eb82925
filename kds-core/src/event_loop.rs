//! Channel event loop
//!
//! Every kitchen event is an untrusted "something changed" trigger: play
//! the alert, then re-derive the whole board. Duplicate, out-of-order, or
//! lost events cannot corrupt state; a lost one only delays the next
//! refresh until another event or a manual reconcile.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use kds_client::{ChannelClient, KitchenApi};
use shared::message::{ChannelMessage, EventKind};

use crate::reconcile::{KitchenBoard, Reconciler};
use crate::sound::SoundService;

/// Settle time before refreshing on a new order, covering backend
/// write-after-notify races
pub const NEW_ORDER_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Drives reconciliation from realtime channel events
pub struct EventLoop {
    channel: ChannelClient,
    /// Subscribed at construction so no event published before `run`
    /// starts polling is lost
    events: broadcast::Receiver<ChannelMessage>,
    reconciler: Reconciler,
    sound: Arc<SoundService>,
    board_tx: watch::Sender<KitchenBoard>,
    new_order_delay: Duration,
}

impl EventLoop {
    /// Wire a channel client to the reconciler and sound service.
    ///
    /// Returns the loop and a watch receiver carrying the latest board.
    pub fn new(
        channel: ChannelClient,
        api: Arc<dyn KitchenApi>,
        sound: Arc<SoundService>,
    ) -> (Self, watch::Receiver<KitchenBoard>) {
        let (board_tx, board_rx) = watch::channel(KitchenBoard::default());

        let event_loop = Self {
            events: channel.subscribe(),
            channel,
            reconciler: Reconciler::new(api),
            sound,
            board_tx,
            new_order_delay: NEW_ORDER_SETTLE_DELAY,
        };

        (event_loop, board_rx)
    }

    /// Override the new-order settle delay
    pub fn with_new_order_delay(mut self, delay: Duration) -> Self {
        self.new_order_delay = delay;
        self
    }

    /// Whether the underlying channel is still up
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Reconcile once and publish the result.
    ///
    /// A failed fetch publishes an empty board rather than keeping a
    /// stale one on screen.
    pub async fn refresh(&self) {
        match self.reconciler.reconcile().await {
            Ok(board) => {
                let _ = self.board_tx.send(board);
            }
            Err(e) => {
                tracing::error!("Reconciliation failed: {}", e);
                let _ = self.board_tx.send(KitchenBoard::default());
            }
        }
    }

    /// Consume channel events until the channel closes
    pub async fn run(mut self) {
        loop {
            let event = self.events.recv().await;
            match event {
                Ok(msg) if msg.kind.is_kitchen_event() => {
                    tracing::info!(kind = %msg.kind, "Kitchen event");
                    self.sound.play();

                    if msg.kind == EventKind::NewOrder {
                        tokio::time::sleep(self.new_order_delay).await;
                    }

                    self.refresh().await;
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    // Events are interchangeable refresh triggers, so one
                    // catch-up reconcile covers everything that was missed
                    tracing::warn!(skipped, "Channel receiver lagged");
                    self.refresh().await;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Channel closed, event loop stopping");
                    break;
                }
            }
        }
    }
}
