// End-to-end: channel event -> alert + single reconciliation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use tokio::sync::broadcast;

use kds_client::{ChannelClient, ClientError, ClientResult, KitchenApi};
use kds_core::sound::Tone;
use kds_core::{AlertSink, EventLoop, NotificationPrefs, SoundService};
use shared::message::{ChannelMessage, KotRef, NewKotPayload, NewOrderPayload};
use shared::{ItemStatusRecord, MenuCatalogEntry, Order, OrderStatus, Ticket, TicketItem};

#[derive(Default)]
struct InMemoryApi {
    tickets: Mutex<Vec<Ticket>>,
    orders: Mutex<Vec<Order>>,
    menu: Mutex<Vec<MenuCatalogEntry>>,
    fetch_cycles: AtomicUsize,
    fail_fetches: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl KitchenApi for InMemoryApi {
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>> {
        // One counter bump per reconcile cycle; the other two listings
        // ride along in the same try_join
        self.fetch_cycles.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("backend down".to_string()));
        }
        Ok(self.tickets.lock().unwrap().clone())
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn list_menu(&self) -> ClientResult<Vec<MenuCatalogEntry>> {
        Ok(self.menu.lock().unwrap().clone())
    }

    async fn update_item_statuses(
        &self,
        _ticket_id: &str,
        _statuses: &[ItemStatusRecord],
    ) -> ClientResult<()> {
        Ok(())
    }

    async fn update_ticket_status(
        &self,
        _ticket_id: &str,
        _status: OrderStatus,
    ) -> ClientResult<()> {
        Ok(())
    }

    async fn update_order_status(&self, _order_id: &str, _status: OrderStatus) -> ClientResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingSink {
    plays: AtomicUsize,
}

impl AlertSink for CountingSink {
    fn play(&self, _tones: &[Tone]) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    api: Arc<InMemoryApi>,
    sink_plays: Arc<CountingSink>,
    broker_tx: broadcast::Sender<ChannelMessage>,
    board_rx: tokio::sync::watch::Receiver<kds_core::KitchenBoard>,
    _to_broker: broadcast::Receiver<ChannelMessage>,
    _prefs_dir: TempDir,
}

async fn start(new_order_delay: Duration) -> Harness {
    let api = Arc::new(InMemoryApi::default());

    let prefs_dir = TempDir::new().unwrap();
    let sink = Arc::new(CountingSink::default());

    struct SharedSink(Arc<CountingSink>);
    impl AlertSink for SharedSink {
        fn play(&self, tones: &[Tone]) {
            self.0.play(tones);
        }
    }

    let prefs = NotificationPrefs::load(prefs_dir.path()).unwrap();
    let sound = Arc::new(SoundService::new(prefs, Box::new(SharedSink(sink.clone()))));

    let (broker_tx, _) = broadcast::channel(16);
    let (client_tx, to_broker) = broadcast::channel(16);
    let channel = ChannelClient::memory(&broker_tx, &client_tx).await.unwrap();

    let (event_loop, board_rx) =
        EventLoop::new(channel, api.clone() as Arc<dyn KitchenApi>, sound);
    let event_loop = event_loop.with_new_order_delay(new_order_delay);
    tokio::spawn(event_loop.run());

    Harness {
        api,
        sink_plays: sink,
        broker_tx,
        board_rx,
        _to_broker: to_broker,
        _prefs_dir: prefs_dir,
    }
}

fn sample_ticket() -> Ticket {
    Ticket {
        id: "kot-1".to_string(),
        order_id: "o1".to_string(),
        display_number: Some("KOT-1".to_string()),
        table_no: Some("T2".to_string()),
        status: OrderStatus::Pending,
        created_at: Utc.timestamp_opt(1_705_300_000, 0).unwrap(),
        items: vec![TicketItem {
            item_id: "m1".to_string(),
            name: "Soup".to_string(),
            quantity: 2,
            price: Some(4.0),
            rate: None,
        }],
        item_statuses: vec![],
    }
}

fn sample_order() -> Order {
    Order {
        id: "o1".to_string(),
        customer_name: "Guest".to_string(),
        order_type: "dine-in".to_string(),
        status: OrderStatus::Pending,
        created_at: Utc.timestamp_opt(1_705_300_000, 0).unwrap(),
        table_no: Some("T2".to_string()),
    }
}

fn new_kot_event() -> ChannelMessage {
    ChannelMessage::new_kot(&NewKotPayload {
        kot: KotRef {
            display_number: Some("KOT-1".to_string()),
        },
        table_no: Some("T2".to_string()),
    })
}

#[tokio::test]
async fn test_new_kot_event_reconciles_once_and_alerts_once() {
    let mut h = start(Duration::from_millis(50)).await;
    *h.api.tickets.lock().unwrap() = vec![sample_ticket()];
    *h.api.orders.lock().unwrap() = vec![sample_order()];

    h.broker_tx.send(new_kot_event()).unwrap();

    // Board update arrives once the refresh lands
    tokio::time::timeout(Duration::from_secs(2), h.board_rx.changed())
        .await
        .expect("board update timed out")
        .unwrap();

    let board = h.board_rx.borrow().clone();
    assert_eq!(board.active.len(), 1);
    assert_eq!(board.active[0].order.id, "o1");
    assert_eq!(board.active[0].items.len(), 1);
    assert!((board.active[0].total_amount - 8.0).abs() < 1e-9);

    // Exactly one fetch cycle and one alert for one event
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.api.fetch_cycles.load(Ordering::SeqCst), 1);
    assert_eq!(h.sink_plays.plays.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_new_order_refresh_waits_for_settle_delay() {
    let h = start(Duration::from_millis(300)).await;

    h.broker_tx
        .send(ChannelMessage::new_order(&NewOrderPayload {
            table_no: Some("T5".to_string()),
            item_count: 2,
        }))
        .unwrap();

    // Alert is immediate, refresh is not
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.sink_plays.plays.load(Ordering::SeqCst), 1);
    assert_eq!(h.api.fetch_cycles.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.api.fetch_cycles.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_fetch_publishes_empty_board() {
    let mut h = start(Duration::from_millis(10)).await;
    *h.api.tickets.lock().unwrap() = vec![sample_ticket()];
    *h.api.orders.lock().unwrap() = vec![sample_order()];

    // Seed a populated board
    h.broker_tx.send(new_kot_event()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), h.board_rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(h.board_rx.borrow().active.len(), 1);

    // Backend goes down; next event must not leave stale data on screen
    h.api.fail_fetches.store(true, Ordering::SeqCst);
    h.broker_tx.send(new_kot_event()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), h.board_rx.changed())
        .await
        .unwrap()
        .unwrap();

    let board = h.board_rx.borrow().clone();
    assert!(board.active.is_empty());
    assert!(board.history.is_empty());
}

#[tokio::test]
async fn test_duplicate_events_are_harmless() {
    let h = start(Duration::from_millis(10)).await;
    *h.api.tickets.lock().unwrap() = vec![sample_ticket()];
    *h.api.orders.lock().unwrap() = vec![sample_order()];

    // The same notification delivered three times: three refreshes, all
    // deriving the same board
    for _ in 0..3 {
        h.broker_tx.send(new_kot_event()).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.api.fetch_cycles.load(Ordering::SeqCst), 3);

    let board = h.board_rx.borrow().clone();
    assert_eq!(board.active.len(), 1);
    assert_eq!(h.sink_plays.plays.load(Ordering::SeqCst), 3);
}
