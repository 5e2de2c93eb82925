//! Bulk status actions
//!
//! Applies the per-item transition rules across a merged view and issues
//! the resulting batch as one mutation, then re-derives the board. A
//! rejected mutation is logged and left for the next reconciliation to
//! correct; nothing is retried or rolled back locally.

use std::sync::Arc;

use kds_client::{ClientResult, KitchenApi};
use shared::{ItemStatus, ItemStatusRecord, OrderStatus};

use crate::reconcile::{KitchenBoard, MergedItem, MergedOrderView, Reconciler};

/// Batch for "serve": every checked item still pending moves to served
pub fn serve_checked(items: &[MergedItem]) -> Vec<ItemStatusRecord> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.checked && item.status == ItemStatus::Pending)
        .map(|(item_index, _)| ItemStatusRecord {
            item_index,
            status: ItemStatus::Served,
        })
        .collect()
}

/// Batch for "deliver": checked-and-served items move to delivered.
///
/// When nothing is checked the batch covers every served item instead.
/// That fallback is intentional: the common flow is "deliver the lot"
/// without ticking boxes first.
pub fn deliver_served(items: &[MergedItem]) -> Vec<ItemStatusRecord> {
    let any_checked = items.iter().any(|item| item.checked);

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.status == ItemStatus::Served && (!any_checked || item.checked))
        .map(|(item_index, _)| ItemStatusRecord {
            item_index,
            status: ItemStatus::Delivered,
        })
        .collect()
}

/// Batch for order completion: every item to delivered, unconditionally
pub fn force_deliver_all(items: &[MergedItem]) -> Vec<ItemStatusRecord> {
    items
        .iter()
        .enumerate()
        .map(|(item_index, _)| ItemStatusRecord {
            item_index,
            status: ItemStatus::Delivered,
        })
        .collect()
}

/// Issues status mutations and reconciles afterwards
#[derive(Clone)]
pub struct KitchenService {
    api: Arc<dyn KitchenApi>,
    reconciler: Reconciler,
}

impl KitchenService {
    pub fn new(api: Arc<dyn KitchenApi>) -> Self {
        let reconciler = Reconciler::new(api.clone());
        Self { api, reconciler }
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Serve the checked pending items of a view
    pub async fn serve_checked_items(&self, view: &MergedOrderView) -> ClientResult<KitchenBoard> {
        self.apply_batch(view, serve_checked(&view.items)).await
    }

    /// Deliver the served items of a view (checked subset, or all when
    /// none are checked)
    pub async fn deliver_served_items(&self, view: &MergedOrderView) -> ClientResult<KitchenBoard> {
        self.apply_batch(view, deliver_served(&view.items)).await
    }

    /// Force every item of a view to delivered; paired with completing
    /// the order
    pub async fn force_deliver_all_items(
        &self,
        view: &MergedOrderView,
    ) -> ClientResult<KitchenBoard> {
        self.apply_batch(view, force_deliver_all(&view.items)).await
    }

    async fn apply_batch(
        &self,
        view: &MergedOrderView,
        batch: Vec<ItemStatusRecord>,
    ) -> ClientResult<KitchenBoard> {
        if !view.bulk_actions_enabled() {
            tracing::debug!(order_id = %view.order.id, "Bulk action on terminal order ignored");
            return self.reconciler.reconcile().await;
        }

        if let Some(ticket_id) = view.first_ticket_id.as_deref() {
            if !batch.is_empty() {
                if let Err(e) = self.api.update_item_statuses(ticket_id, &batch).await {
                    tracing::error!(
                        order_id = %view.order.id,
                        ticket_id = %ticket_id,
                        "Item status mutation failed: {}",
                        e
                    );
                }
            }
        }

        // Checked flags clear implicitly: the merge rebuilds every view
        self.reconciler.reconcile().await
    }

    /// Move an order (and its first matching ticket) to a new status.
    ///
    /// Only the first ticket in the latest listing is mutated, even when
    /// the order has several. Long-standing backend behavior, kept as is.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> ClientResult<KitchenBoard> {
        match self.api.list_tickets().await {
            Ok(tickets) => {
                if let Some(ticket) = tickets.iter().find(|t| t.order_id == order_id) {
                    if let Err(e) = self.api.update_ticket_status(&ticket.id, new_status).await {
                        tracing::error!(
                            order_id = %order_id,
                            ticket_id = %ticket.id,
                            "Ticket status mutation failed: {}",
                            e
                        );
                    }
                } else {
                    tracing::warn!(order_id = %order_id, "No ticket found for order");
                }
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, "Ticket listing failed: {}", e);
            }
        }

        if let Err(e) = self.api.update_order_status(order_id, new_status).await {
            tracing::error!(order_id = %order_id, "Order status mutation failed: {}", e);
        }

        self.reconciler.reconcile().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use shared::{MenuCatalogEntry, Order, Ticket, TicketItem};
    use std::sync::Mutex;

    fn merged(status: ItemStatus, checked: bool) -> MergedItem {
        MergedItem {
            item_id: "m1".to_string(),
            name: "Soup".to_string(),
            quantity: 1,
            price: 4.0,
            prep_duration_secs: None,
            status,
            ticket_id: "kot-1".to_string(),
            ticket_created_at: Utc.timestamp_opt(1_705_300_000, 0).unwrap(),
            checked,
        }
    }

    #[test]
    fn test_serve_checked_only_pending() {
        let items = vec![
            merged(ItemStatus::Pending, true),
            merged(ItemStatus::Pending, false),
            merged(ItemStatus::Served, true),
        ];

        let batch = serve_checked(&items);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].item_index, 0);
        assert_eq!(batch[0].status, ItemStatus::Served);
    }

    #[test]
    fn test_deliver_served_restricts_to_checked() {
        // [A: served(checked), B: served(unchecked)] -> only A
        let items = vec![
            merged(ItemStatus::Served, true),
            merged(ItemStatus::Served, false),
        ];

        let batch = deliver_served(&items);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].item_index, 0);
    }

    #[test]
    fn test_deliver_served_none_checked_takes_all() {
        // [A: served(unchecked), B: served(unchecked)] -> both
        let items = vec![
            merged(ItemStatus::Served, false),
            merged(ItemStatus::Served, false),
            merged(ItemStatus::Pending, false),
        ];

        let batch = deliver_served(&items);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].item_index, 0);
        assert_eq!(batch[1].item_index, 1);
    }

    #[test]
    fn test_deliver_served_checked_pending_item_does_not_narrow_to_nothing() {
        // A pending item is checked; the served item is not. The checked
        // set is non-empty, so only checked-and-served qualify: none.
        let items = vec![
            merged(ItemStatus::Pending, true),
            merged(ItemStatus::Served, false),
        ];

        assert!(deliver_served(&items).is_empty());
    }

    #[test]
    fn test_force_deliver_ignores_status_and_checks() {
        let items = vec![
            merged(ItemStatus::Pending, false),
            merged(ItemStatus::Served, true),
            merged(ItemStatus::Cancelled, false),
        ];

        let batch = force_deliver_all(&items);
        assert_eq!(batch.len(), 3);
        assert!(batch.iter().all(|r| r.status == ItemStatus::Delivered));
    }

    // ===== Service-level behavior against a recording backend =====

    #[derive(Default)]
    struct RecordingApi {
        tickets: Mutex<Vec<Ticket>>,
        item_status_calls: Mutex<Vec<(String, Vec<ItemStatusRecord>)>>,
        ticket_status_calls: Mutex<Vec<(String, OrderStatus)>>,
        order_status_calls: Mutex<Vec<(String, OrderStatus)>>,
    }

    #[async_trait]
    impl KitchenApi for RecordingApi {
        async fn list_tickets(&self) -> kds_client::ClientResult<Vec<Ticket>> {
            Ok(self.tickets.lock().unwrap().clone())
        }

        async fn list_orders(&self) -> kds_client::ClientResult<Vec<Order>> {
            Ok(vec![])
        }

        async fn list_menu(&self) -> kds_client::ClientResult<Vec<MenuCatalogEntry>> {
            Ok(vec![])
        }

        async fn update_item_statuses(
            &self,
            ticket_id: &str,
            statuses: &[ItemStatusRecord],
        ) -> kds_client::ClientResult<()> {
            self.item_status_calls
                .lock()
                .unwrap()
                .push((ticket_id.to_string(), statuses.to_vec()));
            Ok(())
        }

        async fn update_ticket_status(
            &self,
            ticket_id: &str,
            status: OrderStatus,
        ) -> kds_client::ClientResult<()> {
            self.ticket_status_calls
                .lock()
                .unwrap()
                .push((ticket_id.to_string(), status));
            Ok(())
        }

        async fn update_order_status(
            &self,
            order_id: &str,
            status: OrderStatus,
        ) -> kds_client::ClientResult<()> {
            self.order_status_calls
                .lock()
                .unwrap()
                .push((order_id.to_string(), status));
            Ok(())
        }
    }

    fn ticket(id: &str, order_id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            order_id: order_id.to_string(),
            display_number: None,
            table_no: None,
            status: OrderStatus::Pending,
            created_at: Utc.timestamp_opt(1_705_300_000, 0).unwrap(),
            items: vec![TicketItem {
                item_id: "m1".to_string(),
                name: "Soup".to_string(),
                quantity: 1,
                price: Some(4.0),
                rate: None,
            }],
            item_statuses: vec![],
        }
    }

    fn view(order_status: OrderStatus, items: Vec<MergedItem>) -> MergedOrderView {
        MergedOrderView {
            order: Order {
                id: "o1".to_string(),
                customer_name: "Guest".to_string(),
                order_type: "dine-in".to_string(),
                status: order_status,
                created_at: Utc.timestamp_opt(1_705_300_000, 0).unwrap(),
                table_no: None,
            },
            first_ticket_id: Some("kot-1".to_string()),
            items,
            total_amount: 0.0,
        }
    }

    #[tokio::test]
    async fn test_bulk_action_targets_first_ticket() {
        let api = Arc::new(RecordingApi::default());
        let service = KitchenService::new(api.clone());

        let v = view(
            OrderStatus::Preparing,
            vec![merged(ItemStatus::Served, false)],
        );
        service.deliver_served_items(&v).await.unwrap();

        let calls = api.item_status_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "kot-1");
        assert_eq!(calls[0].1[0].status, ItemStatus::Delivered);
    }

    #[tokio::test]
    async fn test_terminal_order_blocks_bulk_mutation() {
        let api = Arc::new(RecordingApi::default());
        let service = KitchenService::new(api.clone());

        let v = view(
            OrderStatus::Completed,
            vec![merged(ItemStatus::Served, false)],
        );
        service.deliver_served_items(&v).await.unwrap();

        assert!(api.item_status_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_issues_no_mutation() {
        let api = Arc::new(RecordingApi::default());
        let service = KitchenService::new(api.clone());

        let v = view(
            OrderStatus::Pending,
            vec![merged(ItemStatus::Pending, false)],
        );
        // Nothing checked, nothing served: serve and deliver both no-op
        service.serve_checked_items(&v).await.unwrap();
        service.deliver_served_items(&v).await.unwrap();

        assert!(api.item_status_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_order_status_mutates_first_matching_ticket_only() {
        let api = Arc::new(RecordingApi::default());
        *api.tickets.lock().unwrap() = vec![
            ticket("kot-other", "o9"),
            ticket("kot-a", "o1"),
            ticket("kot-b", "o1"),
        ];
        let service = KitchenService::new(api.clone());

        service
            .update_order_status("o1", OrderStatus::Completed)
            .await
            .unwrap();

        let ticket_calls = api.ticket_status_calls.lock().unwrap();
        assert_eq!(ticket_calls.len(), 1);
        assert_eq!(ticket_calls[0].0, "kot-a");
        assert_eq!(ticket_calls[0].1, OrderStatus::Completed);

        let order_calls = api.order_status_calls.lock().unwrap();
        assert_eq!(order_calls.len(), 1);
        assert_eq!(order_calls[0].0, "o1");
    }
}
