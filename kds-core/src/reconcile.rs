//! Ticket aggregation and reconciliation
//!
//! One logical order may be split across several kitchen tickets issued at
//! different times. Reconciliation fetches everything, merges each order's
//! tickets into a single view, and partitions the result into active and
//! history lists. Views are ephemeral: rebuilt from scratch on every cycle,
//! never patched.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kds_client::{ClientResult, KitchenApi};
use shared::{ItemStatus, MenuCatalogEntry, Order, Ticket};

/// One merged, enriched item line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergedItem {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    /// Resolved unit price: recorded price, then recorded rate, then
    /// catalog price, then 0
    pub price: f64,
    /// From the catalog only; absent disables the countdown
    pub prep_duration_secs: Option<u64>,
    pub status: ItemStatus,
    /// Ticket this line came from
    pub ticket_id: String,
    pub ticket_created_at: DateTime<Utc>,
    /// UI selection flag; always false on a fresh merge
    #[serde(default)]
    pub checked: bool,
}

/// Reconciled projection of one order and all of its tickets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergedOrderView {
    pub order: Order,
    /// Earliest-created ticket; bulk item mutations target this one
    pub first_ticket_id: Option<String>,
    pub items: Vec<MergedItem>,
    pub total_amount: f64,
}

impl MergedOrderView {
    /// Bulk item actions are hidden once the order reaches a terminal status
    pub fn bulk_actions_enabled(&self) -> bool {
        !self.order.status.is_terminal()
    }
}

/// The two board lists the kitchen display renders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KitchenBoard {
    pub active: Vec<MergedOrderView>,
    pub history: Vec<MergedOrderView>,
}

/// Fetches tickets, orders, and the menu catalog and derives the board
#[derive(Clone)]
pub struct Reconciler {
    api: Arc<dyn KitchenApi>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn KitchenApi>) -> Self {
        Self { api }
    }

    /// Re-derive the full board from the backend.
    ///
    /// All three fetches must succeed; a failed fetch surfaces the error
    /// and yields no board, so stale and fresh data are never mixed.
    pub async fn reconcile(&self) -> ClientResult<KitchenBoard> {
        let (tickets, orders, menu) = tokio::try_join!(
            self.api.list_tickets(),
            self.api.list_orders(),
            self.api.list_menu(),
        )?;

        Ok(merge_orders(tickets, orders, &menu))
    }
}

/// Pure merge over a fetched snapshot.
///
/// Tickets are sorted by creation time ascending and grouped by order.
/// Item arrays concatenate in that order; each ticket's status records are
/// applied at `offset + item_index`, where the offset is the running count
/// of previously merged items. Status records land on whatever occupies the
/// merged position, so ticket ordering must stay consistent between read
/// and write.
pub fn merge_orders(
    mut tickets: Vec<Ticket>,
    mut orders: Vec<Order>,
    menu: &[MenuCatalogEntry],
) -> KitchenBoard {
    tickets.sort_by_key(|t| t.created_at);
    orders.sort_by_key(|o| o.created_at);

    let mut groups: HashMap<&str, Vec<&Ticket>> = HashMap::new();
    for ticket in &tickets {
        groups.entry(ticket.order_id.as_str()).or_default().push(ticket);
    }

    let mut board = KitchenBoard::default();

    for order in &orders {
        let group = groups.get(order.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        let view = merge_group(order, group, menu);

        if order.status.is_active() {
            board.active.push(view);
        } else {
            board.history.push(view);
        }
    }

    board
}

fn merge_group(order: &Order, tickets: &[&Ticket], menu: &[MenuCatalogEntry]) -> MergedOrderView {
    let mut items = Vec::new();
    let mut total_amount = 0.0;

    // First pass: concatenate and enrich, remembering each ticket's offset
    let mut offsets = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        offsets.push(items.len());
        for item in &ticket.items {
            let catalog = lookup_menu(menu, &item.item_id, &item.name);
            let price = item
                .price
                .or(item.rate)
                .or_else(|| catalog.map(|m| m.price))
                .unwrap_or(0.0);
            let prep_duration_secs = catalog
                .and_then(|m| m.prep_duration_minutes)
                .map(|minutes| u64::from(minutes) * 60);

            total_amount += price * f64::from(item.quantity);

            items.push(MergedItem {
                item_id: item.item_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price,
                prep_duration_secs,
                status: ItemStatus::Pending,
                ticket_id: ticket.id.clone(),
                ticket_created_at: ticket.created_at,
                checked: false,
            });
        }
    }

    // Second pass: apply status records at their offset-shifted positions
    for (ticket, offset) in tickets.iter().zip(offsets) {
        for record in &ticket.item_statuses {
            let index = offset + record.item_index;
            match items.get_mut(index) {
                Some(item) => item.status = record.status,
                None => {
                    tracing::warn!(
                        ticket_id = %ticket.id,
                        item_index = record.item_index,
                        merged_index = index,
                        "Item status record out of range, skipped"
                    );
                }
            }
        }
    }

    MergedOrderView {
        order: order.clone(),
        first_ticket_id: tickets.first().map(|t| t.id.clone()),
        items,
        total_amount,
    }
}

/// Catalog lookup by id, falling back to an exact name match
fn lookup_menu<'a>(
    menu: &'a [MenuCatalogEntry],
    item_id: &str,
    name: &str,
) -> Option<&'a MenuCatalogEntry> {
    menu.iter()
        .find(|m| m.id == item_id)
        .or_else(|| menu.iter().find(|m| m.name == name))
}
