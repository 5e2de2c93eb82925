//! Kitchen API seam
//!
//! The engine depends on this trait, not on the concrete HTTP client, so
//! tests can substitute an in-memory backend.

use async_trait::async_trait;

use shared::{ItemStatusRecord, MenuCatalogEntry, Order, OrderStatus, Ticket};

use crate::{ApiClient, ClientResult};

/// Reads and status mutations the kitchen engine issues against the backend
#[async_trait]
pub trait KitchenApi: Send + Sync {
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>>;
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;
    async fn list_menu(&self) -> ClientResult<Vec<MenuCatalogEntry>>;

    async fn update_item_statuses(
        &self,
        ticket_id: &str,
        statuses: &[ItemStatusRecord],
    ) -> ClientResult<()>;

    async fn update_ticket_status(&self, ticket_id: &str, status: OrderStatus) -> ClientResult<()>;

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()>;
}

#[async_trait]
impl KitchenApi for ApiClient {
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>> {
        ApiClient::list_tickets(self).await
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        ApiClient::list_orders(self).await
    }

    async fn list_menu(&self) -> ClientResult<Vec<MenuCatalogEntry>> {
        ApiClient::list_menu(self).await
    }

    async fn update_item_statuses(
        &self,
        ticket_id: &str,
        statuses: &[ItemStatusRecord],
    ) -> ClientResult<()> {
        ApiClient::update_item_statuses(self, ticket_id, statuses).await
    }

    async fn update_ticket_status(&self, ticket_id: &str, status: OrderStatus) -> ClientResult<()> {
        ApiClient::update_ticket_status(self, ticket_id, status).await
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        ApiClient::update_order_status(self, order_id, status).await
    }
}
