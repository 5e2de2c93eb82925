//! HTTP client for the order backend

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::{ApiResponse, ItemStatusRecord, MenuCatalogEntry, Order, OrderStatus, Ticket};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client carrying the bearer credential for every call
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.patch(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    fn require_data<T>(response: ApiResponse<T>, what: &str) -> ClientResult<T> {
        response
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {} data", what)))
    }

    // ========== Kitchen API ==========

    /// List all kitchen tickets
    pub async fn list_tickets(&self) -> ClientResult<Vec<Ticket>> {
        let response = self.get::<ApiResponse<Vec<Ticket>>>("/api/kots").await?;
        Self::require_data(response, "ticket")
    }

    /// List all orders
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let response = self.get::<ApiResponse<Vec<Order>>>("/api/orders").await?;
        Self::require_data(response, "order")
    }

    /// List the menu catalog
    pub async fn list_menu(&self) -> ClientResult<Vec<MenuCatalogEntry>> {
        let response = self
            .get::<ApiResponse<Vec<MenuCatalogEntry>>>("/api/menu-items")
            .await?;
        Self::require_data(response, "menu")
    }

    /// Update item statuses on one ticket (batched)
    pub async fn update_item_statuses(
        &self,
        ticket_id: &str,
        statuses: &[ItemStatusRecord],
    ) -> ClientResult<()> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            item_statuses: &'a [ItemStatusRecord],
        }

        let path = format!("/api/kots/{}/item-statuses", ticket_id);
        self.patch::<ApiResponse<()>, _>(
            &path,
            &Body {
                item_statuses: statuses,
            },
        )
        .await?;
        Ok(())
    }

    /// Update a ticket's status
    pub async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: OrderStatus,
    ) -> ClientResult<()> {
        #[derive(serde::Serialize)]
        struct Body {
            status: OrderStatus,
        }

        let path = format!("/api/kots/{}/status", ticket_id);
        self.patch::<ApiResponse<()>, _>(&path, &Body { status })
            .await?;
        Ok(())
    }

    /// Update an order's status
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<()> {
        #[derive(serde::Serialize)]
        struct Body {
            status: OrderStatus,
        }

        let path = format!("/api/orders/{}/status", order_id);
        self.patch::<ApiResponse<()>, _>(&path, &Body { status })
            .await?;
        Ok(())
    }
}
