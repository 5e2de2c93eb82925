//! Client configuration

/// Configuration for connecting to the order backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer credential for all reads and mutations
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Realtime channel address (host:port)
    pub channel_addr: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            channel_addr: None,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the realtime channel address
    pub fn with_channel_addr(mut self, addr: impl Into<String>) -> Self {
        self.channel_addr = Some(addr.into());
        self
    }

    /// Create an API client from this configuration
    pub fn build_api_client(&self) -> super::ApiClient {
        super::ApiClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
