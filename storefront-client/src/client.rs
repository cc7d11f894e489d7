//! HTTP client for the Storefront API.
//!
//! Queries are POSTed as JSON to `{endpoint}/api/{version}/graphql.json`
//! with the public access token in the `X-Shopify-Storefront-Access-Token`
//! header.
//!
//! ## Example
//!
//! ```rust,no_run
//! use storefront_client::{GraphQlQuery, Storefront, StorefrontClient};
//! use storefront_types::Locale;
//!
//! const SHOP: GraphQlQuery = GraphQlQuery::new("Shop", "query Shop { shop { name } }");
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StorefrontClient::builder()
//!         .endpoint("https://bunnyhop.myshopify.com")
//!         .public_token("public-token")
//!         .build()?;
//!
//!     let data = client.query(&SHOP, &Locale::default()).await?;
//!     println!("{}", data["shop"]["name"]);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use storefront_types::Locale;

use crate::query::RequestBody;
use crate::{GraphQlQuery, Storefront, StorefrontError};

/// Header carrying the public Storefront API token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "2025-01";

/// Default store endpoint: the public mock shop, which needs no token.
pub const DEFAULT_ENDPOINT: &str = "https://mock.shop";

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    api_version: String,
    public_token: Option<String>,
}

impl StorefrontClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> StorefrontClientBuilder {
        StorefrontClientBuilder::default()
    }

    /// The GraphQL URL requests are sent to.
    pub fn graphql_url(&self) -> String {
        format!("{}/api/{}/graphql.json", self.endpoint, self.api_version)
    }

    async fn execute(
        &self,
        query: &GraphQlQuery,
        locale: &Locale,
    ) -> Result<Value, StorefrontError> {
        let url = self.graphql_url();
        debug!(operation = query.operation_name, %locale, "dispatching storefront query");

        let mut request = self
            .client
            .post(&url)
            .json(&RequestBody::new(query, locale));

        if let Some(token) = &self.public_token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorefrontError::Auth(format!(
                "API rejected access token ({})",
                status
            )));
        }

        if !status.is_success() {
            return Err(StorefrontError::Http(format!(
                "API returned status {}",
                status
            )));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| StorefrontError::Parse(e.to_string()))?;

        envelope.into_data(query.operation_name)
    }
}

#[async_trait]
impl Storefront for StorefrontClient {
    async fn query(&self, query: &GraphQlQuery, locale: &Locale) -> Result<Value, StorefrontError> {
        self.execute(query, locale).await
    }
}

/// Builder for StorefrontClient.
#[derive(Debug, Default)]
pub struct StorefrontClientBuilder {
    endpoint: Option<String>,
    api_version: Option<String>,
    public_token: Option<String>,
    timeout: Option<Duration>,
}

impl StorefrontClientBuilder {
    /// Set the store endpoint (e.g., "https://bunnyhop.myshopify.com").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API version (default: "2025-01").
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the public Storefront API access token.
    pub fn public_token(mut self, token: impl Into<String>) -> Self {
        self.public_token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<StorefrontClient, StorefrontError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            StorefrontError::Connection(format!("failed to build HTTP client: {}", e))
        })?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(StorefrontClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            public_token: self.public_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Top-level GraphQL response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl Envelope {
    fn into_data(self, operation: &str) -> Result<Value, StorefrontError> {
        if !self.errors.is_empty() {
            let messages = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StorefrontError::GraphQl {
                operation: operation.to_string(),
                messages,
            });
        }

        match self.data {
            Some(Value::Null) | None => Err(StorefrontError::Parse(format!(
                "{} returned no data",
                operation
            ))),
            Some(data) => Ok(data),
        }
    }
}
