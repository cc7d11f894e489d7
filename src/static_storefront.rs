//! In-memory [`Storefront`] that answers from canned replies.
//!
//! Backs the `--demo` mode of the binary and the loader and server tests.
//! Replies are keyed by GraphQL operation name. An operation can also be
//! gated so that its reply is held back until the test releases it, which
//! makes deferred-resolution ordering deterministic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use storefront_client::{GraphQlQuery, Storefront, StorefrontError};
use storefront_types::{FeaturedCollection, Locale, RecommendedProduct};

#[derive(Debug, Clone)]
enum Reply {
    Data(Value),
    Fail(String),
}

/// A storefront that serves fixed data without touching the network.
///
/// # Example
///
/// ```
/// use bunnyhop::StaticStorefront;
/// use storefront_types::FeaturedCollection;
///
/// let storefront = StaticStorefront::new()
///     .with_collections(vec![FeaturedCollection::new("1", "Summer", "summer")])
///     .with_failure("RecommendedProducts", "connection reset");
/// ```
#[derive(Debug, Default)]
pub struct StaticStorefront {
    replies: HashMap<String, Reply>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<(String, Locale)>>,
}

impl StaticStorefront {
    /// A storefront with no replies; every query fails as unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canned catalog served by `bunnyhop --demo`.
    pub fn demo() -> Self {
        Self::new()
            .with_collections(vec![FeaturedCollection::new(
                "gid://shopify/Collection/1",
                "Summer Drop",
                "summer-drop",
            )])
            .with_products(vec![
                RecommendedProduct::new("gid://shopify/Product/1", "Neon Grid XL Deskmat"),
                RecommendedProduct::new("gid://shopify/Product/2", "Acid Wave Deskmat"),
                RecommendedProduct::new("gid://shopify/Product/3", "Bunny Stamp Deskmat"),
                RecommendedProduct::new("gid://shopify/Product/4", "Loot Crate Mousepad"),
            ])
    }

    /// Answer `operation` with the given `data` object.
    pub fn with_data(mut self, operation: &str, data: Value) -> Self {
        self.replies.insert(operation.to_string(), Reply::Data(data));
        self
    }

    /// Make `operation` fail with a connection error.
    pub fn with_failure(mut self, operation: &str, message: &str) -> Self {
        self.replies
            .insert(operation.to_string(), Reply::Fail(message.to_string()));
        self
    }

    /// Answer the featured-collection query with these collections.
    pub fn with_collections(self, collections: Vec<FeaturedCollection>) -> Self {
        self.with_data(
            "FeaturedCollection",
            json!({ "collections": { "nodes": collections } }),
        )
    }

    /// Answer the recommended-products query with these products.
    pub fn with_products(self, products: Vec<RecommendedProduct>) -> Self {
        self.with_data(
            "RecommendedProducts",
            json!({ "products": { "nodes": products } }),
        )
    }

    /// Hold back replies to `operation` until the returned gate is notified.
    ///
    /// The gate stores one permit, so notifying before the query arrives
    /// releases it immediately.
    pub fn gate(&self, operation: &str) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        gates
            .entry(operation.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// Operations queried so far, with the locale each ran in.
    pub fn calls(&self) -> Vec<(String, Locale)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Storefront for StaticStorefront {
    async fn query(&self, query: &GraphQlQuery, locale: &Locale) -> Result<Value, StorefrontError> {
        let operation = query.operation_name;
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((operation.to_string(), locale.clone()));

        let gate = self
            .gates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(operation)
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.replies.get(operation) {
            Some(Reply::Data(data)) => Ok(data.clone()),
            Some(Reply::Fail(message)) => Err(StorefrontError::Connection(message.clone())),
            None => Err(StorefrontError::GraphQl {
                operation: operation.to_string(),
                messages: format!("no reply configured for {}", operation),
            }),
        }
    }
}
