//! Homepage data loader.
//!
//! The loader runs once per request and gathers everything the view needs.
//! Data comes in two tiers:
//!
//! - **Critical** data (the featured collection) is awaited before the
//!   loader returns. If it fails, the whole loader fails and the server
//!   answers with the error page.
//! - **Deferred** data (recommended products) is started first but not
//!   awaited. The loader hands back a [`Deferred`] handle; a failure is
//!   logged and the handle resolves to `None`, never to an error.
//!
//! ```text
//!   load()
//!     ├── spawn  RecommendedProducts ──────────────▶ Deferred<Option<Vec<_>>>
//!     └── try_join!(FeaturedCollection, ...) ──────▶ Option<FeaturedCollection>
//! ```

mod deferred;
mod queries;

pub use deferred::{Deferred, DeferredState};
pub use queries::{FEATURED_COLLECTION_QUERY, RECOMMENDED_PRODUCTS_QUERY};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use storefront_client::{decode, Storefront, StorefrontError};
use storefront_types::{Connection, FeaturedCollection, Locale, RecommendedProduct};

/// Deferred recommendations: `None` once resolved means the fetch failed.
pub type RecommendedProducts = Deferred<Option<Vec<RecommendedProduct>>>;

/// Errors that fail the loader.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A critical query failed; no partial result is produced.
    #[error("critical query {operation} failed: {source}")]
    Critical {
        operation: &'static str,
        #[source]
        source: StorefrontError,
    },
}

/// Per-request inputs to the loader.
#[derive(Clone)]
pub struct LoaderContext {
    pub storefront: Arc<dyn Storefront>,
    pub locale: Locale,
}

impl LoaderContext {
    pub fn new(storefront: Arc<dyn Storefront>, locale: Locale) -> Self {
        Self { storefront, locale }
    }
}

impl fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderContext")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

/// What the loader hands to the view.
#[derive(Debug, Clone)]
pub struct LoaderResult {
    /// Resolved before the loader returned. `None` when the store has no
    /// collections, which is not an error.
    pub featured_collection: Option<FeaturedCollection>,
    /// Still settling when the loader returns.
    pub recommended_products: RecommendedProducts,
}

impl LoaderResult {
    /// Wait for the recommendations; `None` if their fetch failed.
    pub async fn recommended_products(&self) -> Option<Vec<RecommendedProduct>> {
        self.recommended_products.resolved().await.flatten()
    }

    /// Wait for all deferred data and return a plain snapshot.
    pub async fn settle(&self) -> LoaderData {
        LoaderData {
            featured_collection: self.featured_collection.clone(),
            recommended_products: self.recommended_products().await,
        }
    }
}

/// Fully settled loader output, as served by the `?_data` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderData {
    pub featured_collection: Option<FeaturedCollection>,
    pub recommended_products: Option<Vec<RecommendedProduct>>,
}

struct CriticalData {
    featured_collection: Option<FeaturedCollection>,
}

struct DeferredData {
    recommended_products: RecommendedProducts,
}

/// Load the homepage data.
///
/// Starts the deferred fetch, then awaits the critical fetch. Returns
/// as soon as critical data is in; the deferred handle settles later.
pub async fn load(ctx: &LoaderContext) -> Result<LoaderResult, LoaderError> {
    let deferred = load_deferred_data(ctx);
    let critical = load_critical_data(ctx).await?;

    Ok(LoaderResult {
        featured_collection: critical.featured_collection,
        recommended_products: deferred.recommended_products,
    })
}

async fn load_critical_data(ctx: &LoaderContext) -> Result<CriticalData, LoaderError> {
    // Further critical queries join here and run concurrently.
    let (featured_collection,) = tokio::try_join!(fetch_featured_collection(ctx))?;

    Ok(CriticalData {
        featured_collection,
    })
}

fn load_deferred_data(ctx: &LoaderContext) -> DeferredData {
    let storefront = Arc::clone(&ctx.storefront);
    let locale = ctx.locale.clone();

    let recommended_products = Deferred::spawn(async move {
        match fetch_recommended_products(storefront.as_ref(), &locale).await {
            Ok(products) => Some(products),
            Err(e) => {
                error!(
                    operation = RECOMMENDED_PRODUCTS_QUERY.operation_name,
                    %locale,
                    error = %e,
                    "deferred query failed, serving without recommendations"
                );
                None
            }
        }
    });

    DeferredData {
        recommended_products,
    }
}

async fn fetch_featured_collection(
    ctx: &LoaderContext,
) -> Result<Option<FeaturedCollection>, LoaderError> {
    let critical = |source| LoaderError::Critical {
        operation: FEATURED_COLLECTION_QUERY.operation_name,
        source,
    };

    let data = ctx
        .storefront
        .query(&FEATURED_COLLECTION_QUERY, &ctx.locale)
        .await
        .map_err(critical)?;
    let collections: Connection<FeaturedCollection> =
        decode(&data, "collections").map_err(critical)?;

    debug!(count = collections.len(), "featured collection loaded");
    Ok(collections.into_first())
}

async fn fetch_recommended_products(
    storefront: &dyn Storefront,
    locale: &Locale,
) -> Result<Vec<RecommendedProduct>, StorefrontError> {
    let data = storefront.query(&RECOMMENDED_PRODUCTS_QUERY, locale).await?;
    let products: Connection<RecommendedProduct> = decode(&data, "products")?;
    Ok(products.into_nodes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticStorefront;

    fn summer() -> FeaturedCollection {
        FeaturedCollection::new("1", "Summer", "summer")
    }

    fn four_products() -> Vec<RecommendedProduct> {
        (1..=4)
            .map(|i| RecommendedProduct::new(i.to_string(), format!("Deskmat {}", i)))
            .collect()
    }

    fn context(storefront: StaticStorefront) -> (Arc<StaticStorefront>, LoaderContext) {
        let storefront = Arc::new(storefront);
        let ctx = LoaderContext::new(storefront.clone(), Locale::default());
        (storefront, ctx)
    }

    #[tokio::test]
    async fn test_collection_and_products_loaded() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_collections(vec![summer()])
                .with_products(four_products()),
        );

        let result = load(&ctx).await.unwrap();

        assert_eq!(result.featured_collection, Some(summer()));
        assert_eq!(result.recommended_products().await, Some(four_products()));
    }

    #[tokio::test]
    async fn test_zero_collections_is_none_not_error() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_collections(vec![])
                .with_products(four_products()),
        );

        let result = load(&ctx).await.unwrap();
        assert_eq!(result.featured_collection, None);
    }

    #[tokio::test]
    async fn test_only_first_collection_is_featured() {
        let (_, ctx) = context(StaticStorefront::new().with_collections(vec![
            summer(),
            FeaturedCollection::new("2", "Winter", "winter"),
        ]));

        let result = load(&ctx).await.unwrap();
        assert_eq!(result.featured_collection, Some(summer()));
    }

    #[tokio::test]
    async fn test_deferred_failure_resolves_to_none() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_collections(vec![summer()])
                .with_failure("RecommendedProducts", "network unreachable"),
        );

        let result = load(&ctx).await.unwrap();

        assert_eq!(result.featured_collection, Some(summer()));
        assert_eq!(result.recommended_products().await, None);
    }

    #[tokio::test]
    async fn test_deferred_malformed_response_resolves_to_none() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_collections(vec![summer()])
                .with_data("RecommendedProducts", serde_json::json!({ "products": 12 })),
        );

        let result = load(&ctx).await.unwrap();
        assert_eq!(result.recommended_products().await, None);
    }

    #[tokio::test]
    async fn test_loader_returns_before_deferred_settles() {
        let storefront = StaticStorefront::new()
            .with_collections(vec![summer()])
            .with_products(four_products());
        let gate = storefront.gate("RecommendedProducts");
        let (_, ctx) = context(storefront);

        let result = load(&ctx).await.unwrap();
        assert!(result.recommended_products.state().is_pending());

        gate.notify_one();
        assert_eq!(result.recommended_products().await, Some(four_products()));
    }

    #[tokio::test]
    async fn test_critical_failure_fails_loader() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_failure("FeaturedCollection", "connection refused")
                .with_products(four_products()),
        );

        match load(&ctx).await {
            Err(LoaderError::Critical { operation, source }) => {
                assert_eq!(operation, "FeaturedCollection");
                assert!(matches!(source, StorefrontError::Connection(_)));
            }
            Ok(result) => panic!("expected failure, got {:?}", result.featured_collection),
        }
    }

    #[tokio::test]
    async fn test_critical_malformed_response_fails_loader() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_data("FeaturedCollection", serde_json::json!({ "shop": {} })),
        );

        assert!(load(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_both_queries_use_request_locale() {
        let storefront = Arc::new(
            StaticStorefront::new()
                .with_collections(vec![summer()])
                .with_products(four_products()),
        );
        let locale = Locale::parse("CA", "FR").unwrap();
        let ctx = LoaderContext::new(storefront.clone(), locale.clone());

        let result = load(&ctx).await.unwrap();
        result.recommended_products().await;

        let mut calls = storefront.calls();
        calls.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            calls,
            vec![
                ("FeaturedCollection".to_string(), locale.clone()),
                ("RecommendedProducts".to_string(), locale),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_loads_are_identical() {
        let (_, ctx) = context(
            StaticStorefront::new()
                .with_collections(vec![summer()])
                .with_products(four_products()),
        );

        let first = load(&ctx).await.unwrap().settle().await;
        let second = load(&ctx).await.unwrap().settle().await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_loader_data_json_shape() {
        let data = LoaderData {
            featured_collection: None,
            recommended_products: None,
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({ "featuredCollection": null, "recommendedProducts": null })
        );
    }
}
