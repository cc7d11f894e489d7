//! # storefront-client
//!
//! GraphQL client for the commerce Storefront API.
//!
//! The crate exposes the [`Storefront`] trait, which is the only thing the
//! homepage loader depends on, and [`StorefrontClient`], the reqwest-backed
//! implementation that talks to a real store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storefront_client::{decode, GraphQlQuery, Storefront, StorefrontClient};
//! use storefront_types::{Connection, RecommendedProduct, Locale};
//!
//! const PRODUCTS: GraphQlQuery = GraphQlQuery::new(
//!     "Products",
//!     "query Products { products(first: 4) { nodes { id title } } }",
//! );
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StorefrontClient::builder().build()?;
//!
//!     let data = client.query(&PRODUCTS, &Locale::default()).await?;
//!     let products: Connection<RecommendedProduct> = decode(&data, "products")?;
//!
//!     println!("Fetched {} products", products.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod query;

pub use client::{StorefrontClient, StorefrontClientBuilder};
pub use error::StorefrontError;
pub use query::{decode, GraphQlQuery, Storefront};

// Re-export types for convenience
pub use storefront_types::{Connection, FeaturedCollection, Locale, RecommendedProduct};
