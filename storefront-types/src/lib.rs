//! # storefront-types
//!
//! Core types for the BUNNYHOP storefront. These are the shapes the
//! Storefront API hands back for the homepage queries, plus the locale
//! context every query runs in.
//!
//! ## Features
//!
//! - `serde`: Serialization and deserialization via serde. The field names
//!   match the GraphQL selection sets, so response JSON decodes directly.
//!
//! ## Example
//!
//! ```rust
//! use storefront_types::{Connection, FeaturedCollection, Locale};
//!
//! let collections = Connection::new(vec![FeaturedCollection::new(
//!     "gid://shopify/Collection/1",
//!     "Summer",
//!     "summer",
//! )]);
//!
//! assert_eq!(collections.first().map(|c| c.handle.as_str()), Some("summer"));
//! assert_eq!(Locale::default().path_prefix(), "/en-us");
//! ```

mod catalog;
mod connection;
mod locale;

pub use catalog::*;
pub use connection::*;
pub use locale::*;
