//! # bunnyhop
//!
//! Storefront homepage server for the BUNNYHOP deskmat shop.
//!
//! Each request to the homepage runs a loader against the commerce
//! Storefront API and streams the rendered page back:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         server                               │
//! │  request ──▶ route ──▶ loader::load ──▶ view ──▶ response     │
//! │                            │                                 │
//! │                            ▼                                 │
//! │               dyn Storefront (StorefrontClient |             │
//! │                               StaticStorefront)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`loader`]**: fetches the featured collection (critical, awaited) and
//!   the recommended products (deferred, returned as a [`loader::Deferred`]
//!   handle that resolves to `None` on failure)
//! - **[`view`]**: pure askama rendering of the loader result
//! - **[`server`]**: hyper HTTP/1 server with streamed responses
//! - **[`settings`]**: layered configuration (defaults, TOML file, env)
//!
//! ## Usage
//!
//! ```bash
//! # Serve against the store configured in bunnyhop.toml
//! bunnyhop --config bunnyhop.toml
//!
//! # Serve canned data, no network
//! bunnyhop --demo --listen 127.0.0.1:3000
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use bunnyhop::loader::{self, LoaderContext};
//! use bunnyhop::StaticStorefront;
//! use storefront_types::Locale;
//!
//! # tokio_test::block_on(async {
//! let ctx = LoaderContext::new(Arc::new(StaticStorefront::demo()), Locale::default());
//! let result = loader::load(&ctx).await.unwrap();
//! let html = bunnyhop::view::render_page(&result).await.unwrap();
//! assert!(html.contains("Shopify Connected"));
//! # });
//! ```

pub mod loader;
pub mod server;
pub mod settings;
pub mod static_storefront;
pub mod view;

// Re-export main types for convenience
pub use loader::{load, Deferred, LoaderContext, LoaderData, LoaderError, LoaderResult};
pub use server::{AppState, Server, ServerError};
pub use settings::{Settings, SettingsError};
pub use static_storefront::StaticStorefront;
pub use view::{Connectivity, ViewError};
