//! Homepage rendering.
//!
//! Everything here is a pure function of loader output: no I/O, no shared
//! state. The page is produced in up to three pieces so the server can
//! stream it:
//!
//! 1. [`render_shell`] - document head, hero, connectivity indicator and the
//!    recommendations region (already filled in, or a loading fallback).
//! 2. [`render_resolved`] - only when recommendations were still pending;
//!    a chunk that swaps the fallback for the settled list.
//! 3. [`render_document_end`] - closes the document.

mod connectivity;
mod templates;

pub use connectivity::Connectivity;

use askama::Template;
use thiserror::Error;

use storefront_types::RecommendedProduct;

use crate::loader::{DeferredState, LoaderResult};
use templates::{ErrorTemplate, HomeTemplate, ProductsRegion, ResolvedChunkTemplate};

/// Document title of the homepage.
pub const PAGE_TITLE: &str = "BUNNYHOP | EQUIP LOOT";

/// Errors raised while rendering templates.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

/// Static metadata for the document head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub title: &'static str,
}

/// Metadata for the homepage.
pub fn meta() -> PageMeta {
    PageMeta { title: PAGE_TITLE }
}

/// Render the page up to, but not including, `</body></html>`.
pub fn render_shell(result: &LoaderResult) -> Result<String, ViewError> {
    let state = result.recommended_products.state();
    let products = match &state {
        DeferredState::Pending => ProductsRegion::Pending,
        DeferredState::Resolved(products) => ProductsRegion::settled(products.as_deref()),
    };

    let template = HomeTemplate {
        title: meta().title,
        connectivity: Connectivity::from_featured(result.featured_collection.as_ref()),
        products,
    };
    Ok(template.render()?)
}

/// Render the chunk that replaces the loading fallback once the
/// recommendations settle. `None` renders an empty region.
pub fn render_resolved(products: Option<&[RecommendedProduct]>) -> Result<String, ViewError> {
    let template = ResolvedChunkTemplate {
        products: ProductsRegion::settled(products),
    };
    Ok(template.render()?)
}

/// Closing tags for the document.
pub fn render_document_end() -> &'static str {
    "</body>\n</html>\n"
}

/// Render a complete page in one piece, waiting for deferred data.
pub async fn render_page(result: &LoaderResult) -> Result<String, ViewError> {
    let mut page = render_shell(result)?;
    if result.recommended_products.state().is_pending() {
        let products = result.recommended_products().await;
        page.push_str(&render_resolved(products.as_deref())?);
    }
    page.push_str(render_document_end());
    Ok(page)
}

/// Render the error page shown when the loader fails.
///
/// The message is generic on purpose; error details stay in the logs.
pub fn render_error_page(status: u16) -> Result<String, ViewError> {
    let message = match status {
        404 => "This page hopped away.",
        405 => "That method is not supported here.",
        _ => "Something went wrong loading the shop. Try again in a moment.",
    };
    let template = ErrorTemplate {
        title: PAGE_TITLE,
        status,
        message,
    };
    Ok(template.render()?)
}
