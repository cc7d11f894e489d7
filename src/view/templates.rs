//! Askama template bindings.

use askama::Template;

use storefront_types::RecommendedProduct;

use super::Connectivity;

/// What the recommendations region shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProductsRegion<'a> {
    /// Still loading; show the fallback.
    Pending,
    /// Settled with nothing to show (no products, or the fetch failed).
    Empty,
    List(&'a [RecommendedProduct]),
}

impl<'a> ProductsRegion<'a> {
    pub(crate) fn settled(products: Option<&'a [RecommendedProduct]>) -> Self {
        match products {
            Some(items) if !items.is_empty() => ProductsRegion::List(items),
            _ => ProductsRegion::Empty,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, ProductsRegion::Pending)
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate<'a> {
    pub title: &'a str,
    pub connectivity: Connectivity,
    pub products: ProductsRegion<'a>,
}

#[derive(Template)]
#[template(path = "resolved_chunk.html")]
pub(crate) struct ResolvedChunkTemplate<'a> {
    pub products: ProductsRegion<'a>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub(crate) struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub status: u16,
    pub message: &'a str,
}
