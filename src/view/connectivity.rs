//! Storefront connectivity indicator.

use storefront_types::FeaturedCollection;

/// Whether the storefront answered with a featured collection.
///
/// Derived only from presence of the collection, so "no collections in the
/// store" and "API misconfigured" look the same here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn from_featured(featured: Option<&FeaturedCollection>) -> Self {
        if featured.is_some() {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Connected => "✅ Shopify Connected",
            Connectivity::Disconnected => "❌ Check API",
        }
    }

    /// CSS modifier class suffix.
    pub fn modifier(&self) -> &'static str {
        match self {
            Connectivity::Connected => "connected",
            Connectivity::Disconnected => "disconnected",
        }
    }
}
