//! Catalog nodes selected by the homepage queries.

/// The collection highlighted on the homepage.
///
/// Selected by the `FeaturedCollection` fragment: the most recently updated
/// collection in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeaturedCollection {
    /// Global object id (e.g. `gid://shopify/Collection/123`).
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL slug.
    pub handle: String,
}

impl FeaturedCollection {
    pub fn new(id: impl Into<String>, title: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            handle: handle.into(),
        }
    }
}

/// A product surfaced in the recommendations block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendedProduct {
    pub id: String,
    pub title: String,
}

impl RecommendedProduct {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn test_collection_decodes_from_fragment_json() {
        let json = r#"{"id":"1","title":"Summer","handle":"summer"}"#;
        let collection: FeaturedCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection, FeaturedCollection::new("1", "Summer", "summer"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_collection_missing_handle_is_rejected() {
        let json = r#"{"id":"1","title":"Summer"}"#;
        assert!(serde_json::from_str::<FeaturedCollection>(json).is_err());
    }
}
