//! GraphQL operations issued by the homepage loader.

use storefront_client::GraphQlQuery;

/// The most recently updated collection, localized.
pub const FEATURED_COLLECTION_QUERY: GraphQlQuery = GraphQlQuery::new(
    "FeaturedCollection",
    r#"#graphql
  fragment FeaturedCollection on Collection {
    id
    title
    handle
  }
  query FeaturedCollection($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    collections(first: 1, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...FeaturedCollection
      }
    }
  }
"#,
);

/// The four most recently updated products, localized.
pub const RECOMMENDED_PRODUCTS_QUERY: GraphQlQuery = GraphQlQuery::new(
    "RecommendedProducts",
    r#"#graphql
  fragment RecommendedProduct on Product {
    id
    title
  }
  query RecommendedProducts($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    products(first: 4, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...RecommendedProduct
      }
    }
  }
"#,
);
