//! Query definitions and the `Storefront` seam.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use storefront_types::Locale;

use crate::StorefrontError;

/// An immutable GraphQL operation.
///
/// Queries are process-wide constants; a `GraphQlQuery` is `const`
/// constructible so call sites can declare them as `const` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQlQuery {
    /// Operation name sent as `operationName`.
    pub operation_name: &'static str,
    /// Full GraphQL document, fragments included.
    pub document: &'static str,
}

impl GraphQlQuery {
    pub const fn new(operation_name: &'static str, document: &'static str) -> Self {
        Self {
            operation_name,
            document,
        }
    }
}

/// Anything that can execute localized Storefront API queries.
///
/// Implementations return the `data` object of a successful response.
/// GraphQL-level errors must surface as [`StorefrontError::GraphQl`].
#[async_trait]
pub trait Storefront: Send + Sync {
    async fn query(&self, query: &GraphQlQuery, locale: &Locale) -> Result<Value, StorefrontError>;
}

/// JSON body of a GraphQL request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestBody<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: Variables<'a>,
}

/// The `@inContext` variables shared by every homepage query.
#[derive(Debug, Serialize)]
pub(crate) struct Variables<'a> {
    pub country: &'a str,
    pub language: &'a str,
}

impl<'a> RequestBody<'a> {
    pub(crate) fn new(query: &'a GraphQlQuery, locale: &'a Locale) -> Self {
        Self {
            query: query.document,
            operation_name: query.operation_name,
            variables: Variables {
                country: locale.country.as_str(),
                language: locale.language.as_str(),
            },
        }
    }
}

/// Decode `data.<field>` into a typed value.
///
/// # Example
///
/// ```rust
/// use storefront_client::decode;
/// use storefront_types::{Connection, RecommendedProduct};
///
/// let data = serde_json::json!({
///     "products": { "nodes": [{ "id": "1", "title": "Deskmat" }] }
/// });
/// let products: Connection<RecommendedProduct> = decode(&data, "products").unwrap();
/// assert_eq!(products.len(), 1);
/// ```
pub fn decode<T: DeserializeOwned>(data: &Value, field: &str) -> Result<T, StorefrontError> {
    let value = data
        .get(field)
        .ok_or_else(|| StorefrontError::Parse(format!("response has no '{}' field", field)))?;
    T::deserialize(value).map_err(|e| StorefrontError::Parse(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_types::{Connection, FeaturedCollection};

    const PING: GraphQlQuery = GraphQlQuery::new("Ping", "query Ping { shop { name } }");

    #[test]
    fn test_request_body_shape() {
        let locale = Locale::parse("CA", "fr").unwrap();
        let body = serde_json::to_value(RequestBody::new(&PING, &locale)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "query": "query Ping { shop { name } }",
                "operationName": "Ping",
                "variables": { "country": "CA", "language": "FR" }
            })
        );
    }

    #[test]
    fn test_decode_missing_field() {
        let data = serde_json::json!({});
        let err = decode::<Connection<FeaturedCollection>>(&data, "collections").unwrap_err();
        assert!(matches!(err, StorefrontError::Parse(_)));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let data = serde_json::json!({ "collections": { "nodes": [{ "id": 1 }] } });
        let err = decode::<Connection<FeaturedCollection>>(&data, "collections").unwrap_err();
        assert!(err.to_string().contains("collections"));
    }
}
