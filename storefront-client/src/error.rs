//! Error types for Storefront API queries.

use thiserror::Error;

/// Ways a Storefront API query can fail.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The store answered with a non-2xx status, or the request broke
    /// after the connection was made.
    #[error("storefront request failed: {0}")]
    Http(String),

    /// The body was not a GraphQL envelope, or `data` did not have the
    /// shape the query selects.
    #[error("unexpected storefront response: {0}")]
    Parse(String),

    /// 401 or 403: the public access token is missing or revoked.
    #[error("storefront token rejected: {0}")]
    Auth(String),

    /// The store could not be reached.
    #[error("cannot reach storefront: {0}")]
    Connection(String),

    #[error("storefront query timed out")]
    Timeout,

    /// The query ran but the API listed errors in the envelope.
    #[error("GraphQL errors in {operation}: {messages}")]
    GraphQl { operation: String, messages: String },
}

impl From<reqwest::Error> for StorefrontError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorefrontError::Timeout
        } else if err.is_connect() {
            StorefrontError::Connection(err.to_string())
        } else {
            StorefrontError::Http(err.to_string())
        }
    }
}
