//! HTTP server for the storefront homepage.
//!
//! Routes:
//!
//! - `GET /` and `GET /{lang}-{country}` - the homepage, streamed. The
//!   shell goes out once critical data is loaded; if recommendations are
//!   still pending, their chunk and the closing tags follow when they settle.
//! - `GET /?_data` - the settled loader data as JSON.
//! - `GET /health`, `GET /healthz` - liveness.
//!
//! A failing critical query turns into a 500 error page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bunnyhop::server::{AppState, Server};
//! use bunnyhop::StaticStorefront;
//! use storefront_types::Locale;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Arc::new(StaticStorefront::demo()), Locale::default());
//!     let server = Server::bind("127.0.0.1:3000", state).await?;
//!
//!     // Homepage available at http://127.0.0.1:3000/
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame, Incoming};
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use storefront_client::Storefront;
use storefront_types::Locale;

use crate::loader::{self, LoaderContext, LoaderResult};
use crate::view;

/// Response body type: either a full buffer or a stream of chunks.
pub type ResponseBody = UnsyncBoxBody<Bytes, Infallible>;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared by all connections.
#[derive(Clone)]
pub struct AppState {
    storefront: Arc<dyn Storefront>,
    default_locale: Locale,
}

impl AppState {
    pub fn new(storefront: Arc<dyn Storefront>, default_locale: Locale) -> Self {
        Self {
            storefront,
            default_locale,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("default_locale", &self.default_locale)
            .finish_non_exhaustive()
    }
}

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The homepage. `locale` is `None` for the unprefixed path.
    Home { locale: Option<Locale>, data: bool },
    Health,
    NotFound,
}

/// Map a request path and query string to a route.
pub fn route(path: &str, query: Option<&str>) -> Route {
    let data = query.is_some_and(|q| {
        q.split('&')
            .any(|pair| pair == "_data" || pair.starts_with("_data="))
    });

    match path {
        "" | "/" => Route::Home { locale: None, data },
        "/health" | "/healthz" => Route::Health,
        _ => {
            let segment = path.trim_end_matches('/');
            let segment = segment.strip_prefix('/').unwrap_or(segment);
            if segment.contains('/') {
                return Route::NotFound;
            }
            match Locale::from_path_prefix(segment) {
                Some(locale) => Route::Home {
                    locale: Some(locale),
                    data,
                },
                None => Route::NotFound,
            }
        }
    }
}

/// The homepage server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Bind to `listen_addr` (e.g., "127.0.0.1:3000"; port 0 picks a free port).
    pub async fn bind(listen_addr: &str, state: AppState) -> Result<Self, ServerError> {
        let addr: SocketAddr = listen_addr
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: listen_addr.to_string(),
                source,
            })?;
        let listener = TcpListener::bind(addr).await?;

        Ok(Self { listener, state })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the runtime shuts down.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` completes.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
                _ = &mut shutdown => {
                    info!("shutdown requested, no longer accepting connections");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let state = self.state.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let state = state.clone();
                    async move { handle_request(req, state).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(%peer, error = %e, "connection error");
                }
            });
        }
    }

    /// Spawn the server onto the runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!(error = %e, "storefront server stopped");
            }
        })
    }
}

async fn handle_request(
    req: Request<Incoming>,
    state: AppState,
) -> Result<Response<ResponseBody>, Infallible> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Ok(method_not_allowed());
    }

    debug!(method = %req.method(), uri = %req.uri(), "request");

    let response = match route(req.uri().path(), req.uri().query()) {
        Route::Health => respond(StatusCode::OK, TEXT, full("OK")),
        Route::NotFound => error_page(StatusCode::NOT_FOUND),
        Route::Home { locale, data } => {
            let locale = locale.unwrap_or_else(|| state.default_locale.clone());
            homepage(&state, locale, data).await
        }
    };

    Ok(response)
}

async fn homepage(state: &AppState, locale: Locale, data: bool) -> Response<ResponseBody> {
    let ctx = LoaderContext::new(Arc::clone(&state.storefront), locale);
    info!(locale = %ctx.locale, data, "rendering homepage");

    let result = match loader::load(&ctx).await {
        Ok(result) => result,
        Err(e) => {
            error!(locale = %ctx.locale, error = %e, "homepage loader failed");
            return error_page(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if data {
        loader_data(&result).await
    } else {
        stream_page(result)
    }
}

async fn loader_data(result: &LoaderResult) -> Response<ResponseBody> {
    let data = result.settle().await;
    match serde_json::to_vec(&data) {
        Ok(json) => respond(StatusCode::OK, JSON, full(json)),
        Err(e) => {
            error!(error = %e, "failed to serialize loader data");
            error_page(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn stream_page(result: LoaderResult) -> Response<ResponseBody> {
    // Checked before rendering: if the value lands in between, the shell
    // already lists it and the extra chunk just re-renders the same list.
    let pending = result.recommended_products.state().is_pending();

    let shell = match view::render_shell(&result) {
        Ok(shell) => shell,
        Err(e) => {
            error!(error = %e, "failed to render homepage");
            return error_page(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !pending {
        let mut page = shell;
        page.push_str(view::render_document_end());
        return respond(StatusCode::OK, HTML, full(page));
    }

    let head = stream::once(async move { Ok::<_, Infallible>(Frame::data(Bytes::from(shell))) });
    let tail = stream::once(async move {
        let products = result.recommended_products().await;
        let mut chunk = view::render_resolved(products.as_deref()).unwrap_or_else(|e| {
            error!(error = %e, "failed to render recommended products");
            String::new()
        });
        chunk.push_str(view::render_document_end());
        Ok::<_, Infallible>(Frame::data(Bytes::from(chunk)))
    });

    let body = StreamBody::new(head.chain(tail)).boxed_unsync();
    respond(StatusCode::OK, HTML, body)
}

fn method_not_allowed() -> Response<ResponseBody> {
    let mut response = error_page(StatusCode::METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

fn error_page(status: StatusCode) -> Response<ResponseBody> {
    match view::render_error_page(status.as_u16()) {
        Ok(html) => respond(status, HTML, full(html)),
        Err(e) => {
            error!(error = %e, "failed to render error page");
            respond(status, TEXT, full(status.to_string()))
        }
    }
}

fn full(body: impl Into<Bytes>) -> ResponseBody {
    Full::new(body.into()).boxed_unsync()
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: ResponseBody,
) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
