//! The request pipeline: routing, dispatch and error rendering.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use gosd_core::{ApiError, Endpoint, Handlers, QueryMap, RequestInput, DEVICE_ID_PARAM};
use gosd_router::{Lookup, MethodRouter, RouteMatch, Router};
use http::header::USER_AGENT;
use http::{Method, Request};

use crate::config::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::response::{error_response, forbidden, success_response, without_body, HttpResponse};

/// The routed API.
///
/// `App` owns the router for the endpoint catalogue and the collaborators
/// behind it. It knows nothing about sockets, so it can be driven directly
/// in tests.
///
/// # Example
///
/// ```rust
/// use gosd_core::Handlers;
/// use gosd_server::App;
///
/// let app = App::new("/v4", Handlers::stubbed());
/// assert_eq!(app.prefix(), "/v4");
/// ```
#[derive(Debug, Clone)]
pub struct App {
    router: Router<Endpoint>,
    handlers: Handlers,
    request_timeout: Duration,
}

/// What the pipeline needs from a request once the body is discarded.
struct RequestHead {
    method: Method,
    path: String,
    query: Option<String>,
    user_agent: Option<String>,
}

impl RequestHead {
    fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            // a non-UTF-8 header counts as absent
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

impl App {
    /// Mounts every endpoint as `GET` under `prefix`.
    #[must_use]
    pub fn new(prefix: &str, handlers: Handlers) -> Self {
        let mut router = Router::with_prefix(prefix);
        for endpoint in Endpoint::ALL {
            router.insert(endpoint.pattern(), MethodRouter::new().get(endpoint));
        }
        tracing::debug!(prefix = %router.prefix(), routes = router.len(), "endpoints mounted");
        Self {
            router,
            handlers,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Sets how long a handler may run before the request fails with 504.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the normalised API prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.router.prefix()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Handles one request. The body is never read.
    ///
    /// `HEAD` is answered like `GET` without a body.
    pub async fn handle<B>(&self, req: Request<B>) -> HttpResponse {
        let start = Instant::now();
        let head = RequestHead::from_request(&req);
        drop(req);

        let response = match self.router.lookup(&head.method, &head.path) {
            Lookup::OutsidePrefix => {
                tracing::debug!(path = %head.path, "request outside API prefix");
                forbidden()
            }
            Lookup::Unmatched => error_response(&ApiError::RouteNotFound),
            Lookup::Matched(found) => {
                let endpoint = *found.value;
                let input = request_input(&head, &found);
                match self.dispatch(endpoint, input).await {
                    Ok(success) => success_response(&success),
                    Err(error) => {
                        tracing::debug!(endpoint = %endpoint, error = %error, "request rejected");
                        error_response(&error)
                    }
                }
            }
        };

        let response = if head.method == Method::HEAD {
            without_body(response)
        } else {
            response
        };

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        gosd_telemetry::log_access!(head.method, head.path, response.status().as_u16(), latency_ms);
        response
    }

    /// Runs a handler on the blocking pool under the request timeout.
    ///
    /// A timed-out handler is abandoned, not cancelled; it runs to
    /// completion in the background and its result is dropped.
    async fn dispatch(
        &self,
        endpoint: Endpoint,
        input: RequestInput,
    ) -> Result<gosd_core::Success, ApiError> {
        let handlers = self.handlers.clone();
        let task = tokio::task::spawn_blocking(move || handlers.handle(endpoint, &input));

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                tracing::error!(endpoint = %endpoint, error = %join_error, "handler panicked");
                Err(ApiError::internal(format!("handler failed: {join_error}")))
            }
            Err(_) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    timeout_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
                    "handler timed out"
                );
                Err(ApiError::Timeout)
            }
        }
    }
}

fn request_input(head: &RequestHead, found: &RouteMatch<'_, Endpoint>) -> RequestInput {
    let input = RequestInput::new(head.user_agent.as_deref())
        .with_query(QueryMap::parse(head.query.as_deref()));
    match found.params.get(DEVICE_ID_PARAM) {
        Some(raw) => input.with_device_id(percent_decode(raw)),
        None => input,
    }
}

/// Decodes `%XX` escapes in a path segment. Malformed escapes are kept
/// literally; if the decoded bytes are not UTF-8 the raw segment is used.
fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
