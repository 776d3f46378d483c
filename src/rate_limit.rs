use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use http::header::{HeaderName, CONTENT_TYPE, RETRY_AFTER};
use http::{HeaderMap, HeaderValue, Request, Response};
use tonic::transport::server::TcpConnectInfo;
use tonic::Status;
use tower::{Layer, Service};
use tracing::warn;

/// Requests allowed per client and window unless configured otherwise.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Window length in seconds unless configured otherwise (15 minutes).
pub const DEFAULT_WINDOW_SECS: u64 = 900;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

/// Outcome of counting one request against its client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32, reset: Duration },
    Limited { reset: Duration },
}

impl Decision {
    fn remaining(self) -> u32 {
        match self {
            Self::Allowed { remaining, .. } => remaining,
            Self::Limited { .. } => 0,
        }
    }

    fn reset(self) -> Duration {
        match self {
            Self::Allowed { reset, .. } | Self::Limited { reset } => reset,
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP.
///
/// Requests without a known peer address share a single window.
#[derive(Debug)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<Option<IpAddr>, Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: Option<IpAddr>, now: Instant) -> Decision {
        let length = self.policy.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        // Expired windows are dropped whenever a new client shows up
        if !windows.contains_key(&client) {
            windows.retain(|_, w| now.saturating_duration_since(w.started) < length);
        }

        let window = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(window.started) >= length {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let reset = length.saturating_sub(now.saturating_duration_since(window.started));
        if window.count >= self.policy.max_requests {
            return Decision::Limited { reset };
        }
        window.count = window.count.saturating_add(1);
        Decision::Allowed {
            remaining: self.policy.max_requests.saturating_sub(window.count),
            reset,
        }
    }

    /// Number of clients with a live or expired-but-unpruned window.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Whole seconds until the window resets, rounded up.
fn reset_secs(reset: Duration) -> u64 {
    reset
        .as_secs()
        .saturating_add(u64::from(reset.subsec_nanos() > 0))
}

fn write_rate_limit_headers(headers: &mut HeaderMap, policy: RateLimitPolicy, decision: Decision) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(policy.max_requests));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(decision.remaining()));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs(decision.reset())));
}

/// Trailers-only gRPC response carrying `RESOURCE_EXHAUSTED`.
fn limited_response<B: Default>(policy: RateLimitPolicy, reset: Duration) -> Response<B> {
    let secs = reset_secs(reset);
    let status = Status::resource_exhausted(format!(
        "Too many requests, please try again in {secs} seconds"
    ));

    let mut response = Response::new(B::default());
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/grpc"));
    if let Err(e) = status.add_header(headers) {
        warn!("Failed to encode rate limit status: {e}");
    }
    write_rate_limit_headers(headers, policy, Decision::Limited { reset });
    headers.insert(RETRY_AFTER, HeaderValue::from(secs));
    response
}

fn client_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    req.extensions()
        .get::<TcpConnectInfo>()
        .and_then(TcpConnectInfo::remote_addr)
        .map(|addr| addr.ip())
}

/// Tower layer applying a per-client [`RateLimiter`] to every call.
#[derive(Debug, Clone)]
pub struct RateLimitLayer {
    limiter: Option<Arc<RateLimiter>>,
}

impl RateLimitLayer {
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            limiter: Some(Arc::new(RateLimiter::new(policy))),
        }
    }

    /// A layer that lets every request through.
    #[must_use]
    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    /// `None` disables rate limiting.
    #[must_use]
    pub fn from_policy(policy: Option<RateLimitPolicy>) -> Self {
        policy.map_or_else(Self::disabled, Self::new)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Option<Arc<RateLimiter>>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RateLimitService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let counted = self.limiter.as_ref().map(|limiter| {
            let client = client_ip(&req);
            (client, limiter.policy(), limiter.check(client, Instant::now()))
        });

        if let Some((client, policy, Decision::Limited { reset })) = counted {
            warn!(client = ?client, path = req.uri().path(), "Rate limit exceeded");
            return Box::pin(async move { Ok(limited_response(policy, reset)) });
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if let Some((_, policy, decision)) = counted {
                write_rate_limit_headers(response.headers_mut(), policy, decision);
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod rate_limit_tests;
