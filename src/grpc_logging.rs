use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderMap, Request, Response};
use tonic::Code;
use tower::{Layer, Service};
use tracing::{debug, info, warn};

/// `service` and `method` parts of a `/package.Service/Method` request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrpcPath<'a> {
    pub service: &'a str,
    pub method: &'a str,
}

impl<'a> GrpcPath<'a> {
    /// Anything that is not `/service/method` maps to `unknown` parts.
    #[must_use]
    pub fn parse(path: &'a str) -> Self {
        match path.trim_start_matches('/').split_once('/') {
            Some((service, method)) if !service.is_empty() && !method.is_empty() => {
                Self { service, method }
            }
            _ => Self {
                service: "unknown",
                method: "unknown",
            },
        }
    }
}

/// Status carried in the `grpc-status` header; a missing header means the
/// status arrives later in trailers, which only happens for successful calls.
#[must_use]
pub fn response_code(headers: &HeaderMap) -> Code {
    headers
        .get("grpc-status")
        .map_or(Code::Ok, |v| Code::from_bytes(v.as_bytes()))
}

/// Tower layer logging each gRPC call with its status and duration.
#[derive(Clone, Copy)]
pub struct GrpcLoggingLayer;

impl<S> Layer<S> for GrpcLoggingLayer {
    type Service = GrpcLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcLoggingService { inner }
    }
}

#[derive(Clone)]
pub struct GrpcLoggingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for GrpcLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let path = req.uri().path().to_string();

        // Swap in the clone so the instance that was polled ready serves this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let grpc = GrpcPath::parse(&path);
            debug!(grpc.service = grpc.service, grpc.method = grpc.method, "gRPC call");

            let result = inner.call(req).await;
            let duration_ms = start.elapsed().as_millis();

            match result.as_ref().map(|response| response_code(response.headers())) {
                Ok(Code::Ok) => info!(
                    grpc.service = grpc.service,
                    grpc.method = grpc.method,
                    duration_ms = %duration_ms,
                    "gRPC call completed"
                ),
                Ok(code) => warn!(
                    grpc.service = grpc.service,
                    grpc.method = grpc.method,
                    grpc.code = ?code,
                    duration_ms = %duration_ms,
                    "gRPC call returned an error status"
                ),
                Err(_) => warn!(
                    grpc.service = grpc.service,
                    grpc.method = grpc.method,
                    duration_ms = %duration_ms,
                    "gRPC call failed in transport"
                ),
            }

            result
        })
    }
}
