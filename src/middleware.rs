use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

use crate::recommend::UpstreamFailure;

/// One line per request with its latency. Requests that ended in a 502
/// because of the recommendation service are logged at `warn` together
/// with the failure kind.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match response.extensions().get::<UpstreamFailure>() {
        Some(UpstreamFailure(kind)) => warn!(
            method = %method,
            path = %path,
            status,
            elapsed_ms,
            upstream = *kind,
            "Request failed upstream"
        ),
        None => info!(
            method = %method,
            path = %path,
            status,
            elapsed_ms,
            "HTTP request"
        ),
    }

    response
}
