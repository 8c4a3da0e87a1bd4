//! API Middleware
//!
//! Request context extraction and request logging.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::domain::OperationContext;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// =========================================================================
// Request context
// =========================================================================

/// Build an [`OperationContext`] for the request and echo the correlation id
/// on the response.
///
/// A missing or unparsable `X-Correlation-Id` gets a fresh id.
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let context = context_from_headers(request.headers());
    let correlation_id = context.correlation_id;
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    if let Some(id) = correlation_id {
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            response.headers_mut().insert(CORRELATION_ID_HEADER, value);
        }
    }
    response
}

fn context_from_headers(headers: &HeaderMap) -> OperationContext {
    let mut context = OperationContext::new();

    if let Some(id) = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
    {
        context = context.with_correlation_id(id);
    }
    context.ensure_correlation_id();
    context
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware. Runs inside [`context_middleware`].
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .extensions()
        .get::<OperationContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            correlation_id = ?correlation_id,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            correlation_id = ?correlation_id,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer secret".parse().unwrap());
        headers.insert("x-patron-id", "123456".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let auth = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let patron = masked.iter().find(|(k, _)| k == "x-patron-id");

        assert_eq!(auth.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(patron.unwrap().1, "123456");
    }

    #[test]
    fn test_context_keeps_supplied_correlation_id() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, id.to_string().parse().unwrap());

        let context = context_from_headers(&headers);
        assert_eq!(context.correlation_id, Some(id));
    }

    #[test]
    fn test_context_generates_correlation_id() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, "not-a-uuid".parse().unwrap());

        let context = context_from_headers(&headers);
        assert!(context.correlation_id.is_some());

        let context = context_from_headers(&HeaderMap::new());
        assert!(context.correlation_id.is_some());
    }
}
