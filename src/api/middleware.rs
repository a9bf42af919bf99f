//! API Middleware
//!
//! Request context extraction and request logging.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::domain::OperationContext;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const PROJECT_ID_HEADER: &str = "x-auth-project-id";
pub const USER_ID_HEADER: &str = "x-auth-user-id";

// =========================================================================
// Request context
// =========================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build the `OperationContext` for a request from its headers
///
/// A missing or unparseable correlation id is replaced with a fresh one.
pub fn context_from_headers(headers: &HeaderMap) -> OperationContext {
    let mut context = OperationContext::for_caller(
        header_str(headers, PROJECT_ID_HEADER).map(str::to_string),
        header_str(headers, USER_ID_HEADER).map(str::to_string),
    );

    if let Some(correlation_id) =
        header_str(headers, CORRELATION_ID_HEADER).and_then(|s| Uuid::parse_str(s).ok())
    {
        context = context.with_correlation_id(correlation_id);
    }

    context.ensure_correlation_id();
    context
}

/// Attach an `OperationContext` to every request
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let mut context = context_from_headers(request.headers());

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        context = context.with_client_ip(addr.ip());
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["x-auth-token", "authorization", "cookie", "set-cookie"];

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

/// Request logging middleware
///
/// Must run inside `context_middleware` to pick up the correlation id.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .extensions()
        .get::<OperationContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-auth-token", "secret-token-12345".parse().unwrap());
        headers.insert("x-auth-project-id", "proj-1".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let token = masked.iter().find(|(k, _)| k == "x-auth-token");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let project = masked.iter().find(|(k, _)| k == "x-auth-project-id");

        assert_eq!(token.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(project.unwrap().1, "proj-1");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"x-auth-token"));
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }

    #[test]
    fn test_context_from_headers() {
        let correlation_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-project-id", "proj-1".parse().unwrap());
        headers.insert("x-auth-user-id", "alice".parse().unwrap());
        headers.insert(
            "x-correlation-id",
            correlation_id.to_string().parse().unwrap(),
        );

        let context = context_from_headers(&headers);
        assert_eq!(context.project_id.as_deref(), Some("proj-1"));
        assert_eq!(context.user_id.as_deref(), Some("alice"));
        assert_eq!(context.correlation_id, Some(correlation_id));
    }

    #[test]
    fn test_context_generates_correlation_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", "not-a-uuid".parse().unwrap());

        let context = context_from_headers(&headers);
        assert!(context.project_id.is_none());
        assert!(context.correlation_id.is_some());
        assert_ne!(context.correlation_id.map(|u| u.to_string()).as_deref(), Some("not-a-uuid"));
    }
}
