use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Logs every HTTP request: status, method, path, duration and body size
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} {} | {}ms | body error: {}",
                parts.status.as_u16(),
                method,
                uri.path(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let line = format!(
        "{} {} {} | {}ms | {} bytes",
        parts.status.as_u16(),
        method,
        uri.path(),
        start.elapsed().as_millis(),
        format_number(bytes.len() as u64)
    );
    if parts.status.is_success() {
        tracing::info!("{}", line);
    } else {
        tracing::warn!("{}", line);
    }

    Response::from_parts(parts, Body::from(bytes))
}
