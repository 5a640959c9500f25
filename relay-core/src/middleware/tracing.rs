use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Header carrying the correlation id for one relayed request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id attached to the request extensions so spans and
/// handlers can reference the same id the response will carry.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_headers(req: &Request) -> Self {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        RequestId(id)
    }
}

/// Attach a correlation id to every request and echo it on the response,
/// so one relayed call can be followed through the log.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(&req);

    // An inbound id that is not a valid header value is passed through
    // untouched rather than replaced.
    let Ok(header_value) = HeaderValue::from_str(&request_id.0) else {
        return next.run(req).await;
    };

    req.headers_mut()
        .insert(REQUEST_ID_HEADER, header_value.clone());
    req.extensions_mut().insert(request_id);

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    response
}
