use tower_http::cors::{Any, CorsLayer};

/// The quiz frontend is served from a different origin and sends the
/// `x-author-key` header on authoring requests, so headers stay open.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
