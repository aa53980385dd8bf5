//! `?_method=` override — lets plain HTML forms reach PUT/PATCH/DELETE routes.
//!
//! Runs before routing: a `POST` whose query string carries
//! `_method=PUT|PATCH|DELETE` (any case) is re-issued with that method.
//! Anything else passes through untouched.

use axum::extract::{Query, Request};
use axum::http::Method;
use serde::Deserialize;
use tower::util::MapRequestLayer;
use tracing::debug;

/// Request rewriter installed in front of the router.
pub type OverrideFn = fn(Request) -> Request;

#[derive(Deserialize)]
struct OverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

pub fn layer() -> MapRequestLayer<OverrideFn> {
    MapRequestLayer::new(override_method as OverrideFn)
}

pub fn override_method(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    let Some(method) = requested_method(&req) else {
        return req;
    };

    debug!("method override: POST -> {} {}", method, req.uri().path());
    *req.method_mut() = method;
    req
}

fn requested_method(req: &Request) -> Option<Method> {
    let Query(query) = Query::<OverrideQuery>::try_from_uri(req.uri()).ok()?;
    match query.method?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, uri: &str) -> Request {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn post_with_override_is_rewritten() {
        let req = override_method(request(Method::POST, "/students/abc?_method=PUT"));
        assert_eq!(req.method(), Method::PUT);

        let req = override_method(request(Method::POST, "/students/abc?_method=delete"));
        assert_eq!(req.method(), Method::DELETE);

        let req = override_method(request(Method::POST, "/students/abc?x=1&_method=Patch"));
        assert_eq!(req.method(), Method::PATCH);
    }

    #[test]
    fn path_is_preserved() {
        let req = override_method(request(Method::POST, "/students/abc?_method=PUT"));
        assert_eq!(req.uri().path(), "/students/abc");
    }

    #[test]
    fn other_requests_pass_through() {
        let req = override_method(request(Method::GET, "/students/abc?_method=DELETE"));
        assert_eq!(req.method(), Method::GET);

        let req = override_method(request(Method::POST, "/students"));
        assert_eq!(req.method(), Method::POST);

        let req = override_method(request(Method::POST, "/students?_method=GET"));
        assert_eq!(req.method(), Method::POST);

        let req = override_method(request(Method::POST, "/students?_method=TRACE"));
        assert_eq!(req.method(), Method::POST);
    }
}
