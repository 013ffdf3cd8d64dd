//! Bearer token attachment for outgoing requests.

use crate::http::HttpRequest;

const AUTH_PREFIX: &str = "/api/auth/";

/// Whether `request` targets a public auth endpoint.
pub fn is_auth_request(request: &HttpRequest) -> bool {
    request.path.contains(AUTH_PREFIX)
}

/// Attach `Authorization: Bearer <token>` unless the request is an auth
/// endpoint or no token is stored. An existing authorization header is
/// replaced.
pub fn authorize(mut request: HttpRequest, token: Option<&str>) -> HttpRequest {
    if is_auth_request(&request) {
        return request;
    }
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return request;
    };
    request
        .headers
        .retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
    request
        .headers
        .push(("Authorization".to_string(), format!("Bearer {token}")));
    request
}
