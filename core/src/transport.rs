//! Executing `HttpRequest` values.
//!
//! The core never performs I/O on its own; `Repository` delegates the
//! round-trip to a `Transport`. Mobile hosts implement it over their
//! platform HTTP stack; `UreqTransport` covers desktop hosts and tests.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round-trip. Non-2xx statuses are returned as data;
/// only failures that produce no response become `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::Duration;

    use tracing::debug;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        /// Status codes are never turned into errors, so the mapper sees
        /// every 4xx/5xx response.
        pub fn new(timeout: Duration) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (key, value) in headers {
            if key.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
            debug!(method = %req.method, path = %req.path, "executing request");
            let headers = req.headers;
            let result = match (req.method, req.body) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&req.path), &headers).call(),
                (HttpMethod::Delete, _) => {
                    with_headers(self.agent.delete(&req.path), &headers).call()
                }
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(&req.path), &headers)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                (HttpMethod::Post, None) => {
                    with_headers(self.agent.post(&req.path), &headers).send_empty()
                }
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(&req.path), &headers)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                (HttpMethod::Put, None) => {
                    with_headers(self.agent.put(&req.path), &headers).send_empty()
                }
            };
            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            debug!(status, "response received");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
