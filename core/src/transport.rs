//! The I/O seam between `HttpClient` and the network.
//!
//! # Design
//! `HttpClient` never talks to a socket itself. It builds an `HttpRequest`
//! value and hands it to a `Transport`, which returns an `HttpResponse`.
//! Non-2xx statuses are *responses*, not errors: only connectivity failures
//! surface as `TrelloError::Transport`. Status translation happens later, in
//! `middleware::check_response`.

use std::fmt;
use std::time::Duration;

use ureq::Agent;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Agent with a global deadline per request. HTTP error statuses are
    /// returned as responses.
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref();

        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call()?,
            HttpMethod::Head => with_headers(self.agent.head(url), headers).call()?,
            HttpMethod::Delete => {
                let builder = with_headers(self.agent.delete(url), headers);
                match body {
                    Some(body) => builder.force_send_body().send(body.as_bytes())?,
                    None => builder.call()?,
                }
            }
            HttpMethod::Post => send(with_headers(self.agent.post(url), headers), body)?,
            HttpMethod::Put => send(with_headers(self.agent.put(url), headers), body)?,
            HttpMethod::Patch => send(with_headers(self.agent.patch(url), headers), body)?,
        };

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            response.body_mut().read_to_string()?
        };

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
