//! HTTP request/response values.
//!
//! # Design
//! Requests and responses are plain data. `HttpClient` assembles an
//! `HttpRequest`, hands it through the auth stage, and passes it to a
//! `Transport` which performs the I/O and returns an `HttpResponse`. Keeping
//! both sides as values means every stage can be tested without a socket,
//! and a test transport can record exactly what would have been sent.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a path segment or OAuth value (RFC 3986).
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a form body.
    pub fn has_body(self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already includes the query string. `body` holds the
/// `application/x-www-form-urlencoded` payload for methods that carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace (or add) a header, keeping header names unique.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    /// Decoded query pairs of `url`, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Decoded form pairs of `body`, in order.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.body
            .as_deref()
            .map(|body| {
                url::form_urlencoded::parse(body.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    ///
    /// Empty bodies decode to `Null`; bodies that are not JSON are returned
    /// verbatim as a JSON string.
    pub fn content(&self) -> serde_json::Value {
        if self.body.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_decodes_json() {
        let resp = HttpResponse::new(200, r#"{"id":"abc","closed":false}"#);
        assert_eq!(resp.content(), json!({"id": "abc", "closed": false}));
    }

    #[test]
    fn content_falls_back_to_raw_text() {
        let resp = HttpResponse::new(500, "upstream exploded");
        assert_eq!(resp.content(), json!("upstream exploded"));
        assert_eq!(HttpResponse::new(200, "").content(), serde_json::Value::Null);
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.trello.com/1/boards".into(),
            headers: vec![("accept".into(), "text/plain".into())],
            body: None,
        };
        req.set_header("Accept", "application/json");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn encode_component_keeps_unreserved() {
        assert_eq!(encode_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_component("a b/c?"), "a%20b%2Fc%3F");
    }

    #[test]
    fn form_and_query_pairs_decode() {
        let req = HttpRequest {
            method: HttpMethod::Put,
            url: "https://api.trello.com/1/cards/1?fields=name%2Cdesc".into(),
            headers: Vec::new(),
            body: Some("value=Sprint+1&closed=true".into()),
        };
        assert_eq!(req.query_pairs(), vec![("fields".into(), "name,desc".into())]);
        assert_eq!(
            req.form_pairs(),
            vec![
                ("value".into(), "Sprint 1".into()),
                ("closed".into(), "true".into())
            ]
        );
        assert!(req.method.has_body());
        assert!(!HttpMethod::Head.has_body());
    }
}
