//! Header management, auth, and dispatch around a `Transport`.
//!
//! # Design
//! Every call goes through `build_request` (URL join, query string, form
//! body, header merge, auth stage) and then `Transport::execute`, with
//! `middleware::check_response` applied to the result. Header precedence,
//! lowest first: defaults, headers added with `set_headers`, per-call headers.
//! Names compare case-insensitively.

use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::middleware::{check_response, AuthMethod};
use crate::params::{create_parameters_body, Params};
use crate::transport::{Transport, UreqTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query and form parameters for `HttpClient::request`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Params,
    pub form: Params,
}

impl RequestOptions {
    pub fn query(query: Params) -> Self {
        Self {
            query,
            form: Params::new(),
        }
    }

    pub fn form(form: Params) -> Self {
        Self {
            query: Params::new(),
            form,
        }
    }
}

pub struct HttpClient {
    transport: Box<dyn Transport>,
    base_url: String,
    user_agent: String,
    headers: Vec<(String, String)>,
    auth: Option<AuthMethod>,
}

impl HttpClient {
    /// Client backed by a blocking `ureq` agent.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout))
    }

    pub fn with_transport(config: &ClientConfig, transport: impl Transport + 'static) -> Self {
        let user_agent = config.user_agent.clone();
        Self {
            transport: Box::new(transport),
            base_url: config.api_url(),
            headers: default_headers(&user_agent),
            user_agent,
            auth: None,
        }
    }

    /// Versioned API root, ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Merge `headers` into the current set; a later value replaces an
    /// earlier one with the same name.
    pub fn set_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            merge_header(&mut self.headers, name.into(), value.into());
        }
    }

    /// Drop everything added with `set_headers`, keeping the defaults.
    pub fn clear_headers(&mut self) {
        self.headers = default_headers(&self.user_agent);
    }

    /// Install the auth stage, replacing any previous mode.
    pub fn authenticate(&mut self, auth: AuthMethod) {
        debug!(method = auth.name(), "auth stage installed");
        self.auth = Some(auth);
    }

    pub fn auth(&self) -> Option<&AuthMethod> {
        self.auth.as_ref()
    }

    pub fn get(&self, path: &str, query: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Get, path, &[], RequestOptions::query(query.clone()))
    }

    pub fn head(&self, path: &str, query: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Head, path, &[], RequestOptions::query(query.clone()))
    }

    pub fn post(&self, path: &str, body: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Post, path, &[], RequestOptions::form(body.clone()))
    }

    pub fn put(&self, path: &str, body: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Put, path, &[], RequestOptions::form(body.clone()))
    }

    pub fn patch(&self, path: &str, body: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Patch, path, &[], RequestOptions::form(body.clone()))
    }

    pub fn delete(&self, path: &str, body: &Params) -> Result<HttpResponse> {
        self.request(HttpMethod::Delete, path, &[], RequestOptions::form(body.clone()))
    }

    /// Build, authenticate, send, and check one request.
    #[instrument(level = "debug", skip_all, fields(method = %method, path = %path))]
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, headers, &options)?;
        self.send(&request)
    }

    /// Send a fully built request as is, skipping the header merge and the
    /// auth stage. Responses are still checked.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "dispatching");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, bytes = response.body.len(), "response received");
        check_response(response)
    }

    /// Pick up a new API root and user agent. Headers added with
    /// `set_headers` other than `User-Agent` survive.
    pub fn reconfigure(&mut self, config: &ClientConfig) {
        self.base_url = config.api_url();
        self.user_agent = config.user_agent.clone();
        merge_header(&mut self.headers, "User-Agent".to_string(), self.user_agent.clone());
    }

    /// The request `request` would send, after the auth stage.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        options: &RequestOptions,
    ) -> Result<HttpRequest> {
        let mut url = self.url(path);
        let query = options.query.to_wire_pairs();
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encode_pairs(&query));
        }

        let mut merged = self.headers.clone();
        for (name, value) in headers {
            merge_header(&mut merged, (*name).to_string(), (*value).to_string());
        }

        let form = create_parameters_body(options.form.clone()).to_wire_pairs();
        let body = if method.has_body() && !form.is_empty() {
            if !merged.iter().any(|(k, _)| k.eq_ignore_ascii_case("Content-Type")) {
                merged.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
            }
            Some(encode_pairs(&form))
        } else {
            None
        };

        let mut request = HttpRequest {
            method,
            url,
            headers: merged,
            body,
        };
        if let Some(auth) = &self.auth {
            auth.apply(&mut request)?;
        }
        Ok(request)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

fn default_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("User-Agent".to_string(), user_agent.to_string()),
    ]
}

fn merge_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrelloError;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn client() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        let client = HttpClient::with_transport(&ClientConfig::default(), mock.clone());
        (client, mock)
    }

    #[test]
    fn get_sends_coerced_query() {
        let (client, mock) = client();
        mock.push_json(200, json!([]));
        let query = Params::new()
            .with("filter", "open")
            .with("closed", false)
            .with("fields", vec!["name", "desc"]);
        client.get("boards/b1/cards", &query).unwrap();

        let req = mock.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.url.starts_with("https://api.trello.com/1/boards/b1/cards?"));
        assert_eq!(
            req.query_pairs(),
            vec![
                ("filter".to_string(), "open".to_string()),
                ("closed".to_string(), "false".to_string()),
                ("fields".to_string(), "name,desc".to_string()),
            ]
        );
        assert_eq!(req.body, None);
    }

    #[test]
    fn post_sends_form_body() {
        let (client, mock) = client();
        mock.push_json(200, json!({"id": "c1"}));
        let body = Params::new()
            .with("name", "Sprint 1")
            .with("due", crate::params::ParamValue::Null);
        client.post("cards", &body).unwrap();

        let req = mock.last_request().unwrap();
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.form_pairs(), vec![("name".to_string(), "Sprint 1".to_string())]);
    }

    #[test]
    fn form_maps_flatten_into_slash_keys() {
        let (client, mock) = client();
        mock.push_json(200, json!({"id": "b1"}));
        let prefs = Params::new()
            .with("permissionLevel", "org")
            .with("selfJoin", true);
        client
            .put("boards/b1", &Params::new().with("name", "Ops").with("prefs", prefs))
            .unwrap();

        let req = mock.last_request().unwrap();
        assert_eq!(
            req.form_pairs(),
            vec![
                ("name".to_string(), "Ops".to_string()),
                ("prefs/permissionLevel".to_string(), "org".to_string()),
                ("prefs/selfJoin".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn header_merge_rules() {
        let (mut client, mock) = client();
        mock.push_json(200, json!({})).push_json(200, json!({}));

        client.set_headers([("accept", "text/plain"), ("X-Trace", "1")]);
        assert_eq!(client.headers().len(), 3);

        client
            .request(HttpMethod::Get, "members/me", &[("X-Trace", "2")], RequestOptions::default())
            .unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.header("Accept"), Some("text/plain"));
        assert_eq!(req.header("x-trace"), Some("2"));

        client.clear_headers();
        client.get("members/me", &Params::new()).unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(req.header("X-Trace"), None);
        assert!(req.header("User-Agent").is_some());
    }

    #[test]
    fn auth_stage_runs_on_every_request() {
        let (mut client, mock) = client();
        client.authenticate(AuthMethod::UrlClientId {
            client_id: "k".into(),
            token: "t".into(),
        });
        mock.push_json(200, json!({}));
        client.get("boards/b1", &Params::new().with("fields", "name")).unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(
            req.query_pairs(),
            vec![
                ("fields".to_string(), "name".to_string()),
                ("key".to_string(), "k".to_string()),
                ("token".to_string(), "t".to_string()),
            ]
        );
    }

    #[test]
    fn error_statuses_are_translated() {
        let (client, mock) = client();
        mock.push_json(429, json!({"message": "slow down"}));
        let err = client.get("boards/b1", &Params::new()).unwrap_err();
        assert!(matches!(err, TrelloError::RateLimited));

        mock.push_failure("connection refused");
        let err = client.get("boards/b1", &Params::new()).unwrap_err();
        assert!(matches!(err, TrelloError::Transport(_)));
    }

    #[test]
    fn absolute_paths_bypass_base_url() {
        let (client, _) = client();
        let req = client
            .build_request(
                HttpMethod::Post,
                "https://trello.com/1/OAuthGetRequestToken",
                &[],
                &RequestOptions::default(),
            )
            .unwrap();
        assert_eq!(req.url, "https://trello.com/1/OAuthGetRequestToken");
        assert_eq!(req.body, None);
    }
}
