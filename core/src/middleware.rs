//! Request and response stages around every dispatch.
//!
//! # Design
//! Authentication is a request stage rather than a static header because two
//! of the four modes put credentials in the query string. `AuthMethod::apply`
//! rewrites the request just before it reaches the transport.
//!
//! `check_response` is the response stage. It runs after every round-trip and
//! turns statuses >= 400 into `TrelloError` variants:
//!
//! | status | result |
//! |--------|--------|
//! | < 400  | passes through |
//! | 429    | `RateLimited`, body ignored |
//! | 400    | `BadRequest` |
//! | 401    | `PermissionDenied` |
//! | 422 with `errors` | `ValidationFailed`, one line per entry |
//! | other  | `RequestFailed` |

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::error::{Result, TrelloError};
use crate::http::{HttpRequest, HttpResponse};

/// One of the four supported authentication modes.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// `Authorization: Basic base64(login:password)`
    HttpPassword { login: String, password: String },
    /// `Authorization: token <token>`
    HttpToken { token: String },
    /// `?key=<client_id>&token=<token>`
    UrlClientId { client_id: String, token: String },
    /// `?token=<token>&key=<key>`
    UrlToken { token: String, key: String },
}

impl AuthMethod {
    pub const HTTP_PASSWORD: &'static str = "http_password";
    pub const HTTP_TOKEN: &'static str = "http_token";
    pub const URL_CLIENT_ID: &'static str = "url_client_id";
    pub const URL_TOKEN: &'static str = "url_token";

    const NAMES: [&'static str; 4] = [
        Self::HTTP_PASSWORD,
        Self::HTTP_TOKEN,
        Self::URL_CLIENT_ID,
        Self::URL_TOKEN,
    ];

    /// Build a mode from its string form.
    ///
    /// `secret` may itself be a method name when `method` is omitted, so
    /// `parse("tok", Some("http_token"), None)` selects the token header.
    /// Without a method the default is `http_password`.
    pub fn parse(login: &str, secret: Option<&str>, method: Option<&str>) -> Result<Self> {
        let (secret, method) = match (secret, method) {
            (None, None) => {
                return Err(TrelloError::InvalidArgument(
                    "You need to specify authentication method!".into(),
                ))
            }
            (Some(s), None) if Self::NAMES.contains(&s) => (None, s),
            (secret, None) => (secret, Self::HTTP_PASSWORD),
            (secret, Some(m)) => (secret, m),
        };

        let need_secret = || {
            secret.map(str::to_string).ok_or_else(|| {
                TrelloError::InvalidArgument(format!(
                    "Authentication method \"{method}\" requires a secret"
                ))
            })
        };

        match method {
            Self::HTTP_PASSWORD => Ok(Self::HttpPassword {
                login: login.to_string(),
                password: need_secret()?,
            }),
            Self::HTTP_TOKEN => Ok(Self::HttpToken {
                token: login.to_string(),
            }),
            Self::URL_CLIENT_ID => Ok(Self::UrlClientId {
                client_id: login.to_string(),
                token: need_secret()?,
            }),
            Self::URL_TOKEN => Ok(Self::UrlToken {
                token: login.to_string(),
                key: need_secret()?,
            }),
            other => Err(TrelloError::InvalidArgument(format!(
                "Unknown authentication method \"{other}\", expected one of {}",
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HttpPassword { .. } => Self::HTTP_PASSWORD,
            Self::HttpToken { .. } => Self::HTTP_TOKEN,
            Self::UrlClientId { .. } => Self::URL_CLIENT_ID,
            Self::UrlToken { .. } => Self::URL_TOKEN,
        }
    }

    /// Inject credentials into `request`.
    pub fn apply(&self, request: &mut HttpRequest) -> Result<()> {
        match self {
            Self::HttpPassword { login, password } => {
                let encoded = STANDARD.encode(format!("{login}:{password}"));
                request.set_header("Authorization", format!("Basic {encoded}"));
            }
            Self::HttpToken { token } => {
                request.set_header("Authorization", format!("token {token}"));
            }
            Self::UrlClientId { client_id, token } => {
                set_query(request, &[("key", client_id), ("token", token)])?;
            }
            Self::UrlToken { token, key } => {
                set_query(request, &[("token", token), ("key", key)])?;
            }
        }
        Ok(())
    }
}

// Credentials stay out of Debug output.
impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthMethod").field(&self.name()).finish()
    }
}

/// Replace `pairs` in the request's query string, keeping other entries.
fn set_query(request: &mut HttpRequest, pairs: &[(&str, &String)]) -> Result<()> {
    let mut url = Url::parse(&request.url)
        .map_err(|e| TrelloError::InvalidArgument(format!("invalid request url: {e}")))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !pairs.iter().any(|(name, _)| &**k == *name))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    request.url = url.into();
    Ok(())
}

/// Translate an error status into a `TrelloError`.
pub fn check_response(response: HttpResponse) -> Result<HttpResponse> {
    let status = response.status;
    if status < 400 {
        return Ok(response);
    }
    if status == 429 {
        warn!(status, "rate limited");
        return Err(TrelloError::RateLimited);
    }

    let content = response.content();
    let message = content.get("message").map(text);
    let err = match status {
        400 => TrelloError::BadRequest {
            message: message.unwrap_or_else(|| text(&content)),
        },
        401 => TrelloError::PermissionDenied {
            message: message.unwrap_or_else(|| text(&content)),
        },
        422 if content.get("errors").is_some_and(Value::is_array) => {
            let errors = content
                .get("errors")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().map(describe_error).collect())
                .unwrap_or_default();
            TrelloError::ValidationFailed { errors }
        }
        _ => TrelloError::RequestFailed {
            status,
            message: message.unwrap_or_else(|| text(&content)),
        },
    };
    warn!(status, error = %err, "request failed");
    Err(err)
}

/// One line of a 422 `errors` list, chosen by the entry's `code`.
fn describe_error(entry: &Value) -> String {
    let get = |key: &str| entry.get(key).map(text).unwrap_or_default();
    let (field, resource) = (get("field"), get("resource"));
    match entry.get("code").and_then(Value::as_str) {
        Some("missing") => format!(
            "The {field} {} does not exist, for resource \"{resource}\"",
            get("value")
        ),
        Some("missing_field") => {
            format!("Field \"{field}\" is missing, for resource \"{resource}\"")
        }
        Some("invalid") => format!("Field \"{field}\" is invalid, for resource \"{resource}\""),
        Some("already_exists") => {
            format!("Field \"{field}\" already exists, for resource \"{resource}\"")
        }
        _ => get("message"),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn fail(status: u16, body: Value) -> TrelloError {
        check_response(HttpResponse::new(status, body.to_string())).unwrap_err()
    }

    #[test]
    fn basic_auth_header() {
        let mut req = get("https://api.trello.com/1/boards/b1");
        AuthMethod::parse("user", Some("pass"), None)
            .unwrap()
            .apply(&mut req)
            .unwrap();
        assert_eq!(req.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn token_header() {
        let mut req = get("https://api.trello.com/1/boards/b1");
        AuthMethod::parse("abc", Some(AuthMethod::HTTP_TOKEN), None)
            .unwrap()
            .apply(&mut req)
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("token abc"));
    }

    #[test]
    fn url_modes_rewrite_query() {
        let mut req = get("https://api.trello.com/1/boards/b1?fields=name&key=stale");
        AuthMethod::parse("app-key", Some("user-token"), Some("url_client_id"))
            .unwrap()
            .apply(&mut req)
            .unwrap();
        assert_eq!(
            req.query_pairs(),
            vec![
                ("fields".to_string(), "name".to_string()),
                ("key".to_string(), "app-key".to_string()),
                ("token".to_string(), "user-token".to_string()),
            ]
        );
        assert_eq!(req.header("Authorization"), None);

        let mut req = get("https://api.trello.com/1/boards/b1");
        AuthMethod::parse("user-token", Some("app-key"), Some("url_token"))
            .unwrap()
            .apply(&mut req)
            .unwrap();
        assert_eq!(
            req.query_pairs(),
            vec![
                ("token".to_string(), "user-token".to_string()),
                ("key".to_string(), "app-key".to_string()),
            ]
        );
    }

    #[test]
    fn parse_rejects_incompatible_arguments() {
        assert!(matches!(
            AuthMethod::parse("x", None, None),
            Err(TrelloError::InvalidArgument(_))
        ));
        assert!(matches!(
            AuthMethod::parse("x", Some("y"), Some("oauth2")),
            Err(TrelloError::InvalidArgument(_))
        ));
        assert!(matches!(
            AuthMethod::parse("x", None, Some("url_token")),
            Err(TrelloError::InvalidArgument(_))
        ));
        assert_eq!(
            AuthMethod::parse("t", None, Some("http_token")).unwrap().name(),
            "http_token"
        );
    }

    #[test]
    fn debug_hides_credentials() {
        let auth = AuthMethod::parse("user", Some("hunter2"), None).unwrap();
        assert!(!format!("{auth:?}").contains("hunter2"));
    }

    #[test]
    fn success_passes_through() {
        let resp = HttpResponse::new(201, "{}");
        assert_eq!(check_response(resp.clone()).unwrap(), resp);
    }

    #[test]
    fn rate_limit_ignores_body() {
        assert!(matches!(fail(429, json!({"message": "x"})), TrelloError::RateLimited));
        let raw = check_response(HttpResponse::new(429, "not json")).unwrap_err();
        assert!(matches!(raw, TrelloError::RateLimited));
    }

    #[test]
    fn bad_request_and_permission_denied_carry_message() {
        match fail(400, json!({"message": "invalid value for idList"})) {
            TrelloError::BadRequest { message } => assert_eq!(message, "invalid value for idList"),
            other => panic!("unexpected {other:?}"),
        }
        let err = check_response(HttpResponse::new(401, "invalid token")).unwrap_err();
        assert!(matches!(err, TrelloError::PermissionDenied { ref message } if message == "invalid token"));
    }

    #[test]
    fn validation_failed_uses_code_templates() {
        let err = fail(
            422,
            json!({
                "message": "Validation Failed",
                "errors": [
                    {"code": "missing_field", "field": "name", "resource": "card"},
                    {"code": "missing", "field": "list", "value": "l9", "resource": "card"},
                    {"code": "custom", "message": "too long"}
                ]
            }),
        );
        let TrelloError::ValidationFailed { errors } = &err else {
            panic!("unexpected {err:?}");
        };
        assert_eq!(errors[0], "Field \"name\" is missing, for resource \"card\"");
        assert_eq!(errors[1], "The list l9 does not exist, for resource \"card\"");
        assert_eq!(errors[2], "too long");
        assert!(err.to_string().starts_with("Validation Failed: Field \"name\""));
    }

    #[test]
    fn other_statuses_are_request_failed() {
        let err = fail(404, json!({"message": "board not found"}));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("board not found"));

        let err = check_response(HttpResponse::new(422, "unprocessable")).unwrap_err();
        assert!(matches!(err, TrelloError::RequestFailed { status: 422, .. }));

        let err = fail(500, json!({"error": "boom"}));
        assert!(err.to_string().contains("boom"));
    }
}
