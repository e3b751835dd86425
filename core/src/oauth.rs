//! Three-legged OAuth1 handshake (RFC 5849, HMAC-SHA1).
//!
//! # Design
//! `OAuth1` borrows the client's `HttpClient` for transport but sends fully
//! signed requests through `HttpClient::send`, so the client's own auth
//! stage never touches the `Authorization` header. The public surface is
//! `OAuth1` and its three legs. Signing stays private to this module and is
//! split into pure functions taking the nonce and timestamp explicitly;
//! only `OAuth1` itself reads the clock.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::debug;
use url::{form_urlencoded, Position, Url};
use uuid::Uuid;

use crate::config::AuthOptions;
use crate::error::{Result, TrelloError};
use crate::http::{encode_component, HttpMethod, HttpRequest};
use crate::http_client::HttpClient;

pub const REQUEST_TOKEN_URL: &str = "https://trello.com/1/OAuthGetRequestToken";
pub const AUTHORIZE_URL: &str = "https://trello.com/1/OAuthAuthorizeToken";
pub const ACCESS_TOKEN_URL: &str = "https://trello.com/1/OAuthGetAccessToken";

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

type HmacSha1 = Hmac<Sha1>;

/// A token/secret pair: temporary credentials after the first leg, token
/// credentials after the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

/// `METHOD&enc(base-url)&enc(normalized-params)`.
///
/// Query parameters of `url` are folded into the parameter set. Pairs are
/// sorted by encoded name, then encoded value.
fn signature_base_string(method: HttpMethod, url: &str, params: &[(String, String)]) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| TrelloError::InvalidArgument(format!("{url}: {e}")))?;
    let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .chain(&query)
        .map(|(k, v)| (encode_component(k), encode_component(v)))
        .collect();
    pairs.sort();
    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    Ok(format!(
        "{}&{}&{}",
        method.as_str(),
        encode_component(&parsed[..Position::AfterPath]),
        encode_component(&normalized)
    ))
}

/// Base64 HMAC-SHA1 of `base_string` keyed with the two secrets.
fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        encode_component(consumer_secret),
        encode_component(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| TrelloError::InvalidArgument(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `OAuth k="v", ...` from already signed protocol parameters.
fn authorization_header(protocol: &[(String, String)]) -> String {
    let fields = protocol
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

/// Handshake driver bound to a client's transport and auth options.
#[derive(Debug, Clone, Copy)]
pub struct OAuth1<'a> {
    http: &'a HttpClient,
    options: &'a AuthOptions,
}

impl<'a> OAuth1<'a> {
    pub fn new(http: &'a HttpClient, options: &'a AuthOptions) -> Self {
        Self { http, options }
    }

    /// First leg: request a temporary token, announcing the callback URI.
    pub fn temporary_credentials(&self) -> Result<Credentials> {
        let callback = self.options.callback_uri.as_deref().unwrap_or("oob");
        let extra = [("oauth_callback".to_string(), callback.to_string())];
        let response = self.signed_post(REQUEST_TOKEN_URL, &extra, None)?;
        let credentials = parse_credentials(&response)?;
        debug!("temporary credentials received");
        Ok(credentials)
    }

    /// Second leg: where the user approves access for the temporary token.
    pub fn authorization_url(&self, temporary: &Credentials) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("oauth_token", &temporary.identifier)
            .append_pair("name", &self.options.name)
            .append_pair("expiration", &self.options.expiration)
            .append_pair("scope", &self.options.scope)
            .finish();
        format!("{AUTHORIZE_URL}?{query}")
    }

    /// Third leg: trade the approved temporary token and verifier for token
    /// credentials. `token` must be the temporary identifier echoed back by
    /// the authorization redirect.
    pub fn token_credentials(&self, temporary: &Credentials, token: &str, verifier: &str) -> Result<Credentials> {
        if token != temporary.identifier {
            return Err(TrelloError::InvalidArgument(
                "Temporary identifier passed back by server does not match that of stored temporary credentials."
                    .to_string(),
            ));
        }
        let extra = [
            ("oauth_token".to_string(), temporary.identifier.clone()),
            ("oauth_verifier".to_string(), verifier.to_string()),
        ];
        let response = self.signed_post(ACCESS_TOKEN_URL, &extra, Some(&temporary.secret))?;
        let credentials = parse_credentials(&response)?;
        debug!("token credentials received");
        Ok(credentials)
    }

    fn consumer(&self) -> Result<(&'a str, &'a str)> {
        match (self.options.identifier.as_deref(), self.options.secret.as_deref()) {
            (Some(identifier), Some(secret)) if !identifier.is_empty() => Ok((identifier, secret)),
            _ => Err(TrelloError::InvalidArgument(
                "OAuth needs both \"identifier\" and \"secret\" auth options".to_string(),
            )),
        }
    }

    fn signed_post(&self, url: &str, extra: &[(String, String)], token_secret: Option<&str>) -> Result<String> {
        let (identifier, secret) = self.consumer()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let nonce = Uuid::new_v4().simple().to_string();

        let mut protocol = vec![
            ("oauth_consumer_key".to_string(), identifier.to_string()),
            ("oauth_nonce".to_string(), nonce),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp),
            ("oauth_version".to_string(), VERSION.to_string()),
        ];
        protocol.extend_from_slice(extra);
        let base = signature_base_string(HttpMethod::Post, url, &protocol)?;
        let signature = sign(&base, secret, token_secret.unwrap_or(""))?;
        protocol.push(("oauth_signature".to_string(), signature));

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: vec![("Authorization".to_string(), authorization_header(&protocol))],
            body: None,
        };
        Ok(self.http.send(&request)?.body)
    }
}

/// Read `oauth_token` and `oauth_token_secret` from a form-encoded body.
fn parse_credentials(body: &str) -> Result<Credentials> {
    let mut identifier = None;
    let mut secret = None;
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        match key.as_ref() {
            "oauth_token" => identifier = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            _ => {}
        }
    }
    match (identifier, secret) {
        (Some(identifier), Some(secret)) => Ok(Credentials { identifier, secret }),
        _ => Err(TrelloError::UnexpectedResponse(format!(
            "no OAuth credentials in response: {body}"
        ))),
    }
}
