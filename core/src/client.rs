//! Client facade: resource lookup, auth, options and the OAuth1 entry
//! points.
//!
//! # Design
//! `Client` owns the `HttpClient` and hands out resource APIs and domain
//! objects that borrow it. Anything that changes how requests are sent
//! (headers, auth mode, options) takes `&mut self`, so it cannot happen while
//! a borrowed API is alive.
//!
//! Temporary OAuth credentials are cached after the first leg so that
//! `authorization_url` and `token_credentials` reuse the same pair.

use serde_json::Value;
use tracing::debug;

use crate::config::{AuthOptions, ClientConfig, SUPPORTED_API_VERSIONS};
use crate::error::{Result, TrelloError};
use crate::http_client::HttpClient;
use crate::manager::Manager;
use crate::middleware::AuthMethod;
use crate::oauth::{Credentials, OAuth1};
use crate::registry::ResourceKind;
use crate::resource::ResourceApi;
use crate::resources::{
    ActionApi, BoardApi, CardApi, CardListApi, ChecklistApi, LabelApi, MemberApi,
    MemberSearchApi, NotificationApi, OrganizationApi, TokenApi, WebhookApi,
};
use crate::transport::Transport;

#[derive(Debug)]
pub struct Client {
    http: HttpClient,
    config: ClientConfig,
    auth_options: AuthOptions,
    temporary: Option<Credentials>,
}

impl Client {
    /// Client backed by a blocking `ureq` agent.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(HttpClient::new(&config), config))
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(HttpClient::with_transport(&config, transport), config))
    }

    /// Config and OAuth options from `TRELLO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?)?.with_auth_options(AuthOptions::from_env()))
    }

    fn from_parts(http: HttpClient, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            auth_options: AuthOptions::default(),
            temporary: None,
        }
    }

    #[must_use]
    pub fn with_auth_options(mut self, options: AuthOptions) -> Self {
        self.auth_options = options;
        self.temporary = None;
        self
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Generic API for a resource name such as `"boards"` or `"cardlist"`.
    pub fn api(&self, name: &str) -> Result<ResourceApi<'_>> {
        let kind: ResourceKind = name.parse()?;
        Ok(ResourceApi::new(&self.http, kind.descriptor()))
    }

    /// Like `api`, but an unknown name is an `UndefinedOperation` on the
    /// client rather than a bad argument.
    pub fn dispatch(&self, name: &str) -> Result<ResourceApi<'_>> {
        self.api(name).map_err(|_| TrelloError::UndefinedOperation {
            operation: name.to_string(),
            resource: "client".to_string(),
        })
    }

    pub fn actions(&self) -> ActionApi<'_> {
        ActionApi::new(&self.http)
    }

    pub fn boards(&self) -> BoardApi<'_> {
        BoardApi::new(&self.http)
    }

    pub fn cards(&self) -> CardApi<'_> {
        CardApi::new(&self.http)
    }

    pub fn checklists(&self) -> ChecklistApi<'_> {
        ChecklistApi::new(&self.http)
    }

    pub fn lists(&self) -> CardListApi<'_> {
        CardListApi::new(&self.http)
    }

    pub fn labels(&self) -> LabelApi<'_> {
        LabelApi::new(&self.http)
    }

    pub fn members(&self) -> MemberApi<'_> {
        MemberApi::new(&self.http)
    }

    pub fn notifications(&self) -> NotificationApi<'_> {
        NotificationApi::new(&self.http)
    }

    pub fn organizations(&self) -> OrganizationApi<'_> {
        OrganizationApi::new(&self.http)
    }

    pub fn tokens(&self) -> TokenApi<'_> {
        TokenApi::new(&self.http)
    }

    pub fn webhooks(&self) -> WebhookApi<'_> {
        WebhookApi::new(&self.http)
    }

    pub fn search_members(&self) -> MemberSearchApi<'_> {
        MemberSearchApi::new(&self.http)
    }

    pub fn manager(&self) -> Manager<'_> {
        Manager::new(&self.http)
    }

    pub fn authenticate(&mut self, auth: AuthMethod) -> &mut Self {
        self.http.authenticate(auth);
        self
    }

    /// Parse and install an auth mode from its string form; see
    /// `AuthMethod::parse`.
    pub fn authenticate_with(
        &mut self,
        login: &str,
        secret: Option<&str>,
        method: Option<&str>,
    ) -> Result<&mut Self> {
        let auth = AuthMethod::parse(login, secret, method)?;
        Ok(self.authenticate(auth))
    }

    pub fn set_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.http.set_headers(headers);
        self
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        self.http.clear_headers();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn option(&self, name: &str) -> Result<Value> {
        self.config.get_option(name)
    }

    /// Change one option. `base_url`, `api_version` and `user_agent` apply to
    /// the next request; `timeout` only to clients built afterwards.
    pub fn set_option(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        let mut config = self.config.clone();
        config.set_option(name, value)?;
        self.http.reconfigure(&config);
        self.config = config;
        debug!(option = name, "client option changed");
        Ok(self)
    }

    pub fn auth_options(&self) -> &AuthOptions {
        &self.auth_options
    }

    pub fn auth_option(&self, name: &str) -> Result<Value> {
        self.auth_options.get_option(name)
    }

    pub fn set_auth_option(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.auth_options.set_option(name, value)?;
        Ok(self)
    }

    pub fn supported_api_versions(&self) -> &'static [u32] {
        SUPPORTED_API_VERSIONS
    }

    /// Stateless handshake driver over this client's transport.
    pub fn oauth(&self) -> OAuth1<'_> {
        OAuth1::new(&self.http, &self.auth_options)
    }

    /// First leg, cached after the first successful call.
    pub fn temporary_credentials(&mut self) -> Result<Credentials> {
        if let Some(credentials) = &self.temporary {
            return Ok(credentials.clone());
        }
        let credentials = self.oauth().temporary_credentials()?;
        self.temporary = Some(credentials.clone());
        Ok(credentials)
    }

    /// Restore temporary credentials kept across processes.
    pub fn set_temporary_credentials(&mut self, credentials: Credentials) -> &mut Self {
        self.temporary = Some(credentials);
        self
    }

    pub fn authorization_url(&mut self) -> Result<String> {
        let temporary = self.temporary_credentials()?;
        Ok(self.oauth().authorization_url(&temporary))
    }

    pub fn token_credentials(&mut self, token: &str, verifier: &str) -> Result<Credentials> {
        let temporary = self.temporary_credentials()?;
        self.oauth().token_credentials(&temporary, token, verifier)
    }
}
