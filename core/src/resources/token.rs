//! Tokens and webhooks registered under a token.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::{validate_required, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{related, related_field, webhook, Related};

pub const FIELDS: &[&str] = &[
    "identifier",
    "idMember",
    "dateCreated",
    "dateExpires",
    "permissions",
];

pub static TOKEN: ResourceDescriptor = ResourceDescriptor::new("token", "tokens")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        show: true,
        remove: true,
        ..Capabilities::NONE
    });

pub static TOKEN_WEBHOOKS: ResourceDescriptor =
    ResourceDescriptor::new("token webhook", "tokens/#id#/webhooks");

#[derive(Debug, Clone, Copy)]
pub struct TokenApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> TokenApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &TOKEN),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, token: &str, params: &Params) -> Result<Value> {
        self.api.show(token, params)
    }

    pub fn remove(&self, token: &str) -> Result<Value> {
        self.api.remove(token)
    }

    pub fn member(&self, token: &str, params: &Params) -> Result<Value> {
        related(&self.api, token, Related::Member, params)
    }

    pub fn member_field(&self, token: &str, field: &str) -> Result<Value> {
        related_field(&self.api, token, Related::Member, field)
    }

    pub fn webhooks(&self) -> TokenWebhooksApi<'a> {
        TokenWebhooksApi {
            api: ResourceApi::new(self.api.http(), &TOKEN_WEBHOOKS),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TokenWebhooksApi<'a> {
    api: ResourceApi<'a>,
}

impl TokenWebhooksApi<'_> {
    pub fn all(&self, token: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(token)), params)
    }

    pub fn show(&self, token: &str, webhook_id: &str) -> Result<Value> {
        self.api
            .get(&self.api.child_path(token, webhook_id), &Params::new())
    }

    /// Requires `callbackURL` and `idModel`.
    pub fn create(&self, token: &str, params: &Params) -> Result<Value> {
        validate_required(webhook::REQUIRED, params)?;
        self.api.post(&self.api.get_path(Some(token)), params)
    }

    /// Requires `callbackURL` and `idModel`.
    pub fn update(&self, token: &str, params: &Params) -> Result<Value> {
        validate_required(webhook::REQUIRED, params)?;
        self.api.put(&self.api.get_path(Some(token)), params)
    }

    pub fn remove(&self, token: &str, webhook_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(token, webhook_id), &Params::new())
    }
}
