//! Actions (activity records such as comments).

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::Params;
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{related, related_field, Related};

pub const FIELDS: &[&str] = &["idMemberCreator", "data", "type", "date"];

pub static ACTION: ResourceDescriptor = ResourceDescriptor::new("action", "actions")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        create: false,
        ..Capabilities::ALL
    });

#[derive(Debug, Clone, Copy)]
pub struct ActionApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> ActionApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &ACTION),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.update(id, params)
    }

    pub fn remove(&self, id: &str) -> Result<Value> {
        self.api.remove(id)
    }

    pub fn related(&self, id: &str, target: Related, params: &Params) -> Result<Value> {
        related(&self.api, id, target, params)
    }

    pub fn related_field(&self, id: &str, target: Related, field: &str) -> Result<Value> {
        related_field(&self.api, id, target, field)
    }

    /// Edit the text of a comment action.
    pub fn set_text(&self, id: &str, text: &str) -> Result<Value> {
        self.api.set_value(id, "text", text)
    }
}
