//! Notifications.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::Params;
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{related, related_field, Related};

pub const FIELDS: &[&str] = &["unread", "type", "date", "data", "idMemberCreator"];

pub static NOTIFICATION: ResourceDescriptor =
    ResourceDescriptor::new("notification", "notifications")
        .with_fields(FIELDS)
        .with_capabilities(Capabilities {
            show: true,
            update: true,
            ..Capabilities::NONE
        });

#[derive(Debug, Clone, Copy)]
pub struct NotificationApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> NotificationApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &NOTIFICATION),
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

    pub fn set_unread(&self, id: &str, unread: bool) -> Result<Value> {
        self.api.set_value(id, "unread", unread)
    }

    /// POST `notifications/all/read`.
    pub fn set_all_read(&self) -> Result<Value> {
        let path = format!("{}/all/read", self.api.get_path(None));
        self.api.post(&path, &Params::new())
    }

    pub fn entities(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "entities", params)
    }

    pub fn related(&self, id: &str, target: Related, params: &Params) -> Result<Value> {
        related(&self.api, id, target, params)
    }

    pub fn related_field(&self, id: &str, target: Related, field: &str) -> Result<Value> {
        related_field(&self.api, id, target, field)
    }
}
