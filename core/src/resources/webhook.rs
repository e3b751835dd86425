//! Webhooks.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::Params;
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};

pub const FIELDS: &[&str] = &["description", "idModel", "callbackURL", "active"];

/// Keys every webhook create and update must carry.
pub const REQUIRED: &[&str] = &["callbackURL", "idModel"];

pub static WEBHOOK: ResourceDescriptor = ResourceDescriptor::new("webhook", "webhooks")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities::ALL)
    .with_create_required(REQUIRED)
    .with_update_required(REQUIRED);

#[derive(Debug, Clone, Copy)]
pub struct WebhookApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> WebhookApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &WEBHOOK),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    pub fn create(&self, params: &Params) -> Result<Value> {
        self.api.create(params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.update(id, params)
    }

    pub fn remove(&self, id: &str) -> Result<Value> {
        self.api.remove(id)
    }

    pub fn set_callback_url(&self, id: &str, url: &str) -> Result<Value> {
        self.api.set_value(id, "callbackUrl", url)
    }

    pub fn set_description(&self, id: &str, description: &str) -> Result<Value> {
        self.api.set_value(id, "description", description)
    }

    pub fn set_model(&self, id: &str, model_id: &str) -> Result<Value> {
        self.api.set_value(id, "idModel", model_id)
    }

    pub fn set_active(&self, id: &str, active: bool) -> Result<Value> {
        self.api.set_value(id, "active", active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::TrelloError;
    use crate::mock::MockTransport;
    use serde_json::json;

    #[test]
    fn update_requires_callback_and_model() {
        let mock = MockTransport::new();
        let http = HttpClient::with_transport(&ClientConfig::default(), mock.clone());
        let webhooks = WebhookApi::new(&http);

        let err = webhooks
            .update("w1", &Params::new().with("description", "x"))
            .unwrap_err();
        let TrelloError::MissingParameter { names, .. } = &err else {
            panic!("unexpected {err:?}");
        };
        assert_eq!(names, &["callbackURL", "idModel"]);

        mock.push_json(200, json!({}));
        webhooks.set_active("w1", false).unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "https://api.trello.com/1/webhooks/w1/active");
        assert_eq!(req.form_pairs(), vec![("value".to_string(), "false".to_string())]);
    }
}
