//! Lists (`lists/...`). Named `CardList` on the Rust side to stay clear of
//! `std` and `Vec` vocabulary.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::{ParamValue, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::board::board_field;
use crate::resources::{related, Related};

pub const FIELDS: &[&str] = &["name", "closed", "idBoard", "pos", "subscribed"];

pub static LIST: ResourceDescriptor = ResourceDescriptor::new("list", "lists")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        remove: false,
        ..Capabilities::ALL
    })
    .with_create_required(&["name", "idBoard"]);

#[derive(Debug, Clone, Copy)]
pub struct CardListApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> CardListApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &LIST),
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

    pub fn set_board(&self, id: &str, board_id: &str) -> Result<Value> {
        self.api.set_value(id, "idBoard", board_id)
    }

    pub fn board(&self, id: &str, params: &Params) -> Result<Value> {
        related(&self.api, id, Related::Board, params)
    }

    pub fn board_field(&self, id: &str, field: &str) -> Result<Value> {
        board_field(&self.api, id, field)
    }

    pub fn set_name(&self, id: &str, name: &str) -> Result<Value> {
        self.api.set_value(id, "name", name)
    }

    pub fn set_subscribed(&self, id: &str, subscribed: bool) -> Result<Value> {
        self.api.set_value(id, "subscribed", subscribed)
    }

    pub fn set_closed(&self, id: &str, closed: bool) -> Result<Value> {
        self.api.set_value(id, "closed", closed)
    }

    pub fn set_position(&self, id: &str, position: impl Into<ParamValue>) -> Result<Value> {
        self.api.set_value(id, "pos", position)
    }

    pub fn actions(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "actions", params)
    }

    pub fn cards(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "cards", params)
    }
}
