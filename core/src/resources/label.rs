//! Labels.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::{validate_allowed, ParamValue, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};

pub const FIELDS: &[&str] = &["name", "color", "idBoard"];

pub const COLORS: &[&str] = &[
    "yellow", "purple", "blue", "red", "green", "orange", "black", "sky", "pink", "lime",
];

pub static LABEL: ResourceDescriptor = ResourceDescriptor::new("label", "labels")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        remove: false,
        ..Capabilities::ALL
    })
    .with_create_required(&["idBoard", "name"])
    .with_load_params(&[("fields", "all"), ("board", "true")]);

/// Reject a non-empty `color` outside `COLORS`.
pub(crate) fn check_color(params: &Params) -> Result<()> {
    match params.get("color") {
        Some(ParamValue::Str(color)) if !color.is_empty() => {
            validate_allowed(COLORS, color, "color").map(|_| ())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> LabelApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &LABEL),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    pub fn create(&self, params: &Params) -> Result<Value> {
        check_color(params)?;
        self.api.create(params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.update(id, params)
    }

    pub fn set_color(&self, id: &str, color: &str) -> Result<Value> {
        validate_allowed(COLORS, color, "color")?;
        self.api.set_value(id, "color", color)
    }

    pub fn set_name(&self, id: &str, name: &str) -> Result<Value> {
        self.api.set_value(id, "name", name)
    }
}
