//! Resource descriptors and the shared request builder every resource API
//! is composed from.
//!
//! # Design
//! A `ResourceDescriptor` is an immutable `static` table: path template,
//! declared fields, which generic operations the resource exposes, the keys
//! `create`/`update` require, and the eager-load parameters domain objects
//! pass to `show`. Nothing about a resource is mutable at runtime.
//!
//! `ResourceApi` pairs a descriptor with a borrowed `HttpClient`. It is
//! `Copy`, so typed APIs and domain objects hold it by value.
//!
//! The field accessor map (`getName` -> `name`, ...) is built lazily, once
//! per descriptor, from the declared field list. `dispatch` normalizes the
//! first letter after `get`, looks the name up in that map and routes hits
//! to `get_field`; any other name is an `UndefinedOperation`.
//!
//! Validation always runs before the request is built, so a call that fails
//! validation never reaches the transport.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;
use tracing::trace;

use crate::error::{Result, TrelloError};
use crate::http::encode_component;
use crate::http_client::HttpClient;
use crate::params::{validate_allowed, validate_required, ParamValue, Params};

/// Token in a path template replaced by the url-encoded id.
pub const ID_PLACEHOLDER: &str = "#id#";

/// Which generic operations a resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub show: bool,
    pub create: bool,
    pub update: bool,
    pub remove: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        show: false,
        create: false,
        update: false,
        remove: false,
    };
    pub const SHOW: Self = Self {
        show: true,
        ..Self::NONE
    };
    pub const ALL: Self = Self {
        show: true,
        create: true,
        update: true,
        remove: true,
    };
}

/// Static description of one remote resource.
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Singular name used in messages (`"board"`).
    pub name: &'static str,
    /// Path template relative to the API root, possibly containing `#id#`.
    pub path: &'static str,
    pub fields: &'static [&'static str],
    pub capabilities: Capabilities,
    pub create_required: &'static [&'static str],
    pub update_required: &'static [&'static str],
    /// Query parameters a domain object sends with `show`.
    pub load_params: &'static [(&'static str, &'static str)],
    accessors: OnceLock<HashMap<String, &'static str>>,
}

impl ResourceDescriptor {
    /// Descriptor with no fields and no generic operations. `fields=all` is
    /// the default load parameter.
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            fields: &[],
            capabilities: Capabilities::NONE,
            create_required: &[],
            update_required: &[],
            load_params: &[("fields", "all")],
            accessors: OnceLock::new(),
        }
    }

    pub const fn with_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.fields = fields;
        self
    }

    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub const fn with_create_required(mut self, keys: &'static [&'static str]) -> Self {
        self.create_required = keys;
        self
    }

    pub const fn with_update_required(mut self, keys: &'static [&'static str]) -> Self {
        self.update_required = keys;
        self
    }

    pub const fn with_load_params(mut self, params: &'static [(&'static str, &'static str)]) -> Self {
        self.load_params = params;
        self
    }

    /// Accessor name -> field, e.g. `getIdBoard` -> `idBoard`.
    pub fn accessors(&self) -> &HashMap<String, &'static str> {
        self.accessors.get_or_init(|| {
            self.fields
                .iter()
                .map(|field| (accessor_name(field), *field))
                .collect()
        })
    }

    /// `load_params` as request parameters.
    pub fn eager_load(&self) -> Params {
        self.load_params.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

/// `get` followed by the field name with its first letter upper-cased.
pub fn accessor_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}

/// Substitute the first `#id#` with the url-encoded `id`.
///
/// Without an id, or when the template has no placeholder, the template is
/// returned unchanged.
pub fn expand_path(template: &str, id: Option<&str>) -> String {
    match id {
        Some(id) if template.contains(ID_PLACEHOLDER) => {
            template.replacen(ID_PLACEHOLDER, &encode_component(id), 1)
        }
        _ => template.to_string(),
    }
}

/// Request builder for one resource, bound to a client.
#[derive(Clone, Copy)]
pub struct ResourceApi<'a> {
    http: &'a HttpClient,
    descriptor: &'static ResourceDescriptor,
}

impl<'a> ResourceApi<'a> {
    pub fn new(http: &'a HttpClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self { http, descriptor }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.descriptor.fields
    }

    pub fn http(&self) -> &'a HttpClient {
        self.http
    }

    pub fn get_path(&self, id: Option<&str>) -> String {
        expand_path(self.descriptor.path, id)
    }

    /// `{path}/{id}`.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.get_path(None), encode_component(id))
    }

    /// `{path with id}/{child}`.
    pub fn child_path(&self, id: &str, child: &str) -> String {
        format!("{}/{}", self.get_path(Some(id)), encode_component(child))
    }

    pub fn get(&self, path: &str, params: &Params) -> Result<Value> {
        Ok(self.http.get(path, params)?.content())
    }

    pub fn post(&self, path: &str, params: &Params) -> Result<Value> {
        Ok(self.http.post(path, params)?.content())
    }

    pub fn put(&self, path: &str, params: &Params) -> Result<Value> {
        Ok(self.http.put(path, params)?.content())
    }

    pub fn patch(&self, path: &str, params: &Params) -> Result<Value> {
        Ok(self.http.patch(path, params)?.content())
    }

    pub fn delete(&self, path: &str, params: &Params) -> Result<Value> {
        Ok(self.http.delete(path, params)?.content())
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.require("show", self.descriptor.capabilities.show)?;
        self.get(&self.item_path(id), params)
    }

    pub fn create(&self, params: &Params) -> Result<Value> {
        self.require("create", self.descriptor.capabilities.create)?;
        validate_required(self.descriptor.create_required, params)?;
        self.post(&self.get_path(None), params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.require("update", self.descriptor.capabilities.update)?;
        validate_required(self.descriptor.update_required, params)?;
        self.put(&self.item_path(id), params)
    }

    pub fn remove(&self, id: &str) -> Result<Value> {
        self.require("remove", self.descriptor.capabilities.remove)?;
        self.delete(&self.item_path(id), &Params::new())
    }

    /// GET `{path}/{id}/{field}`, unwrapping `_value` when present.
    pub fn get_field(&self, id: &str, field: &str) -> Result<Value> {
        validate_allowed(self.descriptor.fields, field, "field")?;
        let path = format!("{}/{}", self.item_path(id), encode_component(field));
        let content = self.get(&path, &Params::new())?;
        Ok(match content {
            Value::Object(mut map) if map.contains_key("_value") => {
                map.remove("_value").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    /// Call an accessor by name, e.g. `dispatch("getName", id)`. The case
    /// of the first letter after `get` does not matter, so `getidBoard`
    /// reaches `idBoard` too.
    pub fn dispatch(&self, operation: &str, id: &str) -> Result<Value> {
        let accessor = operation.strip_prefix("get").map(accessor_name);
        match accessor.and_then(|name| self.descriptor.accessors().get(&name).copied()) {
            Some(field) => {
                trace!(resource = self.name(), operation, field, "accessor dispatch");
                self.get_field(id, field)
            }
            None => Err(TrelloError::UndefinedOperation {
                operation: operation.to_string(),
                resource: self.name().to_string(),
            }),
        }
    }

    /// PUT `{path}/{id}/{field}` with `value=...`.
    pub fn set_value(&self, id: &str, field: &str, value: impl Into<ParamValue>) -> Result<Value> {
        let path = format!("{}/{}", self.item_path(id), field);
        self.put(&path, &Params::new().with("value", value))
    }

    /// GET `{path}/{id}/{segment}`.
    pub fn related(&self, id: &str, segment: &str, params: &Params) -> Result<Value> {
        self.get(&format!("{}/{}", self.item_path(id), segment), params)
    }

    /// GET `{path}/{id}/{segment}/{field}` after checking `field` against
    /// the related resource's declared fields.
    pub fn related_field(
        &self,
        id: &str,
        segment: &str,
        field: &str,
        allowed: &[&str],
    ) -> Result<Value> {
        validate_allowed(allowed, field, "field")?;
        let path = format!(
            "{}/{}/{}",
            self.item_path(id),
            segment,
            encode_component(field)
        );
        self.get(&path, &Params::new())
    }

    fn require(&self, operation: &str, supported: bool) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(TrelloError::UndefinedOperation {
                operation: operation.to_string(),
                resource: self.name().to_string(),
            })
        }
    }
}

impl std::fmt::Debug for ResourceApi<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceApi")
            .field("name", &self.descriptor.name)
            .field("path", &self.descriptor.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::mock::MockTransport;
    use serde_json::json;

    static WIDGET: ResourceDescriptor = ResourceDescriptor::new("widget", "widgets")
        .with_fields(&["name", "color", "idBoard"])
        .with_capabilities(Capabilities {
            remove: false,
            ..Capabilities::ALL
        })
        .with_create_required(&["name", "idBoard"]);

    static WIDGET_PARTS: ResourceDescriptor =
        ResourceDescriptor::new("widget part", "widgets/#id#/parts");

    fn http() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        (HttpClient::with_transport(&ClientConfig::default(), mock.clone()), mock)
    }

    #[test]
    fn get_path_substitutes_placeholder_once() {
        assert_eq!(expand_path("boards/#id#/members", Some("b 1/x")), "boards/b%201%2Fx/members");
        assert_eq!(expand_path("boards/#id#/members", None), "boards/#id#/members");
        assert_eq!(expand_path("boards", Some("b1")), "boards");
        assert_eq!(expand_path("a/#id#/b/#id#", Some("x")), "a/x/b/#id#");
    }

    #[test]
    fn accessor_names_are_generated_from_fields() {
        let accessors = WIDGET.accessors();
        assert_eq!(accessors.get("getColor"), Some(&"color"));
        assert_eq!(accessors.get("getIdBoard"), Some(&"idBoard"));
        assert_eq!(accessors.len(), 3);
        assert_eq!(accessor_name("shortUrl"), "getShortUrl");
    }

    #[test]
    fn get_field_validates_before_request() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);

        let err = api.get_field("w1", "color2").unwrap_err();
        assert!(matches!(err, TrelloError::InvalidParameter { .. }));
        assert_eq!(err.parameter(), Some("field"));
        assert_eq!(mock.request_count(), 0);

        mock.push_json(200, json!({"_value": "green"}));
        assert_eq!(api.get_field("w1", "color").unwrap(), json!("green"));
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "https://api.trello.com/1/widgets/w1/color");
        assert_eq!(mock.request_count(), 1);

        mock.push_json(200, json!({"id": "w1", "name": "n"}));
        assert_eq!(api.get_field("w1", "name").unwrap(), json!({"id": "w1", "name": "n"}));
    }

    #[test]
    fn dispatch_routes_known_accessors_only() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);
        mock.push_json(200, json!({"_value": "red"}));
        assert_eq!(api.dispatch("getColor", "w1").unwrap(), json!("red"));

        let err = api.dispatch("getColour", "w1").unwrap_err();
        assert!(matches!(
            err,
            TrelloError::UndefinedOperation { ref operation, ref resource }
                if operation == "getColour" && resource == "widget"
        ));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn dispatch_ignores_case_of_first_field_letter() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);
        mock.push_json(200, json!({"_value": "red"}))
            .push_json(200, json!({"_value": "b1"}));

        assert_eq!(api.dispatch("getcolor", "w1").unwrap(), json!("red"));
        assert_eq!(api.dispatch("getidBoard", "w1").unwrap(), json!("b1"));
        let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://api.trello.com/1/widgets/w1/color".to_string(),
                "https://api.trello.com/1/widgets/w1/idBoard".to_string(),
            ]
        );

        for operation in ["getColour", "color", "get"] {
            let err = api.dispatch(operation, "w1").unwrap_err();
            assert!(matches!(err, TrelloError::UndefinedOperation { .. }), "{operation}");
        }
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn create_checks_required_keys_first() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);
        let err = api
            .create(&Params::new().with("name", "Sprint 1"))
            .unwrap_err();
        assert_eq!(err.parameter(), Some("idBoard"));
        assert_eq!(mock.request_count(), 0);

        mock.push_json(200, json!({"id": "w9"}));
        let created = api
            .create(&Params::new().with("name", "Sprint 1").with("idBoard", "abc123"))
            .unwrap();
        assert_eq!(created["id"], "w9");
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "https://api.trello.com/1/widgets");
    }

    #[test]
    fn missing_capability_is_undefined_operation() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);
        assert!(matches!(
            api.remove("w1"),
            Err(TrelloError::UndefinedOperation { .. })
        ));
        let parts = ResourceApi::new(&http, &WIDGET_PARTS);
        assert!(parts.show("p1", &Params::new()).is_err());
        assert_eq!(mock.request_count(), 0);
        assert_eq!(parts.child_path("w1", "p1"), "widgets/w1/parts/p1");
    }

    #[test]
    fn set_value_and_related_helpers() {
        let (http, mock) = http();
        let api = ResourceApi::new(&http, &WIDGET);
        mock.push_json(200, json!({})).push_json(200, json!({"_value": "x"}));

        api.set_value("w1", "closed", true).unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "https://api.trello.com/1/widgets/w1/closed");
        assert_eq!(req.form_pairs(), vec![("value".to_string(), "true".to_string())]);

        assert!(api.related_field("w1", "board", "nope", &["name"]).is_err());
        api.related_field("w1", "board", "name", &["name"]).unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "https://api.trello.com/1/widgets/w1/board/name");
    }
}
