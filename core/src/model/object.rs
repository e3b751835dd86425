//! Lifecycle engine shared by every domain object.
//!
//! # Design
//! A `DomainObject` owns a data bag and drives it through
//! `Unbound -> Loaded <-> Modified -> Removed`. Setters only touch the bag;
//! nothing is sent until `save`. Every network step is bracketed by a pair
//! of hook slots, and hooks see the bag mutably so they can normalize data
//! before it is sent or after it arrives.
//!
//! The object talks to its resource only through the generic,
//! capability-checked `ResourceApi`, so an operation the resource does not
//! support surfaces as `UndefinedOperation` from below and is re-wrapped
//! here as `UnsupportedOperation`.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Result, TrelloError};
use crate::params::Params;
use crate::resource::ResourceApi;

/// Field name -> JSON value, as returned by the service.
pub type DataBag = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Never loaded or saved; may have no id.
    Unbound,
    /// Data bag matches the last response.
    Loaded,
    /// Local changes not yet saved.
    Modified,
    /// Deleted remotely. Terminal.
    Removed,
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectState::Unbound => "unbound",
            ObjectState::Loaded => "loaded",
            ObjectState::Modified => "modified",
            ObjectState::Removed => "removed",
        })
    }
}

/// Hook slots around each lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeSave,
    AfterSave,
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeRefresh,
    AfterRefresh,
    BeforeRemove,
    AfterRemove,
}

pub type HookFn = Box<dyn FnMut(&mut DataBag) -> Result<()>>;

/// Ordered callback table. Callbacks for the same slot run in registration
/// order; the first error stops the step.
#[derive(Default)]
pub struct Hooks {
    entries: Vec<(Hook, HookFn)>,
}

impl Hooks {
    pub fn on(&mut self, hook: Hook, callback: impl FnMut(&mut DataBag) -> Result<()> + 'static) {
        self.entries.push((hook, Box::new(callback)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn run(&mut self, hook: Hook, data: &mut DataBag) -> Result<()> {
        for (slot, callback) in &mut self.entries {
            if *slot == hook {
                callback(data)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(hook, _)| hook))
            .finish()
    }
}

#[derive(Debug)]
pub struct DomainObject<'a> {
    api: ResourceApi<'a>,
    id: Option<String>,
    data: DataBag,
    load_params: Params,
    state: ObjectState,
    hooks: Hooks,
}

impl<'a> DomainObject<'a> {
    /// Unbound object with an empty data bag.
    pub fn new(api: ResourceApi<'a>) -> Self {
        Self {
            load_params: api.descriptor().eager_load(),
            api,
            id: None,
            data: DataBag::new(),
            state: ObjectState::Unbound,
            hooks: Hooks::default(),
        }
    }

    /// Fetch `id` with the resource's eager-load parameters.
    pub fn load(api: ResourceApi<'a>, id: &str) -> Result<Self> {
        let mut object = Self::new(api);
        object.id = Some(id.to_string());
        object.refresh()?;
        Ok(object)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn data(&self) -> &DataBag {
        &self.data
    }

    pub fn load_params(&self) -> &Params {
        &self.load_params
    }

    /// Replace the parameters sent with `show` on refresh.
    pub fn set_load_params(&mut self, params: Params) -> &mut Self {
        self.load_params = params;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Register a hook; see `Hooks::on`.
    pub fn on(&mut self, hook: Hook, callback: impl FnMut(&mut DataBag) -> Result<()> + 'static) -> &mut Self {
        self.hooks.on(hook, callback);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Missing or non-boolean values read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.data.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// String items of an array field; anything else reads as empty.
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_date(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.get_str(key)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    /// Set one field locally.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.ensure_not_removed("modify")?;
        self.data.insert(key.to_string(), value.into());
        self.state = ObjectState::Modified;
        Ok(self)
    }

    /// Replace the whole data bag locally.
    pub fn set_data(&mut self, data: DataBag) -> Result<&mut Self> {
        self.ensure_not_removed("modify")?;
        self.data = data;
        self.state = ObjectState::Modified;
        Ok(self)
    }

    /// Overwrite the data bag with the remote copy.
    pub fn refresh(&mut self) -> Result<&mut Self> {
        let id = self.require_id("refresh")?;
        self.hooks.run(Hook::BeforeRefresh, &mut self.data)?;
        let response = self.api.show(&id, &self.load_params)?;
        self.data = into_bag(response, "refresh", self.api.name())?;
        self.transition(ObjectState::Loaded);
        self.hooks.run(Hook::AfterRefresh, &mut self.data)?;
        Ok(self)
    }

    /// Create when there is no id yet, update otherwise; then refresh.
    pub fn save(&mut self) -> Result<&mut Self> {
        self.ensure_not_removed("save")?;
        self.hooks.run(Hook::BeforeSave, &mut self.data)?;
        match self.id.clone() {
            Some(id) => self.update(&id)?,
            None => self.create()?,
        }
        self.hooks.run(Hook::AfterSave, &mut self.data)?;
        self.refresh()
    }

    pub fn remove(&mut self) -> Result<&mut Self> {
        let id = self.require_id("remove")?;
        self.hooks.run(Hook::BeforeRemove, &mut self.data)?;
        self.api
            .remove(&id)
            .map_err(|e| unsupported("remove", self.api.name(), e))?;
        self.transition(ObjectState::Removed);
        self.hooks.run(Hook::AfterRemove, &mut self.data)?;
        Ok(self)
    }

    fn create(&mut self) -> Result<()> {
        self.hooks.run(Hook::BeforeCreate, &mut self.data)?;
        let response = self
            .api
            .create(&Params::from_json_object(&self.data))
            .map_err(|e| unsupported("create", self.api.name(), e))?;
        let data = into_bag(response, "create", self.api.name())?;
        let id = data
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TrelloError::UnexpectedResponse(format!(
                    "created {} has no \"id\"",
                    self.api.name()
                ))
            })?
            .to_string();
        trace!(resource = self.api.name(), id = %id, "created");
        self.id = Some(id);
        self.data = data;
        self.hooks.run(Hook::AfterCreate, &mut self.data)
    }

    fn update(&mut self, id: &str) -> Result<()> {
        self.hooks.run(Hook::BeforeUpdate, &mut self.data)?;
        let response = self
            .api
            .update(id, &Params::from_json_object(&self.data))
            .map_err(|e| unsupported("update", self.api.name(), e))?;
        self.data = into_bag(response, "update", self.api.name())?;
        self.hooks.run(Hook::AfterUpdate, &mut self.data)
    }

    fn require_id(&self, operation: &str) -> Result<String> {
        self.ensure_not_removed(operation)?;
        self.id.clone().ok_or_else(|| TrelloError::InvalidState {
            operation: operation.to_string(),
            state: format!("{} without id", self.state),
        })
    }

    fn ensure_not_removed(&self, operation: &str) -> Result<()> {
        if self.state == ObjectState::Removed {
            return Err(TrelloError::InvalidState {
                operation: operation.to_string(),
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: ObjectState) {
        trace!(resource = self.api.name(), id = ?self.id, from = %self.state, to = %to, "state change");
        self.state = to;
    }
}

fn unsupported(operation: &str, resource: &str, error: TrelloError) -> TrelloError {
    match error {
        TrelloError::UndefinedOperation { .. } => TrelloError::UnsupportedOperation {
            operation: operation.to_string(),
            resource: resource.to_string(),
            source: Box::new(error),
        },
        other => other,
    }
}

fn into_bag(value: Value, operation: &str, resource: &str) -> Result<DataBag> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TrelloError::UnexpectedResponse(format!(
            "{operation} {resource} returned {other} instead of an object"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::http_client::HttpClient;
    use crate::mock::MockTransport;
    use crate::resources::{board, card, label, list, token};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn http() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        (HttpClient::with_transport(&ClientConfig::default(), mock.clone()), mock)
    }

    #[test]
    fn save_creates_then_refreshes() {
        let (http, mock) = http();
        let mut object = DomainObject::new(ResourceApi::new(&http, &list::LIST));
        assert_eq!(object.state(), ObjectState::Unbound);

        object.set("name", "Doing").unwrap().set("idBoard", "b1").unwrap();
        assert_eq!(object.state(), ObjectState::Modified);

        mock.push_json(200, json!({"id": "l1", "name": "Doing"}))
            .push_json(200, json!({"id": "l1", "name": "Doing", "idBoard": "b1", "closed": false}));
        object.save().unwrap();

        assert_eq!(object.id(), Some("l1"));
        assert_eq!(object.state(), ObjectState::Loaded);
        assert_eq!(object.get_str("idBoard"), Some("b1"));

        let requests = mock.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert!(requests[1].url.starts_with("https://api.trello.com/1/lists/l1?"));
        assert_eq!(
            requests[1].query_pairs(),
            vec![("fields".to_string(), "all".to_string())]
        );
    }

    #[test]
    fn refresh_after_save_is_stable() {
        let (http, mock) = http();
        let mut object = DomainObject::new(ResourceApi::new(&http, &list::LIST));
        object.set("name", "Doing").unwrap().set("idBoard", "b1").unwrap();

        let stored = json!({"id": "l1", "name": "Doing", "idBoard": "b1", "closed": false, "pos": 16384});
        mock.push_json(200, json!({"id": "l1", "name": "Doing"}))
            .push_json(200, stored.clone())
            .push_json(200, stored.clone())
            .push_json(200, stored);
        object.save().unwrap();

        object.refresh().unwrap();
        let first = object.data().clone();
        assert_eq!(object.id(), Some("l1"));

        object.refresh().unwrap();
        assert_eq!(object.data(), &first);
        assert_eq!(object.id(), Some("l1"));
        assert_eq!(object.state(), ObjectState::Loaded);
        assert_eq!(mock.pending(), 0);
    }

    #[test]
    fn save_with_id_updates() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "lb1", "name": "Bug", "color": "red"}));
        let mut object = DomainObject::load(ResourceApi::new(&http, &label::LABEL), "lb1").unwrap();
        assert_eq!(
            mock.last_request().unwrap().query_pairs(),
            vec![
                ("fields".to_string(), "all".to_string()),
                ("board".to_string(), "true".to_string()),
            ]
        );

        object.set("color", "green").unwrap();
        mock.push_json(200, json!({"id": "lb1", "color": "green"}))
            .push_json(200, json!({"id": "lb1", "name": "Bug", "color": "green"}));
        object.save().unwrap();

        let update = &mock.requests()[1];
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.url, "https://api.trello.com/1/labels/lb1");
        assert!(update.form_pairs().contains(&("color".to_string(), "green".to_string())));
        assert_eq!(object.get_str("color"), Some("green"));
    }

    #[test]
    fn create_without_id_in_response() {
        let (http, mock) = http();
        let mut object = DomainObject::new(ResourceApi::new(&http, &board::BOARD));
        object.set("name", "Roadmap").unwrap();
        mock.push_json(200, json!({"name": "Roadmap"}));
        let err = object.save().unwrap_err();
        assert!(matches!(err, TrelloError::UnexpectedResponse(_)));
        assert_eq!(object.id(), None);
    }

    #[test]
    fn unsupported_operations_are_rewrapped() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "b1", "name": "Roadmap"}));
        let mut object = DomainObject::load(ResourceApi::new(&http, &board::BOARD), "b1").unwrap();

        let err = object.remove().unwrap_err();
        assert_eq!(err.to_string(), "You can't remove board objects.");
        assert!(matches!(
            err,
            TrelloError::UnsupportedOperation { ref source, .. }
                if matches!(**source, TrelloError::UndefinedOperation { .. })
        ));
        assert_eq!(object.state(), ObjectState::Loaded);

        let mut token = DomainObject::new(ResourceApi::new(&http, &token::TOKEN));
        let err = token.save().unwrap_err();
        assert_eq!(err.to_string(), "You can't create token objects.");
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn operations_without_id_are_invalid_state() {
        let (http, mock) = http();
        let mut unbound = DomainObject::new(ResourceApi::new(&http, &card::CARD));
        assert!(matches!(
            unbound.remove(),
            Err(TrelloError::InvalidState { ref operation, .. }) if operation == "remove"
        ));
        assert!(matches!(unbound.refresh(), Err(TrelloError::InvalidState { .. })));
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn removed_objects_reject_mutation() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "c1"})).push_json(200, json!({}));
        let mut removed = DomainObject::load(ResourceApi::new(&http, &card::CARD), "c1").unwrap();
        removed.remove().unwrap();
        assert_eq!(removed.state(), ObjectState::Removed);
        assert_eq!(mock.last_request().unwrap().method, HttpMethod::Delete);

        assert!(matches!(removed.set("name", "x"), Err(TrelloError::InvalidState { .. })));
        assert!(matches!(removed.save(), Err(TrelloError::InvalidState { .. })));
        assert!(matches!(removed.refresh(), Err(TrelloError::InvalidState { .. })));
        assert!(matches!(removed.remove(), Err(TrelloError::InvalidState { .. })));
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn hooks_run_in_order_around_each_step() {
        let (http, mock) = http();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut object = DomainObject::new(ResourceApi::new(&http, &list::LIST));
        for hook in [
            Hook::BeforeSave,
            Hook::BeforeCreate,
            Hook::AfterCreate,
            Hook::AfterSave,
            Hook::BeforeRefresh,
            Hook::AfterRefresh,
        ] {
            let log = Rc::clone(&log);
            object.on(hook, move |_| {
                log.borrow_mut().push(hook);
                Ok(())
            });
        }
        object.on(Hook::BeforeCreate, |data| {
            data.insert("pos".to_string(), json!("bottom"));
            Ok(())
        });

        object.set("name", "Done").unwrap().set("idBoard", "b1").unwrap();
        mock.push_json(200, json!({"id": "l2"})).push_json(200, json!({"id": "l2"}));
        object.save().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Hook::BeforeSave,
                Hook::BeforeCreate,
                Hook::AfterCreate,
                Hook::AfterSave,
                Hook::BeforeRefresh,
                Hook::AfterRefresh,
            ]
        );
        assert!(mock.requests()[0]
            .form_pairs()
            .contains(&("pos".to_string(), "bottom".to_string())));
    }

    #[test]
    fn failing_hook_stops_the_step() {
        let (http, mock) = http();
        let mut object = DomainObject::new(ResourceApi::new(&http, &list::LIST));
        object.on(Hook::BeforeSave, |_| {
            Err(TrelloError::InvalidArgument("name must not be blank".into()))
        });
        assert!(object.save().is_err());
        assert_eq!(mock.request_count(), 0);
    }
}
