//! Checklists, the cards they belong to, and their items.
//!
//! The service has no endpoint to edit a check item in place, so
//! `ChecklistItemsApi::update` replaces the item: read it, delete it, create
//! a new one with the merged data. The sequence is not atomic. If the final
//! create fails the item is gone, and the error is `ReplaceFailed` carrying
//! the snapshot that was deleted so the caller can recreate it.

use serde_json::Value;
use tracing::warn;

use crate::error::{Result, TrelloError};
use crate::http_client::HttpClient;
use crate::params::{validate_allowed, Candidates, ParamValue, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::board::board_field;
use crate::resources::{filter_segment, related, Related};

pub const FIELDS: &[&str] = &["name", "idBoard", "idCard", "pos"];

pub const ITEM_FIELDS: &[&str] = &["name", "nameData", "type", "pos", "state"];

pub const CARD_FILTERS: &[&str] = &["none", "open", "closed", "all"];

pub static CHECKLIST: ResourceDescriptor = ResourceDescriptor::new("checklist", "checklists")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities::ALL)
    .with_create_required(&["name", "idCard"]);

pub static CHECKLIST_CARDS: ResourceDescriptor =
    ResourceDescriptor::new("checklist card", "checklists/#id#/cards");

pub static CHECKLIST_ITEMS: ResourceDescriptor =
    ResourceDescriptor::new("checklist item", "checklists/#id#/checkItems").with_fields(ITEM_FIELDS);

#[derive(Debug, Clone, Copy)]
pub struct ChecklistApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> ChecklistApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &CHECKLIST),
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

    pub fn board(&self, id: &str, params: &Params) -> Result<Value> {
        related(&self.api, id, Related::Board, params)
    }

    pub fn board_field(&self, id: &str, field: &str) -> Result<Value> {
        board_field(&self.api, id, field)
    }

    pub fn set_card(&self, id: &str, card_id: &str) -> Result<Value> {
        self.api.set_value(id, "idCard", card_id)
    }

    pub fn set_name(&self, id: &str, name: &str) -> Result<Value> {
        self.api.set_value(id, "name", name)
    }

    pub fn set_position(&self, id: &str, position: impl Into<ParamValue>) -> Result<Value> {
        self.api.set_value(id, "pos", position)
    }

    pub fn cards(&self) -> ChecklistCardsApi<'a> {
        ChecklistCardsApi {
            api: ResourceApi::new(self.api.http(), &CHECKLIST_CARDS),
        }
    }

    pub fn items(&self) -> ChecklistItemsApi<'a> {
        ChecklistItemsApi {
            api: ResourceApi::new(self.api.http(), &CHECKLIST_ITEMS),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChecklistCardsApi<'a> {
    api: ResourceApi<'a>,
}

impl ChecklistCardsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn filter(&self, id: &str, filter: impl Into<Candidates>) -> Result<Value> {
        let filters = validate_allowed(CARD_FILTERS, filter, "filter")?;
        let path = format!("{}/{}", self.api.get_path(Some(id)), filter_segment(&filters));
        self.api.get(&path, &Params::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChecklistItemsApi<'a> {
    api: ResourceApi<'a>,
}

impl ChecklistItemsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn get(&self, id: &str, item_id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.child_path(id, item_id), params)
    }

    pub fn create(&self, id: &str, name: &str, checked: bool, params: &Params) -> Result<Value> {
        let params = params
            .clone()
            .with("checked", checked)
            .with("name", name);
        self.api.post(&self.api.get_path(Some(id)), &params)
    }

    pub fn remove(&self, id: &str, item_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(id, item_id), &Params::new())
    }

    /// Replace an item with `params` merged over its current data.
    ///
    /// Missing `pos` and `name` (or an empty name) are taken from the
    /// current item; `state` (bool, or `"complete"`/`"incomplete"`) decides
    /// whether the new item is checked and otherwise follows the current
    /// item.
    pub fn update(&self, id: &str, item_id: &str, params: &Params) -> Result<Value> {
        let item = self.get(id, item_id, &Params::new())?;

        let mut data = params.clone();
        if !data.contains("pos") {
            data.insert("pos", item.get("pos").cloned().unwrap_or(Value::Null));
        }
        let name = match data.remove("name") {
            Some(ParamValue::Str(name)) if !name.is_empty() => name,
            _ => item
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };
        let checked = match data.remove("state") {
            Some(ParamValue::Bool(checked)) => checked,
            Some(ParamValue::Str(state)) => state == "complete" || state == "true",
            _ => item.get("state").and_then(Value::as_str) == Some("complete"),
        };

        self.remove(id, item_id)?;
        self.create(id, &name, checked, &data).map_err(|source| {
            warn!(checklist = id, item = item_id, error = %source, "check item removed but not recreated");
            TrelloError::ReplaceFailed {
                item: Box::new(item),
                source: Box::new(source),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn http() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        (HttpClient::with_transport(&ClientConfig::default(), mock.clone()), mock)
    }

    #[test]
    fn card_filters_are_checked() {
        let (http, mock) = http();
        let cards = ChecklistApi::new(&http).cards();
        assert!(cards.filter("cl1", "visible").is_err());
        mock.push_json(200, json!([]));
        cards.filter("cl1", "open").unwrap();
        assert_eq!(
            mock.last_request().unwrap().url,
            "https://api.trello.com/1/checklists/cl1/cards/open"
        );
    }

    #[test]
    fn update_replaces_the_item() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "i1", "name": "Write docs", "pos": 16384, "state": "complete"}))
            .push_json(200, json!({"_value": null}))
            .push_json(200, json!({"id": "i2", "name": "Write docs", "state": "complete"}));

        let items = ChecklistApi::new(&http).items();
        let created = items.update("cl1", "i1", &Params::new()).unwrap();
        assert_eq!(created["id"], "i2");

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[1].url, "https://api.trello.com/1/checklists/cl1/checkItems/i1");
        assert_eq!(requests[2].method, HttpMethod::Post);
        assert_eq!(
            requests[2].form_pairs(),
            vec![
                ("pos".to_string(), "16384".to_string()),
                ("checked".to_string(), "true".to_string()),
                ("name".to_string(), "Write docs".to_string()),
            ]
        );
    }

    #[test]
    fn failed_recreate_returns_the_removed_item() {
        let (http, mock) = http();
        let snapshot = json!({"id": "i1", "name": "Deploy", "pos": 1, "state": "incomplete"});
        mock.push_json(200, snapshot.clone())
            .push_json(200, json!({}))
            .push_json(500, json!({"message": "boom"}));

        let err = ChecklistApi::new(&http)
            .items()
            .update("cl1", "i1", &Params::new().with("name", "Deploy v2"))
            .unwrap_err();
        match err {
            TrelloError::ReplaceFailed { item, source } => {
                assert_eq!(*item, snapshot);
                assert_eq!(source.status(), Some(500));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_delete_leaves_item_untouched() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "i1", "name": "x", "pos": 1, "state": "complete"}))
            .push_json(404, json!({"message": "not found"}));
        let err = ChecklistApi::new(&http)
            .items()
            .update("cl1", "i1", &Params::new())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.request_count(), 2);
    }
}
