use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::Value;

use crate::error::Result;
use crate::model::board::bound_id;
use crate::model::{domain_object, Board, CardList};
use crate::params::{format_atom, validate_allowed};
use crate::resources::{card, checklist, label};

domain_object! {
    /// A card on a list.
    Card => card::CARD
}

domain_object! {
    /// A checklist attached to a card.
    Checklist => checklist::CHECKLIST
}

domain_object! {
    /// A coloured label defined on a board.
    Label => label::LABEL
}

impl<'a> Card<'a> {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        self.inner.set("name", name)?;
        Ok(self)
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("desc")
    }

    pub fn set_description(&mut self, description: &str) -> Result<&mut Self> {
        self.inner.set("desc", description)?;
        Ok(self)
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn short_url(&self) -> Option<&str> {
        self.get_str("shortUrl")
    }

    pub fn list_id(&self) -> Option<&str> {
        self.get_str("idList")
    }

    pub fn set_list_id(&mut self, list_id: &str) -> Result<&mut Self> {
        self.inner.set("idList", list_id)?;
        Ok(self)
    }

    pub fn set_list(&mut self, list: &CardList<'_>) -> Result<&mut Self> {
        let id = bound_id(list.id(), "list")?;
        self.set_list_id(&id)
    }

    pub fn list(&self) -> Result<CardList<'a>> {
        let id = bound_id(self.list_id(), "list")?;
        CardList::load(self.api().http(), &id)
    }

    pub fn board_id(&self) -> Option<&str> {
        self.get_str("idBoard")
    }

    pub fn set_board_id(&mut self, board_id: &str) -> Result<&mut Self> {
        self.inner.set("idBoard", board_id)?;
        Ok(self)
    }

    pub fn board(&self) -> Result<Board<'a>> {
        let id = bound_id(self.board_id(), "board")?;
        Board::load(self.api().http(), &id)
    }

    pub fn member_ids(&self) -> Vec<&str> {
        self.get_str_list("idMembers")
    }

    pub fn set_member_ids(&mut self, member_ids: &[&str]) -> Result<&mut Self> {
        self.inner.set("idMembers", member_ids.to_vec())?;
        Ok(self)
    }

    pub fn label_ids(&self) -> Vec<&str> {
        self.get_str_list("idLabels")
    }

    pub fn checklist_ids(&self) -> Vec<&str> {
        self.get_str_list("idChecklists")
    }

    pub fn due_date(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("due")
    }

    /// `None` clears the due date.
    pub fn set_due_date<Tz: TimeZone>(&mut self, due: Option<DateTime<Tz>>) -> Result<&mut Self> {
        let value = match due {
            Some(due) => Value::String(format_atom(&due.fixed_offset())),
            None => Value::Null,
        };
        self.inner.set("due", value)?;
        Ok(self)
    }

    pub fn position(&self) -> Option<&Value> {
        self.get("pos")
    }

    pub fn set_position(&mut self, position: impl Into<Value>) -> Result<&mut Self> {
        self.inner.set("pos", position)?;
        Ok(self)
    }

    pub fn is_closed(&self) -> bool {
        self.get_bool("closed")
    }

    pub fn set_closed(&mut self, closed: bool) -> Result<&mut Self> {
        self.inner.set("closed", closed)?;
        Ok(self)
    }

    pub fn is_subscribed(&self) -> bool {
        self.get_bool("subscribed")
    }

    pub fn set_subscribed(&mut self, subscribed: bool) -> Result<&mut Self> {
        self.inner.set("subscribed", subscribed)?;
        Ok(self)
    }

    /// Load every checklist listed on the card.
    pub fn checklists(&self) -> Result<Vec<Checklist<'a>>> {
        self.checklist_ids()
            .into_iter()
            .map(|id| Checklist::load(self.api().http(), id))
            .collect()
    }
}

impl<'a> Checklist<'a> {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        self.inner.set("name", name)?;
        Ok(self)
    }

    pub fn board_id(&self) -> Option<&str> {
        self.get_str("idBoard")
    }

    pub fn set_board_id(&mut self, board_id: &str) -> Result<&mut Self> {
        self.inner.set("idBoard", board_id)?;
        Ok(self)
    }

    pub fn board(&self) -> Result<Board<'a>> {
        let id = bound_id(self.board_id(), "board")?;
        Board::load(self.api().http(), &id)
    }

    pub fn card_id(&self) -> Option<&str> {
        self.get_str("idCard")
    }

    pub fn set_card_id(&mut self, card_id: &str) -> Result<&mut Self> {
        self.inner.set("idCard", card_id)?;
        Ok(self)
    }

    pub fn set_card(&mut self, card: &Card<'_>) -> Result<&mut Self> {
        let id = bound_id(card.id(), "card")?;
        self.set_card_id(&id)
    }

    pub fn card(&self) -> Result<Card<'a>> {
        let id = bound_id(self.card_id(), "card")?;
        Card::load(self.api().http(), &id)
    }

    pub fn position(&self) -> Option<&Value> {
        self.get("pos")
    }

    pub fn set_position(&mut self, position: impl Into<Value>) -> Result<&mut Self> {
        self.inner.set("pos", position)?;
        Ok(self)
    }

    /// Items as loaded; each has at least `id`, `name` and `state`.
    pub fn items(&self) -> &[Value] {
        match self.get("checkItems") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// `None` when no item has that name.
    pub fn is_item_checked(&self, name: &str) -> Option<bool> {
        self.items()
            .iter()
            .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
            .map(|item| item.get("state").and_then(Value::as_str) == Some("complete"))
    }
}

impl Label<'_> {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        self.inner.set("name", name)?;
        Ok(self)
    }

    pub fn color(&self) -> Option<&str> {
        self.get_str("color")
    }

    pub fn set_color(&mut self, color: &str) -> Result<&mut Self> {
        validate_allowed(label::COLORS, color, "color")?;
        self.inner.set("color", color)?;
        Ok(self)
    }

    pub fn board_id(&self) -> Option<&str> {
        self.get_str("idBoard")
    }

    pub fn set_board_id(&mut self, board_id: &str) -> Result<&mut Self> {
        self.inner.set("idBoard", board_id)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::TrelloError;
    use crate::http::HttpMethod;
    use crate::http_client::HttpClient;
    use crate::mock::MockTransport;
    use chrono::Utc;
    use serde_json::json;

    fn http() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        (HttpClient::with_transport(&ClientConfig::default(), mock.clone()), mock)
    }

    #[test]
    fn card_due_date_is_sent_in_atom_format() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "c1", "name": "Ship", "idList": "l1"}));
        let mut card = Card::load(&http, "c1").unwrap();

        let due = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
        card.set_due_date(Some(due)).unwrap();
        mock.push_json(200, json!({"id": "c1"}))
            .push_json(200, json!({"id": "c1", "due": "2024-05-17T12:00:00.000Z"}));
        card.save().unwrap();

        let update = &mock.requests()[1];
        assert_eq!(update.method, HttpMethod::Put);
        assert!(update
            .form_pairs()
            .contains(&("due".to_string(), "2024-05-17T12:00:00+00:00".to_string())));
        assert_eq!(card.due_date().unwrap(), due.fixed_offset());
    }

    #[test]
    fn card_remove_is_supported() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "c1"})).push_json(200, json!({}));
        let mut card = Card::load(&http, "c1").unwrap();
        card.remove().unwrap();
        let req = mock.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://api.trello.com/1/cards/c1");
    }

    #[test]
    fn checklist_items_are_read_from_data() {
        let (http, mock) = http();
        mock.push_json(
            200,
            json!({
                "id": "cl1",
                "name": "Release",
                "checkItems": [
                    {"id": "i1", "name": "Tag", "state": "complete"},
                    {"id": "i2", "name": "Publish", "state": "incomplete"}
                ]
            }),
        );
        let checklist = Checklist::load(&http, "cl1").unwrap();
        assert_eq!(checklist.items().len(), 2);
        assert_eq!(checklist.is_item_checked("Tag"), Some(true));
        assert_eq!(checklist.is_item_checked("Publish"), Some(false));
        assert_eq!(checklist.is_item_checked("Announce"), None);
    }

    #[test]
    fn label_colour_is_checked_and_label_cannot_be_removed() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "lb1", "name": "Bug", "color": "red"}));
        let mut label = Label::load(&http, "lb1").unwrap();

        let err = label.set_color("crimson").unwrap_err();
        assert_eq!(err.parameter(), Some("color"));
        assert_eq!(label.color(), Some("red"));

        label.set_color("green").unwrap();
        assert_eq!(label.color(), Some("green"));

        assert!(matches!(
            label.remove(),
            Err(TrelloError::UnsupportedOperation { .. })
        ));
        assert_eq!(mock.request_count(), 1);
    }
}
