use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::error::Result;
use crate::model::board::bound_id;
use crate::model::{domain_object, Member};
use crate::resources::{action, notification, token, webhook};

domain_object! {
    /// A recorded action, e.g. a comment or a card move.
    Action => action::ACTION
}

domain_object! {
    Notification => notification::NOTIFICATION
}

domain_object! {
    /// An API token. Tokens can be read and revoked, not created.
    Token => token::TOKEN
}

domain_object! {
    Webhook => webhook::WEBHOOK
}

impl<'a> Action<'a> {
    /// `type`, e.g. `commentCard`.
    pub fn kind(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("date")
    }

    pub fn payload(&self) -> Option<&Value> {
        self.get("data")
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.get_str("idMemberCreator")
    }

    pub fn creator(&self) -> Result<Member<'a>> {
        let id = bound_id(self.creator_id(), "member")?;
        Member::load(self.api().http(), &id)
    }

    /// Comment text; only meaningful for comment actions.
    pub fn set_text(&mut self, text: &str) -> Result<&mut Self> {
        self.inner.set("text", text)?;
        Ok(self)
    }
}

impl<'a> Notification<'a> {
    pub fn kind(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("date")
    }

    pub fn payload(&self) -> Option<&Value> {
        self.get("data")
    }

    pub fn is_unread(&self) -> bool {
        self.get_bool("unread")
    }

    pub fn set_unread(&mut self, unread: bool) -> Result<&mut Self> {
        self.inner.set("unread", unread)?;
        Ok(self)
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.get_str("idMemberCreator")
    }

    pub fn creator(&self) -> Result<Member<'a>> {
        let id = bound_id(self.creator_id(), "member")?;
        Member::load(self.api().http(), &id)
    }
}

impl<'a> Token<'a> {
    pub fn identifier(&self) -> Option<&str> {
        self.get_str("identifier")
    }

    pub fn member_id(&self) -> Option<&str> {
        self.get_str("idMember")
    }

    pub fn member(&self) -> Result<Member<'a>> {
        let id = bound_id(self.member_id(), "member")?;
        Member::load(self.api().http(), &id)
    }

    pub fn date_created(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("dateCreated")
    }

    /// `None` for tokens that never expire.
    pub fn date_expires(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("dateExpires")
    }

    pub fn permissions(&self) -> Option<&Value> {
        self.get("permissions")
    }
}

impl Webhook<'_> {
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn set_description(&mut self, description: &str) -> Result<&mut Self> {
        self.inner.set("description", description)?;
        Ok(self)
    }

    pub fn model_id(&self) -> Option<&str> {
        self.get_str("idModel")
    }

    pub fn set_model_id(&mut self, model_id: &str) -> Result<&mut Self> {
        self.inner.set("idModel", model_id)?;
        Ok(self)
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.get_str("callbackURL")
    }

    pub fn set_callback_url(&mut self, url: &str) -> Result<&mut Self> {
        self.inner.set("callbackURL", url)?;
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.get_bool("active")
    }

    pub fn set_active(&mut self, active: bool) -> Result<&mut Self> {
        self.inner.set("active", active)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::TrelloError;
    use crate::http_client::HttpClient;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn http() -> (HttpClient, MockTransport) {
        let mock = MockTransport::new();
        (HttpClient::with_transport(&ClientConfig::default(), mock.clone()), mock)
    }

    #[test]
    fn webhook_save_requires_callback_and_model() {
        let (http, mock) = http();
        let mut hook = Webhook::new(&http);
        hook.set_description("board feed").unwrap();
        let err = hook.save().unwrap_err();
        assert!(matches!(err, TrelloError::MissingParameter { .. }));
        assert_eq!(mock.request_count(), 0);

        hook.set_callback_url("https://example.com/hook")
            .unwrap()
            .set_model_id("b1")
            .unwrap();
        mock.push_json(200, json!({"id": "w1", "active": true}))
            .push_json(200, json!({"id": "w1", "active": true, "idModel": "b1"}));
        hook.save().unwrap();
        assert_eq!(hook.id(), Some("w1"));
        assert!(hook.is_active());
    }

    #[test]
    fn token_navigates_to_member() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "t1", "idMember": "m1", "dateExpires": null}))
            .push_json(200, json!({"id": "m1", "username": "ada"}));
        let token = Token::load(&http, "t1").unwrap();
        assert_eq!(token.date_expires(), None);
        let member = token.member().unwrap();
        assert_eq!(member.username(), Some("ada"));
        assert_eq!(mock.last_request().unwrap().url, "https://api.trello.com/1/members/m1?fields=all");
    }

    #[test]
    fn notification_marks_read() {
        let (http, mock) = http();
        mock.push_json(200, json!({"id": "n1", "unread": true, "type": "addedToCard"}));
        let mut note = Notification::load(&http, "n1").unwrap();
        assert!(note.is_unread());
        assert_eq!(note.kind(), Some("addedToCard"));

        note.set_unread(false).unwrap();
        mock.push_json(200, json!({"id": "n1", "unread": false}))
            .push_json(200, json!({"id": "n1", "unread": false}));
        note.save().unwrap();
        assert!(mock.requests()[1]
            .form_pairs()
            .contains(&("unread".to_string(), "false".to_string())));
        assert!(!note.is_unread());
    }
}
