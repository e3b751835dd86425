//! Get-or-create entry points for domain objects.
//!
//! With an id the object is loaded immediately; without one an unbound
//! object is returned, ready to be filled in and saved. Actions, tokens and
//! webhooks are only ever fetched by id.

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::model::{
    Action, Board, Card, CardList, Checklist, Label, Member, Notification, Organization, Token,
    Webhook,
};

#[derive(Debug, Clone, Copy)]
pub struct Manager<'a> {
    http: &'a HttpClient,
}

impl<'a> Manager<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub fn organization(&self, id: Option<&str>) -> Result<Organization<'a>> {
        match id {
            Some(id) => Organization::load(self.http, id),
            None => Ok(Organization::new(self.http)),
        }
    }

    pub fn board(&self, id: Option<&str>) -> Result<Board<'a>> {
        match id {
            Some(id) => Board::load(self.http, id),
            None => Ok(Board::new(self.http)),
        }
    }

    pub fn list(&self, id: Option<&str>) -> Result<CardList<'a>> {
        match id {
            Some(id) => CardList::load(self.http, id),
            None => Ok(CardList::new(self.http)),
        }
    }

    pub fn card(&self, id: Option<&str>) -> Result<Card<'a>> {
        match id {
            Some(id) => Card::load(self.http, id),
            None => Ok(Card::new(self.http)),
        }
    }

    pub fn checklist(&self, id: Option<&str>) -> Result<Checklist<'a>> {
        match id {
            Some(id) => Checklist::load(self.http, id),
            None => Ok(Checklist::new(self.http)),
        }
    }

    pub fn label(&self, id: Option<&str>) -> Result<Label<'a>> {
        match id {
            Some(id) => Label::load(self.http, id),
            None => Ok(Label::new(self.http)),
        }
    }

    pub fn member(&self, id: Option<&str>) -> Result<Member<'a>> {
        match id {
            Some(id) => Member::load(self.http, id),
            None => Ok(Member::new(self.http)),
        }
    }

    pub fn action(&self, id: &str) -> Result<Action<'a>> {
        Action::load(self.http, id)
    }

    pub fn notification(&self, id: &str) -> Result<Notification<'a>> {
        Notification::load(self.http, id)
    }

    pub fn token(&self, id: &str) -> Result<Token<'a>> {
        Token::load(self.http, id)
    }

    pub fn webhook(&self, id: &str) -> Result<Webhook<'a>> {
        Webhook::load(self.http, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::mock::MockTransport;
    use crate::model::ObjectState;
    use serde_json::json;

    #[test]
    fn get_or_create() {
        let mock = MockTransport::new();
        let http = HttpClient::with_transport(&ClientConfig::default(), mock.clone());
        let manager = Manager::new(&http);

        let card = manager.card(None).unwrap();
        assert_eq!(card.state(), ObjectState::Unbound);
        assert_eq!(mock.request_count(), 0);

        mock.push_json(200, json!({"id": "c1", "name": "Ship"}));
        let card = manager.card(Some("c1")).unwrap();
        assert_eq!(card.state(), ObjectState::Loaded);
        assert_eq!(card.name(), Some("Ship"));

        mock.push_json(404, json!({"message": "The requested resource was not found."}));
        let err = manager.action("a404").unwrap_err();
        assert!(err.is_not_found());
    }
}
