use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::error::{Result, TrelloError};
use crate::model::{domain_object, Card, Organization};
use crate::params::{validate_allowed, Params};
use crate::resources::{board, list, CardListApi};

domain_object! {
    /// A board. Loading pulls in its organization, members, memberships and
    /// lists in the same request.
    Board => board::BOARD
}

domain_object! {
    /// A list of cards on a board.
    CardList => list::LIST
}

/// Values accepted for `invitations`.
pub const INVITE_ROLES: &[&str] = &["members", "admins"];

impl<'a> Board<'a> {
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

    pub fn description_data(&self) -> Option<&Value> {
        self.get("descData")
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn short_url(&self) -> Option<&str> {
        self.get_str("shortUrl")
    }

    pub fn short_link(&self) -> Option<&str> {
        self.get_str("shortLink")
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.get_str("idOrganization")
    }

    pub fn set_organization_id(&mut self, organization_id: &str) -> Result<&mut Self> {
        self.inner.set("idOrganization", organization_id)?;
        Ok(self)
    }

    /// Move the board to `organization`, which must have an id.
    pub fn set_organization(&mut self, organization: &Organization<'_>) -> Result<&mut Self> {
        let id = bound_id(organization.id(), "organization")?;
        self.set_organization_id(&id)
    }

    /// Load the owning organization.
    pub fn organization(&self) -> Result<Organization<'a>> {
        let id = bound_id(self.organization_id(), "organization")?;
        Organization::load(self.api().http(), &id)
    }

    /// Load every list embedded in the board data.
    pub fn lists(&self) -> Result<Vec<CardList<'a>>> {
        embedded_ids(self.get("lists"))
            .into_iter()
            .map(|id| CardList::load(self.api().http(), id))
            .collect()
    }

    /// First list whose name or id equals `id_or_name`.
    pub fn list(&self, id_or_name: &str) -> Result<CardList<'a>> {
        self.lists()?
            .into_iter()
            .find(|list| list.id() == Some(id_or_name) || list.name() == Some(id_or_name))
            .ok_or_else(|| {
                TrelloError::InvalidArgument(format!(
                    "There is no list with name or id \"{}\" on this board (\"{}\")",
                    id_or_name,
                    self.name().unwrap_or_default()
                ))
            })
    }

    pub fn is_closed(&self) -> bool {
        self.get_bool("closed")
    }

    pub fn set_closed(&mut self, closed: bool) -> Result<&mut Self> {
        self.inner.set("closed", closed)?;
        Ok(self)
    }

    pub fn is_pinned(&self) -> bool {
        self.get_bool("pinned")
    }

    pub fn set_pinned(&mut self, pinned: bool) -> Result<&mut Self> {
        self.inner.set("pinned", pinned)?;
        Ok(self)
    }

    pub fn is_starred(&self) -> bool {
        self.get_bool("starred")
    }

    pub fn set_starred(&mut self, starred: bool) -> Result<&mut Self> {
        self.inner.set("starred", starred)?;
        Ok(self)
    }

    pub fn is_subscribed(&self) -> bool {
        self.get_bool("subscribed")
    }

    pub fn set_subscribed(&mut self, subscribed: bool) -> Result<&mut Self> {
        self.inner.set("subscribed", subscribed)?;
        Ok(self)
    }

    pub fn is_invited(&self) -> bool {
        self.get_bool("invited")
    }

    /// Who may invite new members: `members` or `admins`.
    pub fn required_role_to_invite(&self) -> Option<&str> {
        self.get_str("invitations")
    }

    pub fn set_required_role_to_invite(&mut self, role: &str) -> Result<&mut Self> {
        validate_allowed(INVITE_ROLES, role, "invitations")?;
        self.inner.set("invitations", role)?;
        Ok(self)
    }

    pub fn memberships(&self) -> Option<&Value> {
        self.get("memberships")
    }

    pub fn set_memberships(&mut self, memberships: Value) -> Result<&mut Self> {
        self.inner.set("memberships", memberships)?;
        Ok(self)
    }

    pub fn preferences(&self) -> Option<&Value> {
        self.get("prefs")
    }

    /// Sent as `prefs/<key>` entries on save.
    pub fn set_preferences(&mut self, prefs: Value) -> Result<&mut Self> {
        self.inner.set("prefs", prefs)?;
        Ok(self)
    }

    pub fn label_names(&self) -> Option<&Value> {
        self.get("labelNames")
    }

    pub fn set_label_names(&mut self, label_names: Value) -> Result<&mut Self> {
        self.inner.set("labelNames", label_names)?;
        Ok(self)
    }

    pub fn power_ups(&self) -> Vec<&str> {
        self.get_str_list("powerUps")
    }

    pub fn set_power_ups(&mut self, power_ups: &[&str]) -> Result<&mut Self> {
        self.inner.set("powerUps", power_ups.to_vec())?;
        Ok(self)
    }

    pub fn date_of_last_activity(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("dateLastActivity")
    }

    pub fn date_of_last_view(&self) -> Option<DateTime<FixedOffset>> {
        self.get_date("dateLastView")
    }
}

impl<'a> CardList<'a> {
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

    pub fn set_board(&mut self, board: &Board<'_>) -> Result<&mut Self> {
        let id = bound_id(board.id(), "board")?;
        self.set_board_id(&id)
    }

    pub fn board(&self) -> Result<Board<'a>> {
        let id = bound_id(self.board_id(), "board")?;
        Board::load(self.api().http(), &id)
    }

    /// `top`, `bottom` or a positive number.
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

    /// Load every card currently on the list.
    pub fn cards(&self) -> Result<Vec<Card<'a>>> {
        let id = bound_id(self.id(), "list")?;
        let listed = CardListApi::new(self.api().http()).cards(&id, &Params::new().with("fields", "id"))?;
        embedded_ids(Some(&listed))
            .into_iter()
            .map(|id| Card::load(self.api().http(), id))
            .collect()
    }
}

/// Owned copy of an id the caller needs, or `InvalidState` when unset.
pub(crate) fn bound_id(id: Option<&str>, what: &str) -> Result<String> {
    id.map(str::to_string).ok_or_else(|| TrelloError::InvalidState {
        operation: format!("resolve {what}"),
        state: format!("no {what} id"),
    })
}

/// `id` of every object in a JSON array.
pub(crate) fn embedded_ids(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    }
}
