//! Name -> resource lookup used by `Client::api`.

use std::fmt;
use std::str::FromStr;

use crate::error::TrelloError;
use crate::resource::ResourceDescriptor;
use crate::resources::{
    action, board, card, checklist, label, list, member, notification, organization, token,
    webhook,
};

/// Every top-level resource reachable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Action,
    Board,
    Card,
    Checklist,
    CardList,
    Label,
    Member,
    Notification,
    Organization,
    Token,
    Webhook,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Action,
        ResourceKind::Board,
        ResourceKind::Card,
        ResourceKind::Checklist,
        ResourceKind::CardList,
        ResourceKind::Label,
        ResourceKind::Member,
        ResourceKind::Notification,
        ResourceKind::Organization,
        ResourceKind::Token,
        ResourceKind::Webhook,
    ];

    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::Action => &action::ACTION,
            ResourceKind::Board => &board::BOARD,
            ResourceKind::Card => &card::CARD,
            ResourceKind::Checklist => &checklist::CHECKLIST,
            ResourceKind::CardList => &list::LIST,
            ResourceKind::Label => &label::LABEL,
            ResourceKind::Member => &member::MEMBER,
            ResourceKind::Notification => &notification::NOTIFICATION,
            ResourceKind::Organization => &organization::ORGANIZATION,
            ResourceKind::Token => &token::TOKEN,
            ResourceKind::Webhook => &webhook::WEBHOOK,
        }
    }

    /// Singular name as accepted by `from_str`.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::CardList => "list",
            other => other.descriptor().name,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = TrelloError;

    /// Singular or plural, case-insensitive. Lists also answer to
    /// `cardlist`/`cardlists`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "action" | "actions" => ResourceKind::Action,
            "board" | "boards" => ResourceKind::Board,
            "card" | "cards" => ResourceKind::Card,
            "checklist" | "checklists" => ResourceKind::Checklist,
            "list" | "lists" | "cardlist" | "cardlists" => ResourceKind::CardList,
            "label" | "labels" => ResourceKind::Label,
            "member" | "members" => ResourceKind::Member,
            "notification" | "notifications" => ResourceKind::Notification,
            "organization" | "organizations" => ResourceKind::Organization,
            "token" | "tokens" => ResourceKind::Token,
            "webhook" | "webhooks" => ResourceKind::Webhook,
            _ => {
                return Err(TrelloError::InvalidArgument(format!(
                    "Undefined api called: \"{name}\""
                )))
            }
        };
        Ok(kind)
    }
}
