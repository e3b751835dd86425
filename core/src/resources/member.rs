//! Members, their boards, cards and webhooks.

use serde_json::Value;

use crate::error::Result;
use crate::http::encode_component;
use crate::http_client::HttpClient;
use crate::params::{validate_allowed, Candidates, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{board, filter_segment};

pub const FIELDS: &[&str] = &[
    "avatarHash",
    "bio",
    "bioData",
    "confirmed",
    "fullName",
    "idPremOrgsAdmin",
    "initials",
    "memberType",
    "products",
    "status",
    "url",
    "username",
    "avatarSource",
    "email",
    "gravatarHash",
    "idBoards",
    "idBoardsPinned",
    "idOrganizations",
    "loginTypes",
    "newEmail",
    "oneTimeMessagesDismissed",
    "prefs",
    "trophies",
    "uploadedAvatarHash",
    "premiumFeatures",
];

pub const BOARD_FILTERS: &[&str] = &[
    "all",
    "members",
    "organization",
    "public",
    "open",
    "closed",
    "pinned",
    "unpinned",
    "starred",
];

pub const CARD_FILTERS: &[&str] = &["none", "visible", "open", "closed", "all"];

pub static MEMBER: ResourceDescriptor = ResourceDescriptor::new("member", "members")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        show: true,
        update: true,
        ..Capabilities::NONE
    });

pub static MEMBER_BOARDS: ResourceDescriptor =
    ResourceDescriptor::new("member board", "members/#id#/boards");
pub static MEMBER_CARDS: ResourceDescriptor =
    ResourceDescriptor::new("member card", "members/#id#/cards");
pub static MEMBER_WEBHOOKS: ResourceDescriptor =
    ResourceDescriptor::new("member webhook", "members/#id#/tokens");

#[derive(Debug, Clone, Copy)]
pub struct MemberApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> MemberApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &MEMBER),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    /// `id` may be `"me"` for the authenticated member.
    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.update(id, params)
    }

    pub fn deltas(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "deltas", params)
    }

    pub fn set_avatar_source(&self, id: &str, source: &str) -> Result<Value> {
        self.api.set_value(id, "avatarSource", source)
    }

    /// POST `members/{id}/avatar` with `file`.
    pub fn set_avatar(&self, id: &str, file: &str) -> Result<Value> {
        let path = format!("{}/avatar", self.api.item_path(id));
        self.api.post(&path, &Params::new().with("file", file))
    }

    pub fn set_bio(&self, id: &str, bio: &str) -> Result<Value> {
        self.api.set_value(id, "bio", bio)
    }

    pub fn set_full_name(&self, id: &str, full_name: &str) -> Result<Value> {
        self.api.set_value(id, "fullName", full_name)
    }

    pub fn set_initials(&self, id: &str, initials: &str) -> Result<Value> {
        self.api.set_value(id, "initials", initials)
    }

    pub fn set_username(&self, id: &str, username: &str) -> Result<Value> {
        self.api.set_value(id, "username", username)
    }

    pub fn boards(&self) -> MemberBoardsApi<'a> {
        MemberBoardsApi::with_descriptor(self.api.http(), &MEMBER_BOARDS)
    }

    pub fn cards(&self) -> MemberCardsApi<'a> {
        MemberCardsApi {
            api: ResourceApi::new(self.api.http(), &MEMBER_CARDS),
        }
    }

    pub fn webhooks(&self) -> MemberWebhooksApi<'a> {
        MemberWebhooksApi {
            api: ResourceApi::new(self.api.http(), &MEMBER_WEBHOOKS),
        }
    }
}

/// Board listing for a member, or for an organization when built from the
/// organization-boards descriptor.
#[derive(Debug, Clone, Copy)]
pub struct MemberBoardsApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> MemberBoardsApi<'a> {
    pub(crate) fn with_descriptor(http: &'a HttpClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            api: ResourceApi::new(http, descriptor),
        }
    }

    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn filter(&self, id: &str, filter: impl Into<Candidates>) -> Result<Value> {
        let filters = validate_allowed(BOARD_FILTERS, filter, "filter")?;
        let path = format!("{}/{}", self.api.get_path(Some(id)), filter_segment(&filters));
        self.api.get(&path, &Params::new())
    }

    /// GET `{path}Invited`, e.g. `members/{id}/boardsInvited`.
    pub fn invited_to(&self, id: &str, params: &Params) -> Result<Value> {
        let path = format!("{}Invited", self.api.get_path(Some(id)));
        self.api.get(&path, params)
    }

    pub fn invited_to_field(&self, id: &str, field: &str) -> Result<Value> {
        validate_allowed(board::FIELDS, field, "field")?;
        let path = format!(
            "{}Invited/{}",
            self.api.get_path(Some(id)),
            encode_component(field)
        );
        self.api.get(&path, &Params::new())
    }

    /// Pins are always stored on the member.
    pub fn pin(&self, id: &str, board_id: &str) -> Result<Value> {
        let path = format!("members/{}/idBoardsPinned", encode_component(id));
        self.api.post(&path, &Params::new().with("value", board_id))
    }

    pub fn unpin(&self, id: &str, board_id: &str) -> Result<Value> {
        let path = format!(
            "members/{}/idBoardsPinned/{}",
            encode_component(id),
            encode_component(board_id)
        );
        self.api.delete(&path, &Params::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MemberCardsApi<'a> {
    api: ResourceApi<'a>,
}

impl MemberCardsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn filter(&self, id: &str, filter: impl Into<Candidates>) -> Result<Value> {
        let filters = validate_allowed(CARD_FILTERS, filter, "filter")?;
        let path = format!("{}/{}", self.api.get_path(Some(id)), filter_segment(&filters));
        self.api.get(&path, &Params::new())
    }
}

/// Webhooks are listed through the member's tokens.
#[derive(Debug, Clone, Copy)]
pub struct MemberWebhooksApi<'a> {
    api: ResourceApi<'a>,
}

impl MemberWebhooksApi<'_> {
    pub fn all(&self, id: &str) -> Result<Value> {
        self.api
            .get(&self.api.get_path(Some(id)), &Params::new().with("webhooks", true))
    }
}
