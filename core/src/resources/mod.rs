//! Typed APIs for every remote resource.
//!
//! Each module declares its `static` descriptors and a thin `*Api` wrapper
//! around `ResourceApi`. Typed wrappers only expose the operations the
//! resource supports; the generic, capability-checked surface is available
//! through `api()`.
//!
//! Sub-resources (`boards/#id#/members`, `cards/#id#/stickers`, ...) follow
//! the same pattern one level down. Where two resources share an operation
//! set (member boards and organization boards, board members and
//! organization members) the wrapper is built from a different descriptor
//! rather than duplicated.

pub mod action;
pub mod board;
pub mod card;
pub mod checklist;
pub mod label;
pub mod list;
pub mod member;
pub mod notification;
pub mod organization;
pub mod search;
pub mod token;
pub mod webhook;

use serde_json::Value;

use crate::error::Result;
use crate::params::Params;
use crate::resource::ResourceApi;

pub use action::ActionApi;
pub use board::{BoardActionsApi, BoardApi, BoardMembersApi};
pub use card::{
    CardActionsApi, CardApi, CardAttachmentsApi, CardChecklistsApi, CardLabelsApi, CardMembersApi,
    CardStickersApi,
};
pub use checklist::{ChecklistApi, ChecklistCardsApi, ChecklistItemsApi};
pub use label::LabelApi;
pub use list::CardListApi;
pub use member::{MemberApi, MemberBoardsApi, MemberCardsApi, MemberWebhooksApi};
pub use notification::NotificationApi;
pub use organization::OrganizationApi;
pub use search::MemberSearchApi;
pub use token::{TokenApi, TokenWebhooksApi};
pub use webhook::WebhookApi;

/// Roles accepted when inviting or re-assigning a member.
pub const ROLES: &[&str] = &["normal", "observer", "admin"];

/// Entities an action or notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Related {
    Board,
    List,
    Card,
    Member,
    Creator,
    Organization,
}

impl Related {
    pub fn segment(self) -> &'static str {
        match self {
            Related::Board => "board",
            Related::List => "list",
            Related::Card => "card",
            Related::Member => "member",
            Related::Creator => "memberCreator",
            Related::Organization => "organization",
        }
    }

    /// Declared fields of the related resource.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Related::Board => board::FIELDS,
            Related::List => list::FIELDS,
            Related::Card => card::FIELDS,
            Related::Member | Related::Creator => member::FIELDS,
            Related::Organization => organization::FIELDS,
        }
    }
}

/// GET `{path}/{id}/{segment}` for a related entity.
pub(crate) fn related(api: &ResourceApi<'_>, id: &str, target: Related, params: &Params) -> Result<Value> {
    api.related(id, target.segment(), params)
}

/// GET `{path}/{id}/{segment}/{field}`, checking `field` first.
pub(crate) fn related_field(api: &ResourceApi<'_>, id: &str, target: Related, field: &str) -> Result<Value> {
    api.related_field(id, target.segment(), field, target.fields())
}

/// Join validated filter values for a `{path}/{filters}` segment.
pub(crate) fn filter_segment(filters: &[String]) -> String {
    filters.join(",")
}
