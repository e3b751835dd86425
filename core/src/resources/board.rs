//! Boards, board actions and board members.

use serde_json::Value;

use crate::error::Result;
use crate::http::encode_component;
use crate::http_client::HttpClient;
use crate::params::{validate_allowed, Candidates, Params};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{filter_segment, member, organization, related, related_field, Related, ROLES};

pub const FIELDS: &[&str] = &[
    "name",
    "desc",
    "descData",
    "closed",
    "idOrganization",
    "invited",
    "pinned",
    "starred",
    "url",
    "prefs",
    "invitations",
    "memberships",
    "shortLink",
    "subscribed",
    "labelNames",
    "powerUps",
    "dateLastActivity",
    "dateLastView",
    "shortUrl",
];

pub const MEMBER_FILTERS: &[&str] = &["none", "normal", "admins", "owners", "all"];

pub static BOARD: ResourceDescriptor = ResourceDescriptor::new("board", "boards")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities {
        remove: false,
        ..Capabilities::ALL
    })
    .with_create_required(&["name"])
    .with_load_params(&[
        ("fields", "all"),
        ("organization", "true"),
        ("organization_memberships", "all"),
        ("members", "all"),
        ("membersInvited", "all"),
        ("memberships", "all"),
        ("lists", "all"),
    ]);

pub static BOARD_ACTIONS: ResourceDescriptor =
    ResourceDescriptor::new("board action", "boards/#id#/actions");

pub static BOARD_MEMBERS: ResourceDescriptor =
    ResourceDescriptor::new("board member", "boards/#id#/members");

#[derive(Debug, Clone, Copy)]
pub struct BoardApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> BoardApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &BOARD),
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

    pub fn set_name(&self, id: &str, name: &str) -> Result<Value> {
        self.api.set_value(id, "name", name)
    }

    pub fn set_description(&self, id: &str, description: &str) -> Result<Value> {
        self.api.set_value(id, "desc", description)
    }

    pub fn set_closed(&self, id: &str, closed: bool) -> Result<Value> {
        self.api.set_value(id, "closed", closed)
    }

    pub fn set_subscribed(&self, id: &str, subscribed: bool) -> Result<Value> {
        self.api.set_value(id, "subscribed", subscribed)
    }

    /// PUT `boards/{id}/idOrganization/{organization}`.
    pub fn set_organization(&self, id: &str, organization_id: &str) -> Result<Value> {
        let path = format!(
            "{}/idOrganization/{}",
            self.api.item_path(id),
            encode_component(organization_id)
        );
        self.api.put(&path, &Params::new())
    }

    pub fn organization(&self, id: &str, params: &Params) -> Result<Value> {
        related(&self.api, id, Related::Organization, params)
    }

    pub fn organization_field(&self, id: &str, field: &str) -> Result<Value> {
        self.api
            .related_field(id, "organization", field, organization::FIELDS)
    }

    pub fn stars(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "boardStars", params)
    }

    pub fn deltas(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.related(id, "deltas", params)
    }

    pub fn set_viewed(&self, id: &str) -> Result<Value> {
        let path = format!("{}/markAsViewed", self.api.item_path(id));
        self.api.post(&path, &Params::new())
    }

    pub fn actions(&self) -> BoardActionsApi<'a> {
        BoardActionsApi {
            api: ResourceApi::new(self.api.http(), &BOARD_ACTIONS),
        }
    }

    pub fn members(&self) -> BoardMembersApi<'a> {
        BoardMembersApi::with_descriptor(self.api.http(), &BOARD_MEMBERS)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoardActionsApi<'a> {
    api: ResourceApi<'a>,
}

impl BoardActionsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }
}

/// Membership operations on a board, or on an organization when built from
/// the organization-members descriptor.
#[derive(Debug, Clone, Copy)]
pub struct BoardMembersApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> BoardMembersApi<'a> {
    pub(crate) fn with_descriptor(http: &'a HttpClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            api: ResourceApi::new(http, descriptor),
        }
    }

    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn remove(&self, id: &str, member_id: &str) -> Result<Value> {
        self.api.delete(&self.api.child_path(id, member_id), &Params::new())
    }

    /// GET `{path}/{filters}` with every filter checked against
    /// `MEMBER_FILTERS`.
    pub fn filter(&self, id: &str, filter: impl Into<Candidates>) -> Result<Value> {
        let filters = validate_allowed(MEMBER_FILTERS, filter, "filter")?;
        let path = format!("{}/{}", self.api.get_path(Some(id)), filter_segment(&filters));
        self.api.get(&path, &Params::new())
    }

    pub fn cards(&self, id: &str, member_id: &str, params: &Params) -> Result<Value> {
        let path = format!("{}/cards", self.api.child_path(id, member_id));
        self.api.get(&path, params)
    }

    pub fn invite(&self, id: &str, email: &str, full_name: &str, role: &str) -> Result<Value> {
        validate_allowed(ROLES, role, "role")?;
        let params = Params::new()
            .with("email", email)
            .with("fullName", full_name)
            .with("type", role);
        self.api.put(&self.api.get_path(Some(id)), &params)
    }

    pub fn add_member(&self, id: &str, member_id: &str, invite_text: &str, role: &str) -> Result<Value> {
        validate_allowed(ROLES, role, "role")?;
        let params = Params::new()
            .with("type", role)
            .with("invitationMessage", invite_text);
        self.api.put(&self.api.child_path(id, member_id), &params)
    }

    pub fn set_role(&self, id: &str, member_or_organization: &str, role: &str) -> Result<Value> {
        validate_allowed(ROLES, role, "role")?;
        let params = Params::new()
            .with("idMember", member_or_organization)
            .with("type", role);
        self.api
            .post(&self.api.child_path(id, member_or_organization), &params)
    }

    /// GET `{path}Invited`, e.g. `boards/{id}/membersInvited`.
    pub fn invited(&self, id: &str, params: &Params) -> Result<Value> {
        let path = format!("{}Invited", self.api.get_path(Some(id)));
        self.api.get(&path, params)
    }

    pub fn invited_field(&self, id: &str, field: &str) -> Result<Value> {
        validate_allowed(member::FIELDS, field, "field")?;
        let path = format!(
            "{}Invited/{}",
            self.api.get_path(Some(id)),
            encode_component(field)
        );
        self.api.get(&path, &Params::new())
    }
}

/// Field of the board an entity belongs to; shared by cards, lists and
/// checklists.
pub(crate) fn board_field(api: &ResourceApi<'_>, id: &str, field: &str) -> Result<Value> {
    related_field(api, id, Related::Board, field)
}
