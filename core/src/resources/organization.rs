//! Organizations. Boards and members reuse the member-boards and
//! board-members operation sets on organization paths.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpClient;
use crate::params::Params;
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::{BoardMembersApi, MemberBoardsApi};

pub const FIELDS: &[&str] = &[
    "name",
    "displayName",
    "desc",
    "descData",
    "idBoards",
    "invited",
    "invitations",
    "memberships",
    "prefs",
    "powerUps",
    "products",
    "billableMemberCount",
    "url",
    "website",
    "logoHash",
    "premiumFeatures",
];

pub static ORGANIZATION: ResourceDescriptor =
    ResourceDescriptor::new("organization", "organizations")
        .with_fields(FIELDS)
        .with_capabilities(Capabilities::SHOW);

pub static ORGANIZATION_BOARDS: ResourceDescriptor =
    ResourceDescriptor::new("organization board", "organizations/#id#/boards");
pub static ORGANIZATION_MEMBERS: ResourceDescriptor =
    ResourceDescriptor::new("organization member", "organizations/#id#/members");

#[derive(Debug, Clone, Copy)]
pub struct OrganizationApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> OrganizationApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &ORGANIZATION),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    pub fn boards(&self) -> MemberBoardsApi<'a> {
        MemberBoardsApi::with_descriptor(self.api.http(), &ORGANIZATION_BOARDS)
    }

    pub fn members(&self) -> BoardMembersApi<'a> {
        BoardMembersApi::with_descriptor(self.api.http(), &ORGANIZATION_MEMBERS)
    }
}
