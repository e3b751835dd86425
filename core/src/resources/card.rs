//! Cards and their sub-resources: actions, attachments, checklists, labels,
//! members and stickers.

use chrono::{DateTime, TimeZone};
use serde_json::Value;

use crate::error::{Result, TrelloError};
use crate::http::encode_component;
use crate::http_client::HttpClient;
use crate::params::{
    validate_allowed, validate_at_least_one_of, validate_required, Candidates, ParamValue, Params,
};
use crate::resource::{Capabilities, ResourceApi, ResourceDescriptor};
use crate::resources::board::board_field;
use crate::resources::{filter_segment, label, related, related_field, Related};

pub const FIELDS: &[&str] = &[
    "badges",
    "checkItemStates",
    "closed",
    "dateLastActivity",
    "desc",
    "descData",
    "due",
    "email",
    "idBoard",
    "idChecklists",
    "idList",
    "idMembers",
    "idMembersVoted",
    "idShort",
    "idAttachmentCover",
    "manualCoverAttachment",
    "labels",
    "name",
    "pos",
    "shortLink",
    "shortUrl",
    "subscribed",
    "url",
];

pub const STICKER_FIELDS: &[&str] = &[
    "all",
    "image",
    "imageScaled",
    "imageUrl",
    "left",
    "rotate",
    "top",
    "zIndex",
];

pub static CARD: ResourceDescriptor = ResourceDescriptor::new("card", "cards")
    .with_fields(FIELDS)
    .with_capabilities(Capabilities::ALL)
    .with_create_required(&["idList", "name"]);

pub static CARD_ACTIONS: ResourceDescriptor =
    ResourceDescriptor::new("card action", "cards/#id#/actions");
pub static CARD_ATTACHMENTS: ResourceDescriptor =
    ResourceDescriptor::new("card attachment", "cards/#id#/attachments");
pub static CARD_CHECKLISTS: ResourceDescriptor =
    ResourceDescriptor::new("card checklist", "cards/#id#/checklists");
pub static CARD_LABELS: ResourceDescriptor = ResourceDescriptor::new("card label", "cards/#id#");
pub static CARD_MEMBERS: ResourceDescriptor =
    ResourceDescriptor::new("card member", "cards/#id#/members");
pub static CARD_STICKERS: ResourceDescriptor =
    ResourceDescriptor::new("card sticker", "cards/#id#/stickers");

#[derive(Debug, Clone, Copy)]
pub struct CardApi<'a> {
    api: ResourceApi<'a>,
}

impl<'a> CardApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self {
            api: ResourceApi::new(http, &CARD),
        }
    }

    pub fn api(&self) -> ResourceApi<'a> {
        self.api
    }

    pub fn show(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.show(id, params)
    }

    /// Requires `idList` and `name`; `due` and `urlSource` default to null.
    pub fn create(&self, params: &Params) -> Result<Value> {
        validate_required(CARD.create_required, params)?;
        let mut params = params.clone();
        params.insert_default("due", ParamValue::Null);
        params.insert_default("urlSource", ParamValue::Null);
        self.api.create(&params)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.update(id, params)
    }

    pub fn remove(&self, id: &str) -> Result<Value> {
        self.api.remove(id)
    }

    pub fn set_board(&self, id: &str, board_id: &str) -> Result<Value> {
        self.api.set_value(id, "idBoard", board_id)
    }

    pub fn board(&self, id: &str, params: &Params) -> Result<Value> {
        related(&self.api, id, Related::Board, params)
    }

    pub fn board_field(&self, id: &str, field: &str) -> Result<Value> {
        board_field(&self.api, id, field)
    }

    pub fn set_list(&self, id: &str, list_id: &str) -> Result<Value> {
        self.api.set_value(id, "idList", list_id)
    }

    pub fn list(&self, id: &str, params: &Params) -> Result<Value> {
        related(&self.api, id, Related::List, params)
    }

    pub fn list_field(&self, id: &str, field: &str) -> Result<Value> {
        related_field(&self.api, id, Related::List, field)
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

    /// `None` clears the due date.
    pub fn set_due_date<Tz: TimeZone>(&self, id: &str, due: Option<DateTime<Tz>>) -> Result<Value> {
        self.api.set_value(id, "due", due)
    }

    /// `"top"`, `"bottom"` or a positive number.
    pub fn set_position(&self, id: &str, position: impl Into<ParamValue>) -> Result<Value> {
        self.api.set_value(id, "pos", position)
    }

    pub fn set_subscribed(&self, id: &str, subscribed: bool) -> Result<Value> {
        self.api.set_value(id, "subscribed", subscribed)
    }

    pub fn actions(&self) -> CardActionsApi<'a> {
        CardActionsApi {
            api: ResourceApi::new(self.api.http(), &CARD_ACTIONS),
        }
    }

    pub fn attachments(&self) -> CardAttachmentsApi<'a> {
        CardAttachmentsApi {
            api: ResourceApi::new(self.api.http(), &CARD_ATTACHMENTS),
        }
    }

    pub fn checklists(&self) -> CardChecklistsApi<'a> {
        CardChecklistsApi {
            api: ResourceApi::new(self.api.http(), &CARD_CHECKLISTS),
        }
    }

    pub fn labels(&self) -> CardLabelsApi<'a> {
        CardLabelsApi {
            api: ResourceApi::new(self.api.http(), &CARD_LABELS),
        }
    }

    pub fn members(&self) -> CardMembersApi<'a> {
        CardMembersApi {
            api: ResourceApi::new(self.api.http(), &CARD_MEMBERS),
        }
    }

    pub fn stickers(&self) -> CardStickersApi<'a> {
        CardStickersApi {
            api: ResourceApi::new(self.api.http(), &CARD_STICKERS),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardActionsApi<'a> {
    api: ResourceApi<'a>,
}

impl CardActionsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    pub fn add_comment(&self, id: &str, text: &str) -> Result<Value> {
        let path = format!("{}/comments", self.api.get_path(Some(id)));
        self.api.post(&path, &Params::new().with("text", text))
    }

    pub fn remove_comment(&self, id: &str, comment_id: &str) -> Result<Value> {
        let path = format!(
            "{}/comments/{}",
            self.api.get_path(Some(id)),
            encode_component(comment_id)
        );
        self.api.delete(&path, &Params::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardAttachmentsApi<'a> {
    api: ResourceApi<'a>,
}

impl CardAttachmentsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    /// Needs a `url` or a `file`.
    pub fn create(&self, id: &str, params: &Params) -> Result<Value> {
        validate_at_least_one_of(&["url", "file"], params)?;
        self.api.post(&self.api.get_path(Some(id)), params)
    }

    pub fn show(&self, id: &str, attachment_id: &str) -> Result<Value> {
        self.api
            .get(&self.api.child_path(id, attachment_id), &Params::new())
    }

    pub fn remove(&self, id: &str, attachment_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(id, attachment_id), &Params::new())
    }

    pub fn set_as_cover(&self, id: &str, attachment_id: &str) -> Result<Value> {
        let path = format!("{}/idAttachmentCover", CardApi::item_path_of(id));
        self.api.put(&path, &Params::new().with("value", attachment_id))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardChecklistsApi<'a> {
    api: ResourceApi<'a>,
}

impl CardChecklistsApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    /// Needs one of `value`, `name` or `idChecklistSource`.
    pub fn create(&self, id: &str, params: &Params) -> Result<Value> {
        validate_at_least_one_of(&["value", "name", "idChecklistSource"], params)?;
        self.api.post(&self.api.get_path(Some(id)), params)
    }

    pub fn remove(&self, id: &str, checklist_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(id, checklist_id), &Params::new())
    }

    pub fn item_states(&self, id: &str, params: &Params) -> Result<Value> {
        let path = format!("{}/checkItemStates", CardApi::item_path_of(id));
        self.api.get(&path, params)
    }

    pub fn create_item(&self, id: &str, checklist_id: &str, name: &str, params: &Params) -> Result<Value> {
        let params = params
            .clone()
            .with("idChecklist", checklist_id)
            .with("name", name);
        let path = format!("{}/checkItem", self.api.child_path(id, checklist_id));
        self.api.post(&path, &params)
    }

    pub fn update_item(&self, id: &str, checklist_id: &str, item_id: &str, params: &Params) -> Result<Value> {
        self.api.put(&self.item_path(id, checklist_id, item_id), params)
    }

    pub fn convert_item_to_card(&self, id: &str, checklist_id: &str, item_id: &str) -> Result<Value> {
        let path = format!("{}/convertToCard", self.item_path(id, checklist_id, item_id));
        self.api.post(&path, &Params::new())
    }

    pub fn remove_item(&self, id: &str, checklist_id: &str, item_id: &str) -> Result<Value> {
        self.api
            .delete(&self.item_path(id, checklist_id, item_id), &Params::new())
    }

    fn item_path(&self, id: &str, checklist_id: &str, item_id: &str) -> String {
        format!(
            "{}/checkItem/{}",
            self.api.child_path(id, checklist_id),
            encode_component(item_id)
        )
    }
}

/// Labels on a card. Colours are checked against `label::COLORS`.
#[derive(Debug, Clone, Copy)]
pub struct CardLabelsApi<'a> {
    api: ResourceApi<'a>,
}

impl CardLabelsApi<'_> {
    /// Replace the card's colour labels.
    pub fn set(&self, id: &str, colors: impl Into<Candidates>) -> Result<Value> {
        let colors = validate_allowed(label::COLORS, colors, "labels")?;
        let path = format!("{}/labels", self.api.get_path(Some(id)));
        self.api
            .put(&path, &Params::new().with("value", filter_segment(&colors)))
    }

    pub fn create(&self, id: &str, params: &Params) -> Result<Value> {
        label::check_color(params)?;
        let path = format!("{}/labels", self.api.get_path(Some(id)));
        self.api.post(&path, params)
    }

    pub fn attach(&self, id: &str, label_id: &str) -> Result<Value> {
        let path = format!("{}/idLabels", self.api.get_path(Some(id)));
        self.api.post(&path, &Params::new().with("value", label_id))
    }

    pub fn detach(&self, id: &str, label_id: &str) -> Result<Value> {
        let path = format!(
            "{}/idLabels/{}",
            self.api.get_path(Some(id)),
            encode_component(label_id)
        );
        self.api.delete(&path, &Params::new())
    }

    /// Remove the label of colour `color`.
    pub fn remove(&self, id: &str, color: &str) -> Result<Value> {
        validate_allowed(label::COLORS, color, "color")?;
        let path = format!(
            "{}/labels/{}",
            self.api.get_path(Some(id)),
            encode_component(color)
        );
        self.api.delete(&path, &Params::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardMembersApi<'a> {
    api: ResourceApi<'a>,
}

impl CardMembersApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    /// Replace the card's members. At least one id is required.
    pub fn set(&self, id: &str, member_ids: &[&str]) -> Result<Value> {
        if member_ids.is_empty() {
            return Err(TrelloError::InvalidArgument(
                "You must specify at least one member id.".into(),
            ));
        }
        self.api.put(
            &self.api.get_path(Some(id)),
            &Params::new().with("value", member_ids.join(",")),
        )
    }

    pub fn add(&self, id: &str, member_id: &str) -> Result<Value> {
        self.api
            .post(&self.api.get_path(Some(id)), &Params::new().with("value", member_id))
    }

    pub fn remove(&self, id: &str, member_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(id, member_id), &Params::new())
    }

    pub fn add_vote(&self, id: &str, member_id: &str) -> Result<Value> {
        let path = format!("{}/membersVoted", CardApi::item_path_of(id));
        self.api.post(&path, &Params::new().with("value", member_id))
    }

    pub fn remove_vote(&self, id: &str, member_id: &str) -> Result<Value> {
        let path = format!(
            "{}/membersVoted/{}",
            CardApi::item_path_of(id),
            encode_component(member_id)
        );
        self.api.delete(&path, &Params::new())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardStickersApi<'a> {
    api: ResourceApi<'a>,
}

impl CardStickersApi<'_> {
    pub fn all(&self, id: &str, params: &Params) -> Result<Value> {
        self.api.get(&self.api.get_path(Some(id)), params)
    }

    /// `fields` must be drawn from `STICKER_FIELDS`; `"all"` returns every
    /// field.
    pub fn show(&self, id: &str, sticker_id: &str, fields: impl Into<Candidates>) -> Result<Value> {
        let fields = validate_allowed(STICKER_FIELDS, fields, "field")?;
        self.api.get(
            &self.api.child_path(id, sticker_id),
            &Params::new().with("fields", fields),
        )
    }

    /// Requires `image`, `left`, `top` and `zIndex`.
    pub fn create(&self, id: &str, params: &Params) -> Result<Value> {
        validate_required(&["image", "left", "top", "zIndex"], params)?;
        self.api.post(&self.api.get_path(Some(id)), params)
    }

    /// Needs one of `left`, `rotate`, `top` or `zIndex`.
    pub fn update(&self, id: &str, sticker_id: &str, params: &Params) -> Result<Value> {
        validate_at_least_one_of(&["left", "rotate", "top", "zIndex"], params)?;
        self.api.put(&self.api.child_path(id, sticker_id), params)
    }

    pub fn remove(&self, id: &str, sticker_id: &str) -> Result<Value> {
        self.api
            .delete(&self.api.child_path(id, sticker_id), &Params::new())
    }
}

impl CardApi<'_> {
    /// `cards/{id}`, for sub-resources whose endpoints sit on the card itself.
    fn item_path_of(id: &str) -> String {
        format!("{}/{}", CARD.path, encode_component(id))
    }
}
