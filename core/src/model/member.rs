use crate::error::Result;
use crate::model::{domain_object, Board};
use crate::resources::{member, organization};

domain_object! {
    /// A member. Use `"me"` as the id for the authenticated member.
    Member => member::MEMBER
}

domain_object! {
    /// An organization (team). Read-only.
    Organization => organization::ORGANIZATION
}

impl<'a> Member<'a> {
    pub fn username(&self) -> Option<&str> {
        self.get_str("username")
    }

    pub fn set_username(&mut self, username: &str) -> Result<&mut Self> {
        self.inner.set("username", username)?;
        Ok(self)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.get_str("fullName")
    }

    pub fn set_full_name(&mut self, full_name: &str) -> Result<&mut Self> {
        self.inner.set("fullName", full_name)?;
        Ok(self)
    }

    pub fn initials(&self) -> Option<&str> {
        self.get_str("initials")
    }

    pub fn set_initials(&mut self, initials: &str) -> Result<&mut Self> {
        self.inner.set("initials", initials)?;
        Ok(self)
    }

    pub fn bio(&self) -> Option<&str> {
        self.get_str("bio")
    }

    pub fn set_bio(&mut self, bio: &str) -> Result<&mut Self> {
        self.inner.set("bio", bio)?;
        Ok(self)
    }

    pub fn avatar_source(&self) -> Option<&str> {
        self.get_str("avatarSource")
    }

    pub fn set_avatar_source(&mut self, source: &str) -> Result<&mut Self> {
        self.inner.set("avatarSource", source)?;
        Ok(self)
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn board_ids(&self) -> Vec<&str> {
        self.get_str_list("idBoards")
    }

    pub fn organization_ids(&self) -> Vec<&str> {
        self.get_str_list("idOrganizations")
    }

    /// Load every board the member belongs to.
    pub fn boards(&self) -> Result<Vec<Board<'a>>> {
        self.board_ids()
            .into_iter()
            .map(|id| Board::load(self.api().http(), id))
            .collect()
    }
}

impl<'a> Organization<'a> {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get_str("displayName")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("desc")
    }

    pub fn website(&self) -> Option<&str> {
        self.get_str("website")
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn board_ids(&self) -> Vec<&str> {
        self.get_str_list("idBoards")
    }

    pub fn boards(&self) -> Result<Vec<Board<'a>>> {
        self.board_ids()
            .into_iter()
            .map(|id| Board::load(self.api().http(), id))
            .collect()
    }
}
