use uuid::Uuid;

use crate::{Error, STUB_UUID};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Sent by the admin CLI to provision an account. Regular signup is handled
/// by the backend's own flow and never goes through this type.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub id: UserId,
    pub display_name: String,
    pub initial_password_hash: String,
}

impl NewUser {
    pub fn new(id: UserId, display_name: String, initial_password_hash: String) -> NewUser {
        NewUser {
            id,
            display_name,
            initial_password_hash,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.display_name)?;
        crate::validate_string(&self.initial_password_hash)?;
        if self.display_name.is_empty() {
            return Err(Error::InvalidName(self.display_name.clone()));
        }
        Ok(())
    }
}
