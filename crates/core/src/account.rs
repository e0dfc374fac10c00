//! Account profiles.

use serde::{Deserialize, Serialize};

use crate::types::{ProfileRole, UserId};

/// Profile row kept alongside each auth user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: ProfileRole,
}

impl Profile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ProfileRole::Admin
    }
}
