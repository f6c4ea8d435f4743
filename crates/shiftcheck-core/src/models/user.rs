use serde::{Deserialize, Serialize};

/// A technician account, either the logged-in user or an entry of the
/// active-users listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct UserIdentity {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(rename(deserialize = "fullname"), default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename(deserialize = "isactive"), default)]
    pub is_active: bool,
}

impl UserIdentity {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.full_name, self.username)
    }
}
