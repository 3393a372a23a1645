//! Identity of the moderator using the console.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The signed-in moderator, as reported by the moderation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Moderator {
    /// Moderator identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Avatar image URL, if set.
    #[serde(default)]
    pub avatar_url: Option<String>,
}
