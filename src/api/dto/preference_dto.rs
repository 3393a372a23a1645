//! Preference DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Theme;

/// Body of `GET`/`PUT /preferences/theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ThemeDto {
    /// Active colour theme.
    pub theme: Theme,
}
