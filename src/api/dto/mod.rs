//! Data Transfer Objects for REST request/response serialization.
//!
//! Responses carry display labels next to the raw values so the browser
//! console renders exactly what the backend decided.

pub mod common_dto;
pub mod decision_dto;
pub mod listing_dto;
pub mod preference_dto;

pub use common_dto::*;
pub use decision_dto::*;
pub use listing_dto::*;
pub use preference_dto::*;
