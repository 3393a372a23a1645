//! Service layer: business logic orchestration.
//!
//! [`ModerationService`] coordinates the moderation API client, the
//! in-memory working copy and the local state files.

pub mod moderation_service;

pub use moderation_service::{BulkOutcome, ModerationService, RefreshOutcome};
