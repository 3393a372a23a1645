//! # moderation-console
//!
//! Backend of a moderation console for a classified-ads marketplace.
//!
//! The console keeps a working copy of the listings awaiting review,
//! answers the browser's filter/search/sort/paginate queries over it,
//! and relays moderators' decisions to the moderation API. Listing data
//! is owned upstream; the console only caches it.
//!
//! ## Architecture
//!
//! ```text
//! Browser console (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ModerationService (service/)
//!     │
//!     ├── ListingStore + query pipeline (domain/)
//!     ├── RequestSequencer (domain/)
//!     │
//!     ├── Moderation API client (upstream/)
//!     └── Local JSON state (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
