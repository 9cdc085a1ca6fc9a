//! Catalog REST client module.
//!
//! Talks to the `/api` service for content rows, search, profiles,
//! "my list" membership and viewing progress.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use types::{
    Ack, Categories, ContentId, ContentItem, ContentType, HealthStatus, MyListEntry, NewProfile,
    Profile, ProfileId, ProgressEntry, ProgressUpdate,
};
