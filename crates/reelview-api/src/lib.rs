//! API client library for reelview.
//!
//! Provides the catalog/user REST client, the wire types it exchanges and an
//! in-memory mock catalog that answers the same calls offline.

/// Catalog REST client.
pub mod catalog;

/// Offline mock catalog.
pub mod mock;
