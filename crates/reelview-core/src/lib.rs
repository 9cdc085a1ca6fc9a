//! State layer for reelview.
//!
//! Wraps the catalog API in observable units: keyed resources with
//! last-request-wins ordering, a search unit, list/progress mutation units and
//! the home view that binds them to the current profile. Every unit publishes
//! its state on a `tokio::sync::watch` channel.
//!
//! Units are single-threaded (`Rc`, `Cell`); drive them from one task, e.g. a
//! current-thread runtime or a `LocalSet`.

/// Home view orchestrator.
pub mod home;

/// List and progress mutation units.
pub mod mutation;

/// Keyed data resources.
pub mod resource;

/// Search unit.
pub mod search;

/// Published state shapes.
pub mod snapshot;

pub use home::{DEFAULT_GENRES, HomeView, ListAction, Playback};
pub use mutation::{MutationState, MyListManager, ProgressTracker};
pub use resource::Resource;
pub use search::{SearchState, SearchUnit};
pub use snapshot::Snapshot;
