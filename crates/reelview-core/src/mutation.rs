//! Fire-and-confirm mutations for "my list" and viewing progress.
//!
//! Each unit reports `true`/`false` and never returns an error to the
//! caller; failures are logged once at WARN and kept in [`MutationState`].
//! Refreshing any affected resource is the caller's job.
#![allow(clippy::future_not_send)]

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use reelview_api::catalog::{
    Ack, ApiError, ApiResult, ContentId, ContentItem, LocalCatalogApi, MyListEntry, ProfileId,
    ProgressEntry, ProgressUpdate,
};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Published state of a mutation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    /// A mutation is in flight.
    pub loading: bool,
    /// Failure of the last mutation.
    pub error: Option<ApiError>,
}

/// State shared by the calls of one mutation unit.
///
/// `loading` stays set while any call is in flight; `error` belongs to the
/// call that finished last.
#[derive(Debug)]
struct MutationStatus {
    state: watch::Sender<MutationState>,
    in_flight: Cell<usize>,
}

impl MutationStatus {
    fn new() -> Self {
        Self {
            state: watch::Sender::new(MutationState::default()),
            in_flight: Cell::new(0),
        }
    }

    fn current(&self) -> MutationState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    fn is_busy(&self) -> bool {
        self.in_flight.get() > 0
    }

    /// Runs one mutation call, publishing its progress.
    async fn track<F>(&self, action: &'static str, call: F) -> bool
    where
        F: Future<Output = ApiResult<Ack>>,
    {
        let result = {
            let _in_flight = InFlight::enter(self);
            call.await
        };
        match result {
            Ok(ack) => {
                debug!(action, message = %ack.message, "mutation succeeded");
                let loading = self.is_busy();
                self.state.send_modify(|state| {
                    state.loading = loading;
                    state.error = None;
                });
                true
            }
            Err(err) => self.reject(action, err),
        }
    }

    /// Records a failed mutation.
    fn reject(&self, action: &'static str, err: ApiError) -> bool {
        warn!(action, error = %err, "mutation failed");
        let loading = self.is_busy();
        self.state.send_modify(|state| {
            state.loading = loading;
            state.error = Some(err);
        });
        false
    }
}

/// One call in flight. Leaving, including by cancellation, clears
/// `loading` once no other call is pending.
struct InFlight<'a>(&'a MutationStatus);

impl<'a> InFlight<'a> {
    fn enter(status: &'a MutationStatus) -> Self {
        status.in_flight.set(status.in_flight.get() + 1);
        status.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        Self(status)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let status = self.0;
        status.in_flight.set(status.in_flight.get().saturating_sub(1));
        let loading = status.is_busy();
        status
            .state
            .send_if_modified(|state| std::mem::replace(&mut state.loading, loading) != loading);
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Adds and removes "my list" entries.
#[derive(Debug)]
pub struct MyListManager<C> {
    api: Rc<C>,
    status: MutationStatus,
}

impl<C: LocalCatalogApi> MyListManager<C> {
    /// Creates an idle manager.
    pub fn new(api: Rc<C>) -> Self {
        Self {
            api,
            status: MutationStatus::new(),
        }
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> MutationState {
        self.status.current()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.status.subscribe()
    }

    /// Adds `item` to the profile's list.
    pub async fn add(&self, profile_id: &ProfileId, item: &ContentItem) -> bool {
        if blank(profile_id.as_str()) || blank(item.id.as_str()) {
            return self.status.reject(
                "add to my list",
                ApiError::validation("profile and content IDs are required"),
            );
        }
        let entry = MyListEntry::for_item(item);
        self.status
            .track("add to my list", self.api.add_to_my_list(profile_id, &entry))
            .await
    }

    /// Removes `content_id` from the profile's list.
    pub async fn remove(&self, profile_id: &ProfileId, content_id: &ContentId) -> bool {
        if blank(profile_id.as_str()) || blank(content_id.as_str()) {
            return self.status.reject(
                "remove from my list",
                ApiError::validation("profile and content IDs are required"),
            );
        }
        self.status
            .track(
                "remove from my list",
                self.api.remove_from_my_list(profile_id, content_id),
            )
            .await
    }
}

/// Records viewing progress.
#[derive(Debug)]
pub struct ProgressTracker<C> {
    api: Rc<C>,
    status: MutationStatus,
}

impl<C: LocalCatalogApi> ProgressTracker<C> {
    /// Creates an idle tracker.
    pub fn new(api: Rc<C>) -> Self {
        Self {
            api,
            status: MutationStatus::new(),
        }
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> MutationState {
        self.status.current()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.status.subscribe()
    }

    /// Creates (or replaces) the progress record for `item`.
    pub async fn create(&self, profile_id: &ProfileId, item: &ContentItem, progress: f64) -> bool {
        if blank(profile_id.as_str()) {
            return self
                .status
                .reject("create progress", ApiError::validation("profile ID is required"));
        }
        let entry = match ProgressEntry::for_item(item, progress) {
            Ok(entry) => entry,
            Err(err) => return self.status.reject("create progress", err),
        };
        self.status
            .track("create progress", self.api.create_progress(profile_id, &entry))
            .await
    }

    /// Updates the progress record for `content_id`; unset fields are kept.
    pub async fn update(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
        update: &ProgressUpdate,
    ) -> bool {
        if blank(profile_id.as_str()) || blank(content_id.as_str()) {
            return self.status.reject(
                "update progress",
                ApiError::validation("profile and content IDs are required"),
            );
        }
        if let Err(err) = update.validate() {
            return self.status.reject("update progress", err);
        }
        self.status
            .track(
                "update progress",
                self.api.update_progress(profile_id, content_id, update),
            )
            .await
    }
}
