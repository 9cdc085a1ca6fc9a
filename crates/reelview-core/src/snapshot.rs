//! Snapshot type published by resources.

use reelview_api::catalog::ApiError;

/// Current state of one resource.
///
/// While `loading` is set, `data` and `error` still describe the previous
/// fetch; a refresh never empties them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Last successfully fetched value.
    pub data: Option<T>,
    /// A fetch is in flight.
    pub loading: bool,
    /// Failure of the last completed fetch.
    pub error: Option<ApiError>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Snapshot<T> {
    /// Returns `true` once a fetch has completed successfully at least once
    /// for the current key.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Marks a fetch as started.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies a completed fetch. A failure keeps the previous `data`.
    pub(crate) fn complete(&mut self, result: Result<T, ApiError>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
    }
}
