//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::ApiResult;
use super::types::{
    Ack, Categories, ContentId, ContentItem, HealthStatus, MyListEntry, NewProfile, Profile,
    ProfileId, ProgressEntry, ProgressUpdate,
};

/// Catalog/user API trait.
///
/// Implemented by the HTTP client and by the offline mock catalog, so every
/// caller can run against either.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches the hero item (`GET /content/featured`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn featured(&self) -> ApiResult<Option<ContentItem>>;

    /// Fetches the trending row (`GET /content/trending`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn trending(&self) -> ApiResult<Vec<ContentItem>>;

    /// Fetches the popular row (`GET /content/popular`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn popular(&self) -> ApiResult<Vec<ContentItem>>;

    /// Fetches a genre row (`GET /content/genre/{genre}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn by_genre(&self, genre: &str) -> ApiResult<Vec<ContentItem>>;

    /// Searches the catalog (`GET /content/search?q=`). Results keep server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn search(&self, query: &str) -> ApiResult<Vec<ContentItem>>;

    /// Fetches a single item (`GET /content/{id}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn content_details(&self, id: &ContentId) -> ApiResult<Option<ContentItem>>;

    /// Fetches every category row at once (`GET /content/categories/all`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn all_categories(&self) -> ApiResult<Categories>;

    /// Lists viewer profiles (`GET /users/profiles`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn profiles(&self) -> ApiResult<Vec<Profile>>;

    /// Creates a viewer profile (`POST /users/profiles`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn create_profile(&self, profile: &NewProfile) -> ApiResult<Profile>;

    /// Fetches a profile's list (`GET /users/{profile}/my-list`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn my_list(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>>;

    /// Adds an item to a profile's list (`POST /users/{profile}/my-list`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn add_to_my_list(&self, profile_id: &ProfileId, entry: &MyListEntry) -> ApiResult<Ack>;

    /// Removes an item from a profile's list
    /// (`DELETE /users/{profile}/my-list/{content}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn remove_from_my_list(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
    ) -> ApiResult<Ack>;

    /// Fetches in-progress items (`GET /users/{profile}/continue-watching`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn continue_watching(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>>;

    /// Records viewing progress (`POST /users/{profile}/progress`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn create_progress(
        &self,
        profile_id: &ProfileId,
        progress: &ProgressEntry,
    ) -> ApiResult<Ack>;

    /// Updates viewing progress (`PUT /users/{profile}/progress/{content}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn update_progress(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
        update: &ProgressUpdate,
    ) -> ApiResult<Ack>;

    /// Liveness probe (`GET /health`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn health(&self) -> ApiResult<HealthStatus>;
}
