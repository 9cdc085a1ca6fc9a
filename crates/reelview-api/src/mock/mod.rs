//! In-memory catalog answering `LocalCatalogApi` calls without a server.
//!
//! Mirrors the live service's observable behaviour: duplicate list entries
//! are rejected with HTTP 400, removing an absent entry is HTTP 404, and
//! continue-watching lists items with progress strictly between 0 and 100,
//! most recently watched first.

mod seed;

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use crate::catalog::{
    Ack, ApiError, ApiResult, Categories, ContentId, ContentItem, HealthStatus, LocalCatalogApi,
    MyListEntry, NewProfile, Profile, ProfileId, ProgressEntry, ProgressUpdate,
};

/// Maximum number of continue-watching entries.
const CONTINUE_WATCHING_LIMIT: usize = 20;

/// Genre rows included in `all_categories`.
const CATEGORY_GENRES: &[&str] = &["action", "horror", "comedy", "drama"];

/// Viewing progress held for one profile/content pair.
#[derive(Debug, Clone)]
struct ProgressRecord {
    content_id: ContentId,
    progress: f64,
    current_episode: Option<String>,
    time_left: Option<String>,
    /// Logical timestamp; higher is more recent.
    last_watched: u64,
}

/// Mutable catalog state.
#[derive(Debug)]
struct MockState {
    catalog: Vec<ContentItem>,
    featured: ContentId,
    rows: HashMap<&'static str, Vec<ContentId>>,
    profiles: Vec<Profile>,
    my_lists: HashMap<ProfileId, Vec<ContentId>>,
    progress: HashMap<ProfileId, Vec<ProgressRecord>>,
    clock: u64,
    offline: bool,
}

impl MockState {
    fn seeded() -> Self {
        let rows = seed::ROWS
            .iter()
            .map(|(name, ids)| (*name, ids.iter().copied().map(ContentId::from).collect()))
            .collect();

        let my_lists = seed::MY_LISTS
            .iter()
            .map(|(profile, ids)| {
                (
                    ProfileId::from(*profile),
                    ids.iter().copied().map(ContentId::from).collect(),
                )
            })
            .collect();

        let mut state = Self {
            catalog: seed::catalog(),
            featured: ContentId::from(seed::FEATURED_ID),
            rows,
            profiles: seed::profiles(),
            my_lists,
            progress: HashMap::new(),
            clock: 0,
            offline: false,
        };

        for (profile, content, pct, episode, time_left) in seed::PROGRESS {
            state.upsert_progress(
                &ProfileId::from(*profile),
                ContentId::from(*content),
                *pct,
                Some(String::from(*episode)),
                Some(String::from(*time_left)),
            );
        }
        state
    }

    fn item(&self, id: &ContentId) -> Option<&ContentItem> {
        self.catalog.iter().find(|item| &item.id == id)
    }

    fn items(&self, ids: &[ContentId]) -> Vec<ContentItem> {
        ids.iter().filter_map(|id| self.item(id)).cloned().collect()
    }

    fn by_genre(&self, genre: &str) -> Vec<ContentItem> {
        let genre = genre.trim();
        self.catalog
            .iter()
            .filter(|item| item.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
            .cloned()
            .collect()
    }

    fn record(&self, profile_id: &ProfileId, content_id: &ContentId) -> Option<&ProgressRecord> {
        self.progress
            .get(profile_id)?
            .iter()
            .find(|r| &r.content_id == content_id)
    }

    fn upsert_progress(
        &mut self,
        profile_id: &ProfileId,
        content_id: ContentId,
        progress: f64,
        current_episode: Option<String>,
        time_left: Option<String>,
    ) {
        self.clock = self.clock.saturating_add(1);
        let record = ProgressRecord {
            content_id,
            progress,
            current_episode,
            time_left,
            last_watched: self.clock,
        };
        let records = self.progress.entry(profile_id.clone()).or_default();
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.content_id == record.content_id)
        {
            *existing = record;
        } else {
            records.push(record);
        }
    }
}

/// Builds a `Http` error for a mock endpoint.
fn http_error(path: String, status: u16, detail: &str) -> ApiError {
    ApiError::Http {
        path,
        status,
        body: format!(r#"{{"detail":"{detail}"}}"#),
    }
}

/// Checks a percentage the way the live service's schema does (HTTP 422).
fn check_progress(path: &str, progress: f64) -> ApiResult<()> {
    if progress.is_finite() && (0.0..=100.0).contains(&progress) {
        Ok(())
    } else {
        Err(http_error(
            String::from(path),
            422,
            "progress must be within 0-100",
        ))
    }
}

/// Offline stand-in for the catalog service.
///
/// Answers immediately from static seed data; list and progress mutations
/// are kept in memory for the lifetime of the value.
#[derive(Debug)]
pub struct MockCatalog {
    state: Mutex<MockState>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockCatalog {
    /// Creates a catalog with the default rows, profiles, lists and progress.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            state: Mutex::new(MockState::seeded()),
        }
    }

    /// Simulates loss of connectivity: while offline every call fails with
    /// `ApiError::Network`.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Locks the state, failing if the catalog is offline.
    async fn state(&self, path: &str) -> ApiResult<MutexGuard<'_, MockState>> {
        let state = self.state.lock().await;
        if state.offline {
            return Err(ApiError::Network {
                path: String::from(path),
                message: String::from("mock catalog is offline"),
            });
        }
        tracing::debug!(path, "mock catalog request");
        Ok(state)
    }
}

impl LocalCatalogApi for MockCatalog {
    async fn featured(&self) -> ApiResult<Option<ContentItem>> {
        let state = self.state("/api/content/featured").await?;
        Ok(state.item(&state.featured).cloned())
    }

    async fn trending(&self) -> ApiResult<Vec<ContentItem>> {
        let state = self.state("/api/content/trending").await?;
        Ok(state
            .rows
            .get("trending")
            .map_or_else(Vec::new, |ids| state.items(ids)))
    }

    async fn popular(&self) -> ApiResult<Vec<ContentItem>> {
        let state = self.state("/api/content/popular").await?;
        Ok(state
            .rows
            .get("popular")
            .map_or_else(Vec::new, |ids| state.items(ids)))
    }

    async fn by_genre(&self, genre: &str) -> ApiResult<Vec<ContentItem>> {
        let state = self.state(&format!("/api/content/genre/{genre}")).await?;
        Ok(state.by_genre(genre))
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<ContentItem>> {
        let state = self.state("/api/content/search").await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(state
            .catalog
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item
                        .genres
                        .iter()
                        .any(|g| g.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn content_details(&self, id: &ContentId) -> ApiResult<Option<ContentItem>> {
        let state = self.state(&format!("/api/content/{id}")).await?;
        Ok(state.item(id).cloned())
    }

    async fn all_categories(&self) -> ApiResult<Categories> {
        let state = self.state("/api/content/categories/all").await?;
        let mut categories = Categories::new();
        for (name, ids) in &state.rows {
            categories.insert(String::from(*name), state.items(ids));
        }
        for genre in CATEGORY_GENRES {
            categories.insert(String::from(*genre), state.by_genre(genre));
        }
        Ok(categories)
    }

    async fn profiles(&self) -> ApiResult<Vec<Profile>> {
        let state = self.state("/api/users/profiles").await?;
        Ok(state.profiles.clone())
    }

    async fn create_profile(&self, profile: &NewProfile) -> ApiResult<Profile> {
        let path = "/api/users/profiles";
        let mut state = self.state(path).await?;
        if profile.name.trim().is_empty() {
            return Err(http_error(String::from(path), 422, "name must not be empty"));
        }
        let next_id = state
            .profiles
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let created = Profile {
            id: ProfileId::new(next_id.to_string()),
            name: profile.name.clone(),
            avatar: profile.avatar.clone(),
            is_kids: profile.is_kids,
        };
        state.profiles.push(created.clone());
        Ok(created)
    }

    async fn my_list(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>> {
        let state = self
            .state(&format!("/api/users/{profile_id}/my-list"))
            .await?;
        let ids = state.my_lists.get(profile_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| {
                let mut item = state.item(id)?.clone();
                item.progress = Some(state.record(profile_id, id).map_or(0.0, |r| r.progress));
                Some(item)
            })
            .collect())
    }

    async fn add_to_my_list(&self, profile_id: &ProfileId, entry: &MyListEntry) -> ApiResult<Ack> {
        let path = format!("/api/users/{profile_id}/my-list");
        let mut state = self.state(&path).await?;
        let known = state.item(&entry.content_id).is_some();
        let list = state.my_lists.entry(profile_id.clone()).or_default();
        if !known || list.contains(&entry.content_id) {
            return Err(http_error(
                path,
                400,
                "Content already in list or failed to add",
            ));
        }
        list.push(entry.content_id.clone());
        Ok(Ack::new("Added to my list successfully"))
    }

    async fn remove_from_my_list(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
    ) -> ApiResult<Ack> {
        let path = format!("/api/users/{profile_id}/my-list/{content_id}");
        let mut state = self.state(&path).await?;
        let list = state.my_lists.entry(profile_id.clone()).or_default();
        let before = list.len();
        list.retain(|id| id != content_id);
        if list.len() == before {
            return Err(http_error(path, 404, "Content not found in list"));
        }
        Ok(Ack::new("Removed from my list successfully"))
    }

    async fn continue_watching(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>> {
        let state = self
            .state(&format!("/api/users/{profile_id}/continue-watching"))
            .await?;
        let mut records: Vec<&ProgressRecord> = state
            .progress
            .get(profile_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.progress > 0.0 && r.progress < 100.0)
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));

        Ok(records
            .into_iter()
            .take(CONTINUE_WATCHING_LIMIT)
            .filter_map(|record| {
                let mut item = state.item(&record.content_id)?.clone();
                item.progress = Some(record.progress);
                item.episode_label.clone_from(&record.current_episode);
                item.time_left_label.clone_from(&record.time_left);
                Some(item)
            })
            .collect())
    }

    async fn create_progress(
        &self,
        profile_id: &ProfileId,
        progress: &ProgressEntry,
    ) -> ApiResult<Ack> {
        let path = format!("/api/users/{profile_id}/progress");
        let mut state = self.state(&path).await?;
        check_progress(&path, progress.progress)?;
        state.upsert_progress(
            profile_id,
            progress.content_id.clone(),
            progress.progress,
            progress.current_episode.clone(),
            progress.time_left.clone(),
        );
        Ok(Ack::new("Viewing progress created successfully"))
    }

    async fn update_progress(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
        update: &ProgressUpdate,
    ) -> ApiResult<Ack> {
        let path = format!("/api/users/{profile_id}/progress/{content_id}");
        let mut state = self.state(&path).await?;
        if let Some(pct) = update.progress {
            check_progress(&path, pct)?;
        }

        let merged = if let Some(existing) = state.record(profile_id, content_id) {
            (
                update.progress.unwrap_or(existing.progress),
                update
                    .current_episode
                    .clone()
                    .or_else(|| existing.current_episode.clone()),
                update
                    .time_left
                    .clone()
                    .or_else(|| existing.time_left.clone()),
            )
        } else if state.item(content_id).is_some() {
            (
                update.progress.unwrap_or(0.0),
                update.current_episode.clone(),
                update.time_left.clone(),
            )
        } else {
            return Err(http_error(path, 400, "Failed to update viewing progress"));
        };

        let (pct, episode, time_left) = merged;
        state.upsert_progress(profile_id, content_id.clone(), pct, episode, time_left);
        Ok(Ack::new("Viewing progress updated successfully"))
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        let _state = self.state("/api/health").await?;
        Ok(HealthStatus {
            status: String::from("healthy"),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn john() -> ProfileId {
        ProfileId::from("1")
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_seeded_profiles() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let profiles = catalog.profiles().await.unwrap();

        // Assert
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["John", "Sarah", "Kids"]);
        assert!(profiles[2].is_kids);
    }

    #[tokio::test]
    async fn test_rows_keep_display_order() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let trending = catalog.trending().await.unwrap();
        let popular = catalog.popular().await.unwrap();
        let featured = catalog.featured().await.unwrap().unwrap();

        // Assert
        assert_eq!(ids(&trending), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(ids(&popular), vec!["7", "8", "9", "10", "11", "12"]);
        assert_eq!(featured.title, "Stranger Things");
        assert!(featured.backdrop.is_some());
    }

    #[tokio::test]
    async fn test_search_matches_title_or_genre_case_insensitively() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let witcher = catalog.search("WiTcHeR").await.unwrap();
        let fantasy = catalog.search("fantasy").await.unwrap();
        let blank = catalog.search("   ").await.unwrap();

        // Assert
        assert_eq!(ids(&witcher), vec!["1"]);
        assert_eq!(ids(&fantasy), vec!["1", "4"]);
        assert!(blank.is_empty());
    }

    #[tokio::test]
    async fn test_by_genre_matches_whole_genre_name() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let horror = catalog.by_genre("horror").await.unwrap();

        // Assert
        assert_eq!(ids(&horror), vec!["2", "19", "20", "23", "24", "25"]);
    }

    #[tokio::test]
    async fn test_add_then_duplicate_is_rejected() {
        // Arrange
        let catalog = MockCatalog::seeded();
        let witcher = catalog
            .content_details(&ContentId::from(1))
            .await
            .unwrap()
            .unwrap();
        let entry = MyListEntry::for_item(&witcher);

        // Act
        let first = catalog.add_to_my_list(&john(), &entry).await;
        let second = catalog.add_to_my_list(&john(), &entry).await;
        let list = catalog.my_list(&john()).await.unwrap();

        // Assert
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err().status(), Some(400));
        assert_eq!(ids(&list).iter().filter(|id| **id == "1").count(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_not_found() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let removed = catalog
            .remove_from_my_list(&john(), &ContentId::from(7))
            .await;
        let again = catalog
            .remove_from_my_list(&john(), &ContentId::from(7))
            .await;
        let list = catalog.my_list(&john()).await.unwrap();

        // Assert
        assert!(removed.is_ok());
        assert_eq!(again.unwrap_err().status(), Some(404));
        assert!(!ids(&list).contains(&"7"));
    }

    #[tokio::test]
    async fn test_my_list_carries_progress() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let list = catalog.my_list(&john()).await.unwrap();

        // Assert
        assert_eq!(ids(&list), vec!["25", "7"]);
        assert_eq!(list[0].progress.map(f64::round), Some(75.0));
        assert_eq!(list[1].progress.map(f64::round), Some(0.0));
    }

    #[tokio::test]
    async fn test_continue_watching_most_recent_first() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let items = catalog.continue_watching(&john()).await.unwrap();
        let kids = catalog
            .continue_watching(&ProfileId::from("3"))
            .await
            .unwrap();

        // Assert
        assert_eq!(ids(&items), vec!["25", "1", "8"]);
        assert_eq!(items[0].episode_label.as_deref(), Some("S4 E8"));
        assert!(kids.is_empty());
    }

    #[tokio::test]
    async fn test_progress_upsert_moves_item_to_front() {
        // Arrange
        let catalog = MockCatalog::seeded();
        let crown = catalog
            .content_details(&ContentId::from(8))
            .await
            .unwrap()
            .unwrap();

        // Act
        catalog
            .create_progress(&john(), &ProgressEntry::for_item(&crown, 65.0).unwrap())
            .await
            .unwrap();
        let items = catalog.continue_watching(&john()).await.unwrap();

        // Assert
        assert_eq!(ids(&items), vec!["8", "25", "1"]);
    }

    #[tokio::test]
    async fn test_finished_progress_leaves_continue_watching() {
        // Arrange
        let catalog = MockCatalog::seeded();
        let update = ProgressUpdate {
            progress: Some(100.0),
            ..ProgressUpdate::default()
        };

        // Act
        catalog
            .update_progress(&john(), &ContentId::from(1), &update)
            .await
            .unwrap();
        let items = catalog.continue_watching(&john()).await.unwrap();

        // Assert
        assert_eq!(ids(&items), vec!["25", "8"]);
    }

    #[tokio::test]
    async fn test_update_progress_unknown_content_fails() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let result = catalog
            .update_progress(
                &john(),
                &ContentId::from("missing"),
                &ProgressUpdate::default(),
            )
            .await;

        // Assert
        assert_eq!(result.unwrap_err().status(), Some(400));
    }

    #[tokio::test]
    async fn test_create_profile_assigns_next_id() {
        // Arrange
        let catalog = MockCatalog::seeded();
        let new = NewProfile {
            name: String::from("Grandma"),
            avatar: String::from("g.png"),
            is_kids: false,
        };

        // Act
        let created = catalog.create_profile(&new).await.unwrap();
        let profiles = catalog.profiles().await.unwrap();

        // Assert
        assert_eq!(created.id.as_str(), "4");
        assert_eq!(profiles.len(), 4);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        // Arrange
        let catalog = MockCatalog::seeded();
        catalog.set_offline(true).await;

        // Act
        let result = catalog.trending().await;

        // Assert
        assert!(matches!(result, Err(ApiError::Network { .. })));
        catalog.set_offline(false).await;
        assert!(catalog.trending().await.is_ok());
    }

    #[tokio::test]
    async fn test_all_categories() {
        // Arrange
        let catalog = MockCatalog::seeded();

        // Act
        let categories = catalog.all_categories().await.unwrap();

        // Assert
        assert_eq!(categories["trending"].len(), 6);
        assert!(categories.contains_key("comedy"));
        assert!(catalog.health().await.unwrap().is_healthy());
    }
}
