//! Home screen state: content rows bound to the current profile.
#![allow(clippy::future_not_send)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::join_all;
use reelview_api::catalog::{ContentId, ContentItem, LocalCatalogApi, Profile, ProfileId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::mutation::{MyListManager, ProgressTracker};
use crate::resource::Resource;
use crate::search::SearchUnit;

/// Genre rows shown when none are configured.
pub const DEFAULT_GENRES: &[&str] = &["action", "horror"];

/// Progress recorded when a trailer starts playing.
const TRAILER_START_PROGRESS: f64 = 5.0;

/// Rows keyed by the selected profile; `None` until one is chosen.
type ProfileRow = Resource<Option<ProfileId>, Vec<ContentItem>>;

/// Outcome of a "my list" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    /// The item was added and the list refreshed.
    Added,
    /// The item is already in the list; nothing was sent.
    AlreadyListed,
    /// The item was removed and the list refreshed.
    Removed,
    /// The API rejected the change.
    Failed,
    /// No profile is selected.
    NoProfile,
}

/// Trailer currently open in the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    /// Item being played.
    pub item: ContentItem,
    /// Trailer URL handed to the external player.
    pub trailer_url: String,
}

/// Home view orchestrator.
///
/// Owns one resource per row and re-keys the profile rows (my list,
/// continue watching) whenever the current profile changes. Mutations go
/// through the mutation units; the affected row is refetched on success.
#[derive(Debug)]
pub struct HomeView<C> {
    featured: Resource<(), Option<ContentItem>>,
    trending: Resource<(), Vec<ContentItem>>,
    popular: Resource<(), Vec<ContentItem>>,
    genre_rows: Vec<Resource<String, Vec<ContentItem>>>,
    profiles: Resource<(), Vec<Profile>>,
    my_list: ProfileRow,
    continue_watching: ProfileRow,
    search: SearchUnit<C>,
    list_manager: MyListManager<C>,
    /// Adds sent but not yet reflected in `my_list`.
    pending_adds: RefCell<HashSet<ContentId>>,
    progress: ProgressTracker<C>,
    current_profile: watch::Sender<Option<Profile>>,
    playback: watch::Sender<Option<Playback>>,
}

impl<C: LocalCatalogApi + 'static> HomeView<C> {
    /// Builds the view over `api` with one row per entry in `genres`.
    /// Nothing is fetched until [`Self::load`].
    pub fn new<I, S>(api: Rc<C>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let genre_rows = genres
            .into_iter()
            .map(|genre| {
                let api = Rc::clone(&api);
                Resource::new("genre", genre.into(), move |genre: &String| {
                    let api = Rc::clone(&api);
                    let genre = genre.clone();
                    async move { api.by_genre(&genre).await }.boxed_local()
                })
            })
            .collect();

        Self {
            featured: unkeyed(&api, "featured", |api| async move { api.featured().await }),
            trending: unkeyed(&api, "trending", |api| async move { api.trending().await }),
            popular: unkeyed(&api, "popular", |api| async move { api.popular().await }),
            genre_rows,
            profiles: unkeyed(&api, "profiles", |api| async move { api.profiles().await }),
            my_list: profile_row(&api, "my_list", |api, id| async move {
                api.my_list(&id).await
            }),
            continue_watching: profile_row(&api, "continue_watching", |api, id| async move {
                api.continue_watching(&id).await
            }),
            search: SearchUnit::new(Rc::clone(&api)),
            list_manager: MyListManager::new(Rc::clone(&api)),
            pending_adds: RefCell::new(HashSet::new()),
            progress: ProgressTracker::new(api),
            current_profile: watch::Sender::new(None),
            playback: watch::Sender::new(None),
        }
    }

    /// Builds the view with the [`DEFAULT_GENRES`] rows.
    pub fn with_default_genres(api: Rc<C>) -> Self {
        Self::new(api, DEFAULT_GENRES.iter().copied())
    }

    /// Loads every row concurrently. Once profiles arrive and no profile is
    /// selected yet, the first one becomes current.
    pub async fn load(&self) {
        let profiles = async {
            self.profiles.refetch().await;
            self.resolve_default_profile().await;
        };
        futures::join!(
            self.featured.refetch(),
            self.trending.refetch(),
            self.popular.refetch(),
            join_all(self.genre_rows.iter().map(Resource::refetch)),
            profiles,
        );
    }

    async fn resolve_default_profile(&self) {
        if self.current_profile.borrow().is_some() {
            return;
        }
        let first = self
            .profiles
            .data()
            .and_then(|profiles| profiles.into_iter().next());
        if let Some(profile) = first {
            info!(profile = %profile.name, "default profile selected");
            self.select_profile(profile).await;
        }
    }

    /// Makes `profile` current and reloads the rows that depend on it.
    /// The previous profile's rows are dropped, not merged.
    pub async fn select_profile(&self, profile: Profile) {
        let id = profile.id.clone();
        debug!(profile = %profile.name, id = %id, "profile selected");
        self.current_profile.send_replace(Some(profile));
        futures::join!(
            self.my_list.set_key(Some(id.clone())),
            self.continue_watching.set_key(Some(id)),
        );
    }

    /// Returns the current profile.
    pub fn current_profile(&self) -> Option<Profile> {
        self.current_profile.borrow().clone()
    }

    /// Subscribes to profile changes.
    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.current_profile.subscribe()
    }

    fn current_profile_id(&self) -> Option<ProfileId> {
        self.current_profile
            .borrow()
            .as_ref()
            .map(|profile| profile.id.clone())
    }

    /// Returns `true` if the loaded list for the current profile holds `id`.
    pub fn is_listed(&self, id: &ContentId) -> bool {
        self.my_list
            .snapshot()
            .data
            .is_some_and(|items| items.iter().any(|item| &item.id == id))
    }

    /// Adds `item` to the current profile's list.
    ///
    /// An item already in the loaded list, or one whose add is still in
    /// flight, is not sent again.
    pub async fn add_to_my_list(&self, item: &ContentItem) -> ListAction {
        let Some(profile_id) = self.current_profile_id() else {
            return ListAction::NoProfile;
        };
        if self.is_listed(&item.id) || !self.pending_adds.borrow_mut().insert(item.id.clone()) {
            debug!(content = %item.id, "already in my list");
            return ListAction::AlreadyListed;
        }
        let _pending = PendingAdd {
            adds: &self.pending_adds,
            id: &item.id,
        };
        if !self.list_manager.add(&profile_id, item).await {
            return ListAction::Failed;
        }
        self.my_list.refetch().await;
        ListAction::Added
    }

    /// Removes `content_id` from the current profile's list.
    pub async fn remove_from_my_list(&self, content_id: &ContentId) -> ListAction {
        let Some(profile_id) = self.current_profile_id() else {
            return ListAction::NoProfile;
        };
        if !self.list_manager.remove(&profile_id, content_id).await {
            return ListAction::Failed;
        }
        self.my_list.refetch().await;
        ListAction::Removed
    }

    /// Opens the trailer player for `item` and, with a profile selected,
    /// records that viewing started. Returns `false` if the item has no
    /// trailer.
    pub async fn play_trailer(&self, item: &ContentItem) -> bool {
        let Some(trailer_url) = item
            .trailer_url
            .clone()
            .filter(|url| !url.trim().is_empty())
        else {
            debug!(content = %item.id, "no trailer available");
            return false;
        };
        self.playback.send_replace(Some(Playback {
            item: item.clone(),
            trailer_url,
        }));

        if let Some(profile_id) = self.current_profile_id()
            && self
                .progress
                .create(&profile_id, item, TRAILER_START_PROGRESS)
                .await
        {
            self.continue_watching.refetch().await;
        }
        true
    }

    /// Closes the trailer player.
    pub fn close_player(&self) {
        self.playback.send_replace(None);
    }

    /// Returns the trailer currently open, if any.
    pub fn playback(&self) -> Option<Playback> {
        self.playback.borrow().clone()
    }

    /// Subscribes to player changes.
    pub fn subscribe_playback(&self) -> watch::Receiver<Option<Playback>> {
        self.playback.subscribe()
    }

    /// Retries the hero row.
    pub async fn refresh_featured(&self) {
        self.featured.refetch().await;
    }

    /// Searches the catalog; a blank query leaves search mode.
    pub async fn search(&self, query: &str) {
        self.search.search(query).await;
    }

    /// Leaves search mode.
    pub fn close_search(&self) {
        self.search.clear();
    }

    /// Returns `true` while a non-blank search query is set.
    pub fn is_searching(&self) -> bool {
        self.search.state().is_active()
    }

    /// Hero row.
    pub const fn featured(&self) -> &Resource<(), Option<ContentItem>> {
        &self.featured
    }

    /// Trending row.
    pub const fn trending(&self) -> &Resource<(), Vec<ContentItem>> {
        &self.trending
    }

    /// Popular row.
    pub const fn popular(&self) -> &Resource<(), Vec<ContentItem>> {
        &self.popular
    }

    /// Genre rows, in configured order. Each row's key is its genre.
    pub fn genre_rows(&self) -> &[Resource<String, Vec<ContentItem>>] {
        &self.genre_rows
    }

    /// Profile list.
    pub const fn profiles(&self) -> &Resource<(), Vec<Profile>> {
        &self.profiles
    }

    /// Current profile's list.
    pub const fn my_list(&self) -> &ProfileRow {
        &self.my_list
    }

    /// Current profile's in-progress items.
    pub const fn continue_watching(&self) -> &ProfileRow {
        &self.continue_watching
    }

    /// Search unit.
    pub const fn search_unit(&self) -> &SearchUnit<C> {
        &self.search
    }

    /// "My list" mutation unit.
    pub const fn list_manager(&self) -> &MyListManager<C> {
        &self.list_manager
    }

    /// Viewing-progress mutation unit.
    pub const fn progress_tracker(&self) -> &ProgressTracker<C> {
        &self.progress
    }
}

/// Releases an in-flight add once it completes or is dropped.
struct PendingAdd<'a> {
    adds: &'a RefCell<HashSet<ContentId>>,
    id: &'a ContentId,
}

impl Drop for PendingAdd<'_> {
    fn drop(&mut self) {
        self.adds.borrow_mut().remove(self.id);
    }
}

/// Builds a row with no dependency key.
fn unkeyed<C, T, F, Fut>(api: &Rc<C>, name: &'static str, fetch: F) -> Resource<(), T>
where
    C: 'static,
    T: Clone + 'static,
    F: Fn(Rc<C>) -> Fut + 'static,
    Fut: Future<Output = reelview_api::catalog::ApiResult<T>> + 'static,
{
    let api = Rc::clone(api);
    Resource::new(name, (), move |(): &()| fetch(Rc::clone(&api)).boxed_local())
}

/// Builds a row keyed by profile. Without a profile it is empty and no
/// request is made.
fn profile_row<C, F, Fut>(api: &Rc<C>, name: &'static str, fetch: F) -> ProfileRow
where
    C: 'static,
    F: Fn(Rc<C>, ProfileId) -> Fut + 'static,
    Fut: Future<Output = reelview_api::catalog::ApiResult<Vec<ContentItem>>> + 'static,
{
    let api = Rc::clone(api);
    Resource::new(name, None, move |profile: &Option<ProfileId>| {
        match profile.clone() {
            Some(id) => fetch(Rc::clone(&api), id).boxed_local(),
            None => futures::future::ready(Ok(Vec::new())).boxed_local(),
        }
    })
}
