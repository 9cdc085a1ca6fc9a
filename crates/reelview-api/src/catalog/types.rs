//! Catalog API request/response types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{ApiError, ApiResult};

/// Accepts an identifier sent either as a JSON string or a JSON number.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

// --- Identifiers ---

/// Content identifier.
///
/// The live service issues UUID strings while the offline catalog uses small
/// integers; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(#[serde(deserialize_with = "text_or_number")] String);

impl ContentId {
    /// Creates an identifier from text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u32> for ContentId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// Profile identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(#[serde(deserialize_with = "text_or_number")] String);

impl ProfileId {
    /// Creates an identifier from text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// --- Content ---

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Feature film.
    Movie,
    /// Episodic series (`tv` on the user endpoints).
    #[serde(alias = "tv")]
    Series,
}

impl ContentType {
    /// Name used in `content_type` fields of user-endpoint payloads.
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_api_name<S>(kind: &ContentType, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(kind.api_name())
}

/// A catalog entry as shown in rows, search results and lists.
///
/// Optional fields differ by source: continue-watching entries carry
/// progress and episode labels, plain rows do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Display identity.
    pub id: ContentId,
    /// TMDB ID, forwarded on mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    /// Title.
    pub title: String,
    /// Poster image URL.
    #[serde(default)]
    pub image: String,
    /// Backdrop image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,
    /// Title logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Movie or series.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Age rating (e.g. "TV-MA").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Release year.
    #[serde(default)]
    pub year: String,
    /// Genre names, in display order.
    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,
    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Season summary (e.g. "4 Seasons").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<String>,
    /// Externally hosted trailer URL.
    #[serde(rename = "trailerUrl", default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    /// Average vote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Popularity score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Watched percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Episode label (e.g. "S4 E8").
    #[serde(rename = "episode", default, skip_serializing_if = "Option::is_none")]
    pub episode_label: Option<String>,
    /// Remaining time label (e.g. "15 min left").
    #[serde(rename = "timeLeft", default, skip_serializing_if = "Option::is_none")]
    pub time_left_label: Option<String>,
}

/// Content grouped by category name (`/content/categories/all`).
pub type Categories = BTreeMap<String, Vec<ContentItem>>;

// --- Profiles ---

/// A viewer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile ID.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    /// Kids profile flag.
    #[serde(default, alias = "isKids")]
    pub is_kids: bool,
}

/// Request body for `POST /users/profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    pub avatar: String,
    /// Kids profile flag.
    #[serde(default)]
    pub is_kids: bool,
}

// --- My list / progress ---

/// Request body for `POST /users/{profile}/my-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyListEntry {
    /// Content ID.
    pub content_id: ContentId,
    /// TMDB ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    /// `"tv"` or `"movie"`.
    #[serde(serialize_with = "serialize_api_name")]
    pub content_type: ContentType,
}

impl MyListEntry {
    /// Builds the entry for a catalog item.
    #[must_use]
    pub fn for_item(item: &ContentItem) -> Self {
        Self {
            content_id: item.id.clone(),
            tmdb_id: item.tmdb_id,
            content_type: item.content_type,
        }
    }
}

/// Checks that a watched percentage lies within 0-100.
fn check_percentage(progress: f64) -> ApiResult<f64> {
    if progress.is_finite() && (0.0..=100.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(ApiError::validation(format!(
            "progress must be within 0-100, got {progress}"
        )))
    }
}

/// Request body for `POST /users/{profile}/progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Content ID.
    pub content_id: ContentId,
    /// TMDB ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    /// `"tv"` or `"movie"`.
    #[serde(serialize_with = "serialize_api_name")]
    pub content_type: ContentType,
    /// Watched percentage (0-100).
    pub progress: f64,
    /// Episode label.
    #[serde(default)]
    pub current_episode: Option<String>,
    /// Remaining time label.
    #[serde(default)]
    pub time_left: Option<String>,
}

impl ProgressEntry {
    /// Builds a progress entry for a catalog item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if `progress` is outside 0-100.
    pub fn for_item(item: &ContentItem, progress: f64) -> ApiResult<Self> {
        Ok(Self {
            content_id: item.id.clone(),
            tmdb_id: item.tmdb_id,
            content_type: item.content_type,
            progress: check_percentage(progress)?,
            current_episode: item.episode_label.clone(),
            time_left: item.time_left_label.clone(),
        })
    }
}

/// Request body for `PUT /users/{profile}/progress/{content}`.
///
/// Absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Watched percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Episode label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_episode: Option<String>,
    /// Season number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    /// Episode number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
    /// Remaining time label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<String>,
}

impl ProgressUpdate {
    /// Checks the percentage, if one is set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if `progress` is outside 0-100.
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(progress) = self.progress {
            check_percentage(progress)?;
        }
        Ok(())
    }
}

// --- Misc responses ---

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: String,
}

impl Ack {
    /// Creates an acknowledgement.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response from `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` when the service is live.
    pub status: String,
}

impl HealthStatus {
    /// Returns `true` when the service reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
