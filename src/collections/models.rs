//! Record shapes for the scoped collections.
//!
//! Field names in the stored JSON are camelCase so profiles can be read
//! back regardless of which frontend wrote them.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// What kind of media a purchase refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

/// A display-cache field that may arrive after a record was created and is
/// back-filled asynchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedField {
    PosterPath(String),
    Rating(f64),
}

/// A record keyed by catalog subject inside one store+namespace.
pub trait ScopedRecord: Clone + Serialize + DeserializeOwned + Send + 'static {
    /// Natural key, unique within a store+namespace.
    fn subject_id(&self) -> u64;

    /// Cached poster path, if any.
    fn poster_path(&self) -> Option<&str>;

    /// Patches a late-arriving cached field. Returns true if the record
    /// changed.
    fn apply_cached(&mut self, field: &CachedField) -> bool;
}

macro_rules! impl_cached_fields {
    ($record:ty) => {
        impl ScopedRecord for $record {
            fn subject_id(&self) -> u64 {
                self.subject_id
            }

            fn poster_path(&self) -> Option<&str> {
                self.poster_path.as_deref()
            }

            fn apply_cached(&mut self, field: &CachedField) -> bool {
                match field {
                    CachedField::PosterPath(path) => {
                        if self.poster_path.as_deref() == Some(path.as_str()) {
                            false
                        } else {
                            self.poster_path = Some(path.clone());
                            true
                        }
                    }
                    CachedField::Rating(rating) => {
                        if self.rating == Some(*rating) {
                            false
                        } else {
                            self.rating = Some(*rating);
                            true
                        }
                    }
                }
            }
        }
    };
}

/// A favorited subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub subject_id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    /// Set once at creation, immutable afterwards.
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl FavoriteRecord {
    pub fn new(subject_id: u64, title: String, poster_path: Option<String>) -> Self {
        Self {
            subject_id,
            title,
            poster_path,
            added_at: Utc::now(),
            rating: None,
        }
    }
}

impl_cached_fields!(FavoriteRecord);

/// A subject saved for later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistRecord {
    pub subject_id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl WatchlistRecord {
    pub fn new(subject_id: u64, title: String, poster_path: Option<String>) -> Self {
        Self {
            subject_id,
            title,
            poster_path,
            added_at: Utc::now(),
            rating: None,
        }
    }
}

impl_cached_fields!(WatchlistRecord);

/// A purchased subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub subject_id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub purchased_at: DateTime<Utc>,
    /// Non-negative; callers own validation, loads only check shape.
    pub price: f64,
    pub media_kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl PurchaseRecord {
    pub fn new(
        subject_id: u64,
        title: String,
        poster_path: Option<String>,
        price: f64,
        media_kind: MediaKind,
    ) -> Self {
        Self {
            subject_id,
            title,
            poster_path,
            purchased_at: Utc::now(),
            price,
            media_kind,
            rating: None,
        }
    }
}

impl_cached_fields!(PurchaseRecord);
