//! Catalog detail retrieval boundary.
//!
//! The engine only needs subject details for the poster/rating back-fill;
//! browsing and search stay with the presentation layer.

mod tmdb;

pub use tmdb::TmdbClient;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Subject details as returned by the catalog, reduced to the fields the
/// back-fill cares about. Movies carry `title`, series carry `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

impl SubjectDetails {
    /// Display title regardless of media kind.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// Client for the public catalog API.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch details for a subject assuming it is a movie.
    async fn movie_details(&self, subject_id: u64) -> Result<SubjectDetails>;

    /// Fetch details for a subject assuming it is a series.
    async fn series_details(&self, subject_id: u64) -> Result<SubjectDetails>;
}
