//! Poster and rating back-fill for purchases recorded without display data.
//!
//! The subject id alone does not say whether a purchase is a movie or a
//! series, so the catalog is asked movie-first and series only when the
//! movie lookup fails.

use super::models::CachedField;
use super::purchases::PurchasesStore;
use crate::catalog::{CatalogClient, SubjectDetails};
use std::sync::Arc;
use tracing::debug;

pub struct PosterBackfill {
    catalog: Arc<dyn CatalogClient>,
}

impl PosterBackfill {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Fills in missing posters across the store's current namespace.
    /// Returns how many records were patched. Lookups that fail on both
    /// paths are skipped; the record stays eligible for a later run.
    pub async fn run(&self, purchases: &PurchasesStore) -> usize {
        let mut patched = 0;
        for record in purchases.missing_posters() {
            let details = match self.lookup(record.subject_id).await {
                Some(details) => details,
                None => {
                    debug!("No catalog details for subject {}", record.subject_id);
                    continue;
                }
            };

            // The field may have been populated while the lookup was in
            // flight; update_cached_field re-checks before writing.
            let current = match purchases.get(record.subject_id) {
                Some(current) => current,
                None => continue,
            };
            if current.poster_path.is_some() {
                continue;
            }

            if let Some(poster) = details.poster_path {
                purchases
                    .update_cached_field(record.subject_id, &CachedField::PosterPath(poster));
                patched += 1;
            }
            if let Some(rating) = details.vote_average {
                purchases.update_cached_field(record.subject_id, &CachedField::Rating(rating));
            }
        }
        patched
    }

    async fn lookup(&self, subject_id: u64) -> Option<SubjectDetails> {
        match self.catalog.movie_details(subject_id).await {
            Ok(details) => Some(details),
            Err(err) => {
                debug!("Movie lookup failed for {}, trying series: {}", subject_id, err);
                self.catalog.series_details(subject_id).await.ok()
            }
        }
    }
}
