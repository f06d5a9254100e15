//! Per-identity scoped collections: favorites, watchlist, purchases.

pub mod backfill;
pub mod favorites;
pub mod models;
pub mod purchases;
pub mod store;
pub mod watchlist;

pub use backfill::PosterBackfill;
pub use favorites::FavoritesStore;
pub use models::{
    CachedField, FavoriteRecord, MediaKind, PurchaseRecord, ScopedRecord, WatchlistRecord,
};
pub use purchases::{PurchasesStore, DEFAULT_PRICE};
pub use store::ScopedStore;
pub use watchlist::WatchlistStore;
