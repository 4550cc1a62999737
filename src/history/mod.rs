pub mod entry;
pub mod favorites;

pub use entry::{format_operation, HistoryEntry, OperationHistory};
pub use favorites::{Favorite, FavoriteMeta, FavoritesStore};
