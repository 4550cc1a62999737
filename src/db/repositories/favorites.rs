use anyhow::Result;

use crate::db::{Database, FAVORITES_KEY};
use crate::history::Favorite;

impl Database {
    pub fn load_favorites(&self) -> Result<Vec<Favorite>> {
        Ok(self.read_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    /// Replaces the stored favorites with `favorites`.
    pub fn save_favorites(&self, favorites: &[Favorite]) -> Result<()> {
        self.write_json(FAVORITES_KEY, favorites)
    }
}
