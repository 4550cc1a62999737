pub mod models;
pub mod session;
pub mod trial;

pub use models::FavoriteAction;
pub use session::{ScoringConfig, SessionLogEntry, SessionMetadata, SessionRecord};
pub use trial::TrialRecord;
