pub mod catalog;
pub mod mode;
pub mod sequencer;
pub mod snapshot;
pub mod state;

pub use catalog::{TargetCatalog, TargetDefinition};
pub use mode::SessionMode;
pub use sequencer::TrialSequencer;
pub use snapshot::{CompletionSummary, HistoryItemView, SessionSnapshot, TrialSummary};
pub use state::{ScheduledAdvance, SequencerStatus, SubmitResult};
