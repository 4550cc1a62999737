use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::db::Database;
use crate::history::FavoritesStore;
use crate::notice::{ActionOutcome, Notice};
use crate::pattern::{Pattern, Primitive, PrimitiveKind};
use crate::recorder::{FavoriteAction, ScoringConfig, SessionRecord, TrialRecord};
use crate::settings::ExperimentSettings;
use crate::workspace::{OperandSlot, OperandSource, WorkspaceController};
use crate::{log_debug, log_info, log_warn};

use super::catalog::TargetCatalog;
use super::snapshot::{CompletionSummary, HistoryItemView, SessionSnapshot, TrialSummary};
use super::state::{ScheduledAdvance, SequencerStatus, SubmitResult};
use super::SessionMode;

const ENABLE_LOGS: bool = true;

/// Drives a session through its trial order.
///
/// Owns the workspace of the active trial, the session-scoped favorites and
/// every record that ends up in durable storage. All methods are synchronous
/// and take the wall-clock time of the triggering event.
pub struct TrialSequencer {
    mode: SessionMode,
    points_per_trial: u32,
    feedback_delay: Duration,
    catalog: TargetCatalog,
    order: Vec<usize>,
    current: usize,
    status: SequencerStatus,
    target: Option<Pattern>,
    workspace: WorkspaceController,
    favorites: FavoritesStore,
    session: SessionRecord,
    active: Option<TrialRecord>,
    scheduled: Option<ScheduledAdvance>,
    db: Database,
    notices: Vec<Notice>,
}

impl TrialSequencer {
    pub fn new(
        settings: &ExperimentSettings,
        catalog: TargetCatalog,
        db: Database,
        now: DateTime<Utc>,
    ) -> Self {
        let mut notices = Vec::new();
        let order = build_order(settings, &catalog);
        let trial_order = order
            .iter()
            .filter_map(|&index| catalog.get(index).map(|target| target.name.to_string()))
            .collect();

        let favorites = match db.load_favorites() {
            Ok(items) => FavoritesStore::from_items(items),
            Err(err) => {
                log::warn!("Failed to load favorites: {err:#}");
                notices.push(Notice::warning("Saved favorites could not be loaded"));
                FavoritesStore::new()
            }
        };

        let session = SessionRecord::new(
            settings.mode,
            settings.randomize,
            trial_order,
            ScoringConfig {
                points_per_trial: settings.points_per_trial,
                feedback_delay_ms: settings.feedback_delay_ms,
            },
            now,
        );

        log_info!(
            "Session {} prepared: {} trials, mode {}, randomized {}",
            session.metadata().session_id,
            order.len(),
            settings.mode,
            settings.randomize
        );

        Self {
            mode: settings.mode,
            points_per_trial: settings.points_per_trial,
            feedback_delay: Duration::milliseconds(
                settings.feedback_delay_ms.min(u64::from(u32::MAX)) as i64,
            ),
            catalog,
            order,
            current: 0,
            status: SequencerStatus::NotStarted,
            target: None,
            workspace: WorkspaceController::new(),
            favorites,
            session,
            active: None,
            scheduled: None,
            db,
            notices,
        }
    }

    pub fn status(&self) -> SequencerStatus {
        self.status
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn workspace(&self) -> &WorkspaceController {
        &self.workspace
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn session(&self) -> &SessionRecord {
        &self.session
    }

    pub fn active_trial(&self) -> Option<&TrialRecord> {
        self.active.as_ref()
    }

    pub fn target(&self) -> Option<&Pattern> {
        self.target.as_ref()
    }

    pub fn scheduled_advance(&self) -> Option<ScheduledAdvance> {
        self.scheduled
    }

    pub fn trial_order(&self) -> &[String] {
        &self.session.metadata().trial_order
    }

    /// Points earned so far, the open trial included.
    pub fn total_points(&self) -> u32 {
        self.session.total_points()
            + self
                .active
                .as_ref()
                .map(|trial| trial.points_awarded)
                .unwrap_or(0)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        if self.status != SequencerStatus::NotStarted {
            self.notices.push(Notice::info("The session is already running"));
            return ActionOutcome::Ignored;
        }
        if self.order.is_empty() {
            log::warn!("Session started with an empty trial order");
            self.complete(now);
            return ActionOutcome::Applied;
        }
        self.load_trial(0, now);
        ActionOutcome::Applied
    }

    fn load_trial(&mut self, position: usize, now: DateTime<Utc>) {
        let Some(definition) = self
            .order
            .get(position)
            .and_then(|&index| self.catalog.get(index))
            .copied()
        else {
            self.complete(now);
            return;
        };

        let target = (definition.generate)();
        self.current = position;
        self.target = Some(target);
        self.scheduled = None;
        self.status = SequencerStatus::TrialActive;

        self.workspace.reset_for_trial();
        self.workspace.seed_default_operation();
        // The seeded operation is part of the initial state, not a participant action.
        self.workspace.drain_events();

        let mut record = TrialRecord::new(position, definition.name, target, self.mode, now);
        record.seeded_operator = self.workspace.pending().operator();
        self.active = Some(record);

        if self.mode.shows_hints() {
            self.notices.push(Notice::info(definition.hint));
        }
        log_info!(
            "Trial {}/{} loaded: {}",
            position + 1,
            self.order.len(),
            definition.name
        );
    }

    fn require_editable(&mut self, action: &str) -> Option<ActionOutcome> {
        match self.status {
            SequencerStatus::TrialActive => None,
            SequencerStatus::Submitted => {
                self.notices
                    .push(Notice::info("This trial is solved; wait for the next one"));
                log_debug!("{action} ignored after a correct submission");
                Some(ActionOutcome::Blocked)
            }
            SequencerStatus::NotStarted | SequencerStatus::Completed => {
                log_debug!("{action} ignored with no active trial");
                Some(ActionOutcome::Ignored)
            }
        }
    }

    /// Moves the controller's events into the trial record and its notices
    /// into the outgoing queue.
    fn flush_workspace(&mut self, now: DateTime<Utc>) {
        let events = self.workspace.drain_events();
        if let Some(record) = self.active.as_mut() {
            record.record_events(&events, now);
        }
        self.notices.extend(self.workspace.drain_notices());
    }

    fn with_workspace<F>(&mut self, action: &str, now: DateTime<Utc>, apply: F) -> ActionOutcome
    where
        F: FnOnce(&mut WorkspaceController) -> ActionOutcome,
    {
        if let Some(outcome) = self.require_editable(action) {
            return outcome;
        }
        let outcome = apply(&mut self.workspace);
        self.flush_workspace(now);
        outcome
    }

    pub fn arm_operator(&mut self, name: &str, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("arm operator", now, |ws| ws.arm_operator_by_name(name))
    }

    /// Stages the named primitive. An unknown name or an out-of-range line
    /// index is rejected and logged without touching the workspace.
    pub fn apply_primitive(
        &mut self,
        name: &str,
        param: Option<usize>,
        slot: Option<OperandSlot>,
        now: DateTime<Utc>,
    ) -> ActionOutcome {
        if let Some(outcome) = self.require_editable("apply primitive") {
            return outcome;
        }
        let parsed = name.parse::<PrimitiveKind>().and_then(|kind| match param {
            Some(param) => Primitive::with_param(kind, param),
            None => Ok(Primitive::new(kind)),
        });
        let primitive = match parsed {
            Ok(primitive) => primitive,
            Err(err) => {
                log_warn!("Rejected primitive: {err}");
                if let Some(record) = self.active.as_mut() {
                    record.record_operand_rejection(err.to_string(), now);
                }
                self.notices.push(Notice::warning(err.to_string()));
                return ActionOutcome::Rejected;
            }
        };
        let outcome = self
            .workspace
            .stage_operand(OperandSource::primitive(&primitive), slot);
        self.flush_workspace(now);
        outcome
    }

    pub fn use_favorite(
        &mut self,
        id: &str,
        slot: Option<OperandSlot>,
        now: DateTime<Utc>,
    ) -> ActionOutcome {
        if let Some(outcome) = self.require_editable("use favorite") {
            return outcome;
        }
        let Some(favorite) = self.favorites.get(id).cloned() else {
            log_warn!("Favorite {id} not found");
            if let Some(record) = self.active.as_mut() {
                record.record_favorite(FavoriteAction::Missing, Some(id), None, now);
            }
            self.notices.push(Notice::warning("That favorite no longer exists"));
            return ActionOutcome::Rejected;
        };

        let outcome = self
            .workspace
            .stage_operand(OperandSource::favorite(&favorite), slot);
        if outcome.is_applied() {
            if let Some(record) = self.active.as_mut() {
                record.record_favorite(FavoriteAction::Use, None, Some(&favorite), now);
            }
        }
        self.flush_workspace(now);
        outcome
    }

    pub fn toggle_history(&mut self, index: usize, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("select history", now, |ws| ws.toggle_history_selection(index))
    }

    pub fn bind_history(
        &mut self,
        slot: OperandSlot,
        index: usize,
        now: DateTime<Utc>,
    ) -> ActionOutcome {
        self.with_workspace("bind history", now, |ws| ws.bind_history_operand(slot, index))
    }

    pub fn confirm(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("confirm", now, |ws| ws.confirm(now))
    }

    pub fn cancel_pending(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("cancel", now, WorkspaceController::cancel_pending)
    }

    pub fn undo(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("undo", now, WorkspaceController::undo)
    }

    pub fn reset_history(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        self.with_workspace("reset", now, WorkspaceController::reset_history)
    }

    /// Pins the pattern of history entry `index` (0-based).
    pub fn add_favorite(&mut self, index: usize, now: DateTime<Utc>) -> ActionOutcome {
        if !self.status.has_trial() {
            return ActionOutcome::Ignored;
        }
        let Some(entry) = self.workspace.history().get(index).cloned() else {
            self.notices
                .push(Notice::warning(format!("There is no step {}", index + 1)));
            return ActionOutcome::Rejected;
        };

        let Some(favorite) = self.favorites.add_from_entry(&entry, now) else {
            let existing = self
                .favorites
                .items()
                .iter()
                .find(|item| item.pattern == entry.pattern)
                .cloned();
            if let Some(record) = self.active.as_mut() {
                record.record_favorite(FavoriteAction::AddDuplicate, None, existing.as_ref(), now);
            }
            self.notices
                .push(Notice::info("This pattern is already a favorite"));
            return ActionOutcome::Ignored;
        };

        log_info!("Favorite {} added from step {}", favorite.id, index + 1);
        if let Some(record) = self.active.as_mut() {
            record.record_favorite(FavoriteAction::Add, None, Some(&favorite), now);
        }
        self.notices.push(Notice::success("Added to favorites"));
        self.persist_favorites();
        ActionOutcome::Applied
    }

    pub fn remove_favorite(&mut self, id: &str, now: DateTime<Utc>) -> ActionOutcome {
        if !self.status.has_trial() {
            return ActionOutcome::Ignored;
        }
        let Some(removed) = self.favorites.remove_by_id(id) else {
            if let Some(record) = self.active.as_mut() {
                record.record_favorite(FavoriteAction::Missing, Some(id), None, now);
            }
            return ActionOutcome::Ignored;
        };

        log_info!("Favorite {} removed", removed.id);
        if let Some(record) = self.active.as_mut() {
            record.record_favorite(FavoriteAction::Remove, None, Some(&removed), now);
        }
        self.persist_favorites();
        ActionOutcome::Applied
    }

    /// Compares the committed pattern with the target. Points are awarded on
    /// the first correct submission of a trial only.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<SubmitResult> {
        if !self.status.has_trial() {
            return None;
        }
        let target = self.target?;
        let submitted = self.workspace.committed_pattern();
        let correct = submitted == target;
        let first_success = correct
            && !self
                .active
                .as_ref()
                .is_some_and(TrialRecord::is_finalized);
        let points_awarded = if first_success && self.mode.awards_points() {
            self.points_per_trial
        } else {
            0
        };

        if let Some(record) = self.active.as_mut() {
            record.record_submission(correct, submitted, points_awarded, now);
        }

        if !correct {
            log_info!("Trial {} submission incorrect", self.current + 1);
            self.notices
                .push(Notice::warning("Not quite. Keep building and try again"));
            return Some(SubmitResult {
                correct,
                points_awarded,
            });
        }

        if first_success {
            log_info!(
                "Trial {} solved (+{points_awarded} points)",
                self.current + 1
            );
            self.status = SequencerStatus::Submitted;
            let message = if points_awarded > 0 {
                format!("Correct! +{points_awarded} points")
            } else {
                "Correct!".to_string()
            };
            self.notices.push(Notice::success(message));
            if self.mode.auto_advances() {
                self.scheduled = Some(ScheduledAdvance {
                    trial_index: self.current,
                    due_at: now + self.feedback_delay,
                });
            }
            self.checkpoint();
        } else {
            self.notices.push(Notice::info("Already solved"));
        }

        Some(SubmitResult {
            correct,
            points_awarded,
        })
    }

    /// Closes the solved trial and loads the next one, or completes the
    /// session when the order is exhausted.
    pub fn advance(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        if self.status != SequencerStatus::Submitted {
            if self.status == SequencerStatus::TrialActive {
                self.notices
                    .push(Notice::info("Submit a matching pattern to continue"));
                return ActionOutcome::Blocked;
            }
            return ActionOutcome::Ignored;
        }

        if let Some(record) = self.active.take() {
            self.session.push_trial(record);
        }
        self.scheduled = None;
        self.checkpoint();

        let next = self.current + 1;
        if next < self.order.len() {
            self.load_trial(next, now);
        } else {
            self.complete(now);
        }
        ActionOutcome::Applied
    }

    /// Fires the scheduled advance once it is due. Stale schedules left over
    /// from an earlier trial never fire.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(scheduled) = self.scheduled else {
            return false;
        };
        if scheduled.due_at > now {
            return false;
        }
        if scheduled.trial_index != self.current || self.status != SequencerStatus::Submitted {
            log_debug!("Dropping stale advance for trial {}", scheduled.trial_index + 1);
            self.scheduled = None;
            return false;
        }
        self.advance(now).is_applied()
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.status = SequencerStatus::Completed;
        self.target = None;
        self.scheduled = None;
        self.session.mark_completed(now);

        let log = self.session.to_log(None);
        if let Err(err) = self.db.append_session(&log) {
            log::warn!("Failed to store session log: {err:#}");
            self.notices
                .push(Notice::warning("The session log could not be saved"));
        }

        log_info!(
            "Session {} completed with {} points",
            self.session.metadata().session_id,
            self.session.total_points()
        );
        self.notices.push(Notice::success(format!(
            "All trials complete: {} points",
            self.session.total_points()
        )));
    }

    fn checkpoint(&mut self) {
        let log = self.session.to_log(self.active.as_ref());
        if let Err(err) = self.db.save_checkpoint(&log) {
            log::warn!("Failed to store session checkpoint: {err:#}");
            self.notices
                .push(Notice::warning("Progress could not be saved"));
        }
    }

    fn persist_favorites(&mut self) {
        if let Err(err) = self.db.save_favorites(self.favorites.items()) {
            log::warn!("Failed to store favorites: {err:#}");
            self.notices
                .push(Notice::warning("Favorites could not be saved"));
        }
    }

    pub fn record_button(&mut self, button: &str, outcome: ActionOutcome, now: DateTime<Utc>) {
        if let Some(record) = self.active.as_mut() {
            record.record_button(button, outcome, now);
        }
    }

    pub fn summary(&self) -> CompletionSummary {
        let trials: Vec<TrialSummary> = self
            .session
            .trials()
            .iter()
            .chain(self.active.as_ref())
            .map(TrialSummary::from)
            .collect();
        CompletionSummary {
            session_id: self.session.metadata().session_id.clone(),
            total_points: self.total_points(),
            successful_trials: trials.iter().filter(|trial| trial.success).count(),
            trial_count: self.order.len(),
            trials,
        }
    }

    /// Current view for the renderer. Drains queued notices.
    pub fn snapshot(&mut self) -> SessionSnapshot {
        self.notices.extend(self.workspace.drain_notices());
        let definition = self
            .status
            .has_trial()
            .then(|| self.order.get(self.current))
            .flatten()
            .and_then(|&index| self.catalog.get(index));

        let history = self
            .workspace
            .history()
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryItemView {
                step: index + 1,
                operation: entry.operation.clone(),
                op_fn: entry.op_fn,
                pattern: entry.pattern,
                favorited: self.favorites.is_pattern_favorited(&entry.pattern),
            })
            .collect();

        SessionSnapshot {
            status: self.status,
            mode: self.mode,
            trial_index: self.status.has_trial().then_some(self.current),
            trial_count: self.order.len(),
            target_name: definition.map(|target| target.name.to_string()),
            target: self.target,
            hint: definition
                .filter(|_| self.mode.shows_hints())
                .map(|target| target.hint.to_string()),
            workspace: *self.workspace.workspace(),
            preview: self.workspace.preview().copied(),
            recalled: self.workspace.recalled().copied(),
            pending: self.workspace.pending_view(),
            history,
            selection: self.workspace.selection().to_vec(),
            favorites: self.favorites.items().to_vec(),
            score: self.total_points(),
            advance_due_at: self.scheduled.map(|scheduled| scheduled.due_at),
            summary: (self.status == SequencerStatus::Completed).then(|| self.summary()),
            notices: std::mem::take(&mut self.notices),
        }
    }
}

/// Catalog indices in the order trials will run.
fn build_order(settings: &ExperimentSettings, catalog: &TargetCatalog) -> Vec<usize> {
    let mut order: Vec<usize> = settings
        .trials
        .iter()
        .filter_map(|name| {
            let position = catalog.position(name);
            if position.is_none() {
                log::warn!("Unknown trial target '{name}' skipped");
            }
            position
        })
        .collect();
    if order.is_empty() {
        order = (0..catalog.len()).collect();
    }

    if settings.randomize {
        match settings.shuffle_seed {
            Some(seed) => order.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => order.shuffle(&mut rand::thread_rng()),
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::primitives;
    use crate::trials::TargetDefinition;
    use crate::workspace::PendingStatus;

    fn catalog() -> TargetCatalog {
        TargetCatalog::new(vec![
            TargetDefinition {
                name: "row",
                hint: "Add a horizontal line.",
                generate: || primitives::line_horizontal(5),
            },
            TargetDefinition {
                name: "column",
                hint: "Add a vertical line.",
                generate: || primitives::line_vertical(5),
            },
        ])
    }

    fn sequencer(mode: SessionMode) -> TrialSequencer {
        let settings = ExperimentSettings {
            mode,
            ..ExperimentSettings::default()
        };
        TrialSequencer::new(&settings, catalog(), Database::in_memory().unwrap(), Utc::now())
    }

    fn solve_row(seq: &mut TrialSequencer, now: DateTime<Utc>) {
        assert_eq!(seq.arm_operator("add", now), ActionOutcome::Applied);
        seq.apply_primitive("line_horizontal", None, None, now);
        assert_eq!(seq.confirm(now), ActionOutcome::Applied);
    }

    #[test]
    fn loading_a_trial_seeds_add_with_blank_operand() {
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(Utc::now());

        assert_eq!(seq.status(), SequencerStatus::TrialActive);
        assert_eq!(seq.workspace().status(), PendingStatus::BinaryArmed);
        let view = seq.workspace().pending_view();
        assert_eq!(view.operand_a.unwrap().pattern, Pattern::blank());
        assert!(view.operand_b.is_none());

        let record = seq.active_trial().unwrap();
        assert!(record.operation_log.is_empty());
        assert!(record.seeded_operator.is_some());
    }

    #[test]
    fn points_are_awarded_once() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(now);
        solve_row(&mut seq, now);

        let first = seq.submit(now).unwrap();
        let second = seq.submit(now).unwrap();

        assert!(first.correct && second.correct);
        assert_eq!(first.points_awarded, 10);
        assert_eq!(second.points_awarded, 0);
        assert_eq!(seq.total_points(), 10);
        assert_eq!(seq.status(), SequencerStatus::Submitted);
        assert_eq!(seq.active_trial().unwrap().submissions.len(), 2);
    }

    #[test]
    fn failed_submission_keeps_the_trial_open() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(now);

        let result = seq.submit(now).unwrap();
        assert!(!result.correct);
        assert_eq!(seq.status(), SequencerStatus::TrialActive);
        assert!(seq.scheduled_advance().is_none());

        solve_row(&mut seq, now);
        assert!(seq.submit(now).unwrap().correct);
    }

    #[test]
    fn solved_trial_freezes_the_workspace() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(now);
        solve_row(&mut seq, now);
        seq.submit(now);

        assert_eq!(seq.undo(now), ActionOutcome::Blocked);
        assert_eq!(seq.workspace().history().len(), 1);
    }

    #[test]
    fn advance_fires_after_the_feedback_delay() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(now);
        solve_row(&mut seq, now);
        seq.submit(now);

        assert!(!seq.tick(now + Duration::milliseconds(1_000)));
        assert!(seq.tick(now + Duration::milliseconds(1_500)));

        assert_eq!(seq.status(), SequencerStatus::TrialActive);
        assert_eq!(seq.session().trials().len(), 1);
        assert!(seq.workspace().history().is_empty());
        assert_eq!(seq.target(), Some(&primitives::line_vertical(5)));
    }

    #[test]
    fn stale_advance_is_ignored() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Scored);
        seq.start(now);
        solve_row(&mut seq, now);
        seq.submit(now);
        let stale = seq.scheduled_advance().unwrap();

        seq.advance(now);
        seq.scheduled = Some(stale);

        assert!(!seq.tick(now + Duration::seconds(5)));
        assert_eq!(seq.session().trials().len(), 1);
        assert!(seq.scheduled_advance().is_none());
    }

    #[test]
    fn tutorial_waits_for_manual_advance() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Tutorial);
        seq.start(now);
        let snapshot = seq.snapshot();
        assert_eq!(snapshot.hint.as_deref(), Some("Add a horizontal line."));
        assert!(!snapshot.notices.is_empty());

        solve_row(&mut seq, now);
        let result = seq.submit(now).unwrap();
        assert_eq!(result.points_awarded, 0);
        assert!(seq.scheduled_advance().is_none());

        assert_eq!(seq.advance(now), ActionOutcome::Applied);
        assert_eq!(seq.snapshot().target_name.as_deref(), Some("column"));
    }

    #[test]
    fn completion_stores_the_session() {
        let now = Utc::now();
        let mut seq = sequencer(SessionMode::Practice);
        seq.start(now);
        solve_row(&mut seq, now);
        seq.submit(now);
        seq.advance(now);

        seq.apply_primitive("line_vertical", None, None, now);
        seq.confirm(now);
        seq.submit(now);
        seq.advance(now);

        assert_eq!(seq.status(), SequencerStatus::Completed);
        let summary = seq.snapshot().summary.unwrap();
        assert_eq!(summary.successful_trials, 2);
        assert_eq!(summary.total_points, 0);

        let stored = seq.db.load_sessions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].len(), 3);
        assert_eq!(seq.db.load_checkpoint().unwrap(), None);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let settings = ExperimentSettings {
            randomize: true,
            shuffle_seed: Some(7),
            ..ExperimentSettings::default()
        };
        let catalog = TargetCatalog::builtin();
        let first = build_order(&settings, &catalog);
        let second = build_order(&settings, &catalog);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..catalog.len()).collect::<Vec<_>>());
    }

    #[test]
    fn configured_subset_keeps_its_order() {
        let settings = ExperimentSettings {
            trials: vec!["column".into(), "nope".into(), "row".into()],
            ..ExperimentSettings::default()
        };
        assert_eq!(build_order(&settings, &catalog()), vec![1, 0]);
    }
}
