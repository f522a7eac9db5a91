use std::path::Path;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analyzer::{analyze_cancellable, AnalysisOutcome, FoodAnalyzer};
use crate::capture::CapturedImage;
use crate::error::{Result, TrackerError};
use crate::goals;
use crate::models::food::next_food_id;
use crate::models::{DailyLedger, DayKey, GoalMode, Goals, Intake, Profile, SavedFood, Screen};
use crate::state::persistence::{
    load_foods, load_slot, save_foods, save_slot, KeyValueStore, SLOT_CURRENT_SCREEN, SLOT_DAILY,
    SLOT_GOALS, SLOT_PROFILE,
};
use crate::tracker::{self, EstimatorSelection, Progress};

/// Minimum Jaro-Winkler similarity for a fuzzy food-name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Owns all tracker state for one user and snapshots it after every change.
///
/// Each slot is written before the in-memory copy is replaced, so a failed
/// write leaves both the session and the store on the previous state.
pub struct TrackerSession<S: KeyValueStore> {
    store: S,
    profile: Profile,
    goals: Goals,
    daily: DailyLedger,
    saved_foods: Vec<SavedFood>,
    screen: Screen,
}

/// CSV row for saved-food import/export.
#[derive(Debug, Serialize, Deserialize)]
struct FoodRow {
    name: String,
    calories: f64,
    protein: f64,
}

impl<S: KeyValueStore> TrackerSession<S> {
    /// Load every slot from `store` and run the day-rollover check.
    pub fn open(store: S, today: &DayKey) -> Result<Self> {
        let profile = load_slot(&store, SLOT_PROFILE).unwrap_or_default();
        let goals = load_slot(&store, SLOT_GOALS).unwrap_or_default();
        let daily =
            load_slot(&store, SLOT_DAILY).unwrap_or_else(|| DailyLedger::empty(today.clone()));
        let saved_foods = load_foods(&store);
        let screen = load_slot(&store, SLOT_CURRENT_SCREEN).unwrap_or_default();

        let mut session = Self {
            store,
            profile,
            goals,
            daily,
            saved_foods,
            screen,
        };
        session.activate(today)?;
        Ok(session)
    }

    /// Roll the ledger over if the day changed. Returns true if it did.
    pub fn activate(&mut self, today: &DayKey) -> Result<bool> {
        if self.daily.date == *today {
            return Ok(false);
        }
        let next = tracker::check_rollover(self.daily.clone(), today);
        self.commit_daily(next)?;
        Ok(true)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    pub fn daily(&self) -> &DailyLedger {
        &self.daily
    }

    pub fn saved_foods(&self) -> &[SavedFood] {
        &self.saved_foods
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn progress(&self) -> Progress {
        tracker::progress(&self.daily, &self.goals)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Goals
    // ─────────────────────────────────────────────────────────────────────

    /// Recompute goals from `profile`. Any previous mode selection is dropped.
    ///
    /// Profile and goals change together or not at all: if the profile write
    /// fails, the previous goals snapshot is written back.
    pub fn calculate_goals(&mut self, profile: Profile) -> Result<&Goals> {
        let goals = goals::compute(&profile)?;

        save_slot(&self.store, SLOT_GOALS, &goals)?;
        if let Err(e) = save_slot(&self.store, SLOT_PROFILE, &profile) {
            if let Err(restore) = save_slot(&self.store, SLOT_GOALS, &self.goals) {
                warn!(error = %restore, "could not restore previous goals snapshot");
            }
            return Err(e);
        }
        self.profile = profile;
        self.goals = goals;
        self.remember_screen(Screen::Goal);

        info!(
            maintenance = self.goals.maintenance,
            protein = self.goals.protein,
            "goals calculated"
        );
        Ok(&self.goals)
    }

    pub fn select_goal(&mut self, mode: GoalMode) -> Result<&Goals> {
        let goals = goals::select_goal(&self.goals, mode)?;
        self.commit_goals(goals)?;
        self.remember_screen(Screen::Tracker);

        info!(%mode, calories = self.goals.calories, "goal selected");
        Ok(&self.goals)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ledger
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_intake(&mut self, intake: Intake, today: &DayKey) -> Result<&DailyLedger> {
        let current = tracker::check_rollover(self.daily.clone(), today);
        let next = tracker::add_intake(current, intake, today)?;
        self.commit_daily(next)?;
        Ok(&self.daily)
    }

    /// Undo the last intake of today. `None` when there is nothing to undo.
    pub fn undo_last(&mut self, today: &DayKey) -> Result<Option<Intake>> {
        self.activate(today)?;
        if !self.daily.can_undo() {
            return Ok(None);
        }
        let (next, removed) = tracker::undo_last(self.daily.clone());
        self.commit_daily(next)?;
        Ok(removed)
    }

    /// Clear today's ledger. The caller must have asked the user first.
    pub fn new_day(&mut self, today: &DayKey) -> Result<()> {
        self.commit_daily(tracker::reset_day(self.daily.clone(), today))
    }

    /// Add the aggregate of an estimator session as one intake.
    pub fn confirm_estimate(
        &mut self,
        selection: EstimatorSelection,
        today: &DayKey,
    ) -> Result<Intake> {
        let items = selection.len();
        let intake = selection.confirm()?;
        self.add_intake(intake, today)?;
        info!(
            items,
            calories = intake.calories,
            protein = intake.protein,
            "estimate added"
        );
        Ok(intake)
    }

    /// Analyze a photo and log the estimate as one intake.
    ///
    /// Returns `None` when `cancel` fires first; the ledger is left alone.
    pub async fn log_photo_estimate<A>(
        &mut self,
        analyzer: &A,
        image: &CapturedImage,
        cancel: &CancellationToken,
        today: &DayKey,
    ) -> Result<Option<(AnalysisOutcome, Intake)>>
    where
        A: FoodAnalyzer + ?Sized,
    {
        let Some(outcome) = analyze_cancellable(analyzer, image, cancel).await? else {
            return Ok(None);
        };

        let intake = outcome.intake()?;
        self.add_intake(intake, today)?;
        info!(
            food = %outcome.food_name,
            calories = intake.calories,
            protein = intake.protein,
            "photo estimate added"
        );
        Ok(Some((outcome, intake)))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Saved foods
    // ─────────────────────────────────────────────────────────────────────

    /// Create a saved food. `now_ms` seeds the id.
    pub fn add_saved_food(
        &mut self,
        name: &str,
        calories: f64,
        protein: f64,
        now_ms: u64,
    ) -> Result<&SavedFood> {
        let id = next_food_id(&self.saved_foods, now_ms);
        let food = SavedFood::new(id, name, calories, protein)?;

        let mut next = self.saved_foods.clone();
        next.push(food);
        self.commit_foods(next)?;

        self.saved_foods
            .last()
            .ok_or_else(|| TrackerError::FoodNotFound(name.to_string()))
    }

    pub fn delete_saved_food(&mut self, id: u64) -> Result<SavedFood> {
        let position = self
            .saved_foods
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| TrackerError::FoodNotFound(id.to_string()))?;

        let mut next = self.saved_foods.clone();
        let removed = next.remove(position);
        self.commit_foods(next)?;
        Ok(removed)
    }

    pub fn saved_food(&self, id: u64) -> Option<&SavedFood> {
        self.saved_foods.iter().find(|f| f.id == id)
    }

    /// Exact lookup by id or case-insensitive name.
    pub fn find_saved_food(&self, query: &str) -> Option<&SavedFood> {
        let query = query.trim();
        if let Ok(id) = query.parse::<u64>() {
            if let Some(food) = self.saved_food(id) {
                return Some(food);
            }
        }
        let key = query.to_lowercase();
        self.saved_foods.iter().find(|f| f.key() == key)
    }

    /// Foods whose names are similar to `query`, best first.
    pub fn fuzzy_candidates(&self, query: &str) -> Vec<(&SavedFood, f64)> {
        let key = query.trim().to_lowercase();
        let mut candidates: Vec<(&SavedFood, f64)> = self
            .saved_foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.key(), &key)))
            .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates
    }

    /// Log one serving of a saved food.
    pub fn add_saved_food_to_day(&mut self, id: u64, today: &DayKey) -> Result<Intake> {
        let food = self
            .saved_food(id)
            .ok_or_else(|| TrackerError::FoodNotFound(id.to_string()))?;
        let intake = food.intake()?;
        self.add_intake(intake, today)?;
        Ok(intake)
    }

    /// Append foods from a `name,calories,protein` CSV. All rows or none.
    pub fn import_saved_foods<P: AsRef<Path>>(&mut self, path: P, now_ms: u64) -> Result<usize> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut next = self.saved_foods.clone();

        for (line, row) in reader.deserialize::<FoodRow>().enumerate() {
            let row = row?;
            let id = next_food_id(&next, now_ms);
            let food = SavedFood::new(id, &row.name, row.calories, row.protein).map_err(|e| {
                TrackerError::validation(format!("row {}: {}", line + 1, e))
            })?;
            next.push(food);
        }

        let added = next.len() - self.saved_foods.len();
        self.commit_foods(next)?;
        info!(added, "saved foods imported");
        Ok(added)
    }

    /// Write the catalog as a `name,calories,protein` CSV.
    pub fn export_saved_foods<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path)?;
        for food in &self.saved_foods {
            writer.serialize(FoodRow {
                name: food.name.clone(),
                calories: food.calories,
                protein: food.protein,
            })?;
        }
        writer.flush()?;
        Ok(self.saved_foods.len())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Screen
    // ─────────────────────────────────────────────────────────────────────

    pub fn show_screen(&mut self, screen: Screen) -> Result<()> {
        save_slot(&self.store, SLOT_CURRENT_SCREEN, &screen)?;
        self.screen = screen;
        Ok(())
    }

    /// Record the screen a completed action leads to. A failed write is
    /// logged, not returned.
    fn remember_screen(&mut self, screen: Screen) {
        if let Err(e) = self.show_screen(screen) {
            warn!(error = %e, ?screen, "could not record current screen");
        }
    }

    fn commit_daily(&mut self, next: DailyLedger) -> Result<()> {
        save_slot(&self.store, SLOT_DAILY, &next)?;
        self.daily = next;
        Ok(())
    }

    fn commit_goals(&mut self, next: Goals) -> Result<()> {
        save_slot(&self.store, SLOT_GOALS, &next)?;
        self.goals = next;
        Ok(())
    }

    fn commit_foods(&mut self, next: Vec<SavedFood>) -> Result<()> {
        save_foods(&self.store, &next)?;
        self.saved_foods = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::state::persistence::MemoryStore;
    use std::cell::Cell;

    /// Memory store whose writes to one slot can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: Cell<Option<&'static str>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.broken.get() == Some(key) {
                return Err(TrackerError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }
    }

    fn monday() -> DayKey {
        DayKey::from("Mon Jan 01 2024")
    }

    fn tuesday() -> DayKey {
        DayKey::from("Tue Jan 02 2024")
    }

    fn sample_profile() -> Profile {
        Profile {
            gender: Some(Gender::Male),
            age: 30,
            weight: 80.0,
            height: 180.0,
            activity_level: 1.55,
        }
    }

    #[test]
    fn test_open_empty_store() {
        let store = MemoryStore::new();
        let session = TrackerSession::open(&store, &monday()).unwrap();
        assert_eq!(session.daily(), &DailyLedger::empty(monday()));
        assert_eq!(session.screen(), Screen::Profile);
        assert!(session.saved_foods().is_empty());
    }

    #[test]
    fn test_goal_flow_moves_screens() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();

        session.calculate_goals(sample_profile()).unwrap();
        assert_eq!(session.screen(), Screen::Goal);

        session.select_goal(GoalMode::Maintenance).unwrap();
        assert_eq!(session.goals().calories, 2759);
        assert_eq!(session.screen(), Screen::Tracker);

        // Recalculating drops the selection
        session.calculate_goals(sample_profile()).unwrap();
        assert_eq!(session.goals().calories, 0);
        assert!(session.goals().selected.is_none());
    }

    #[test]
    fn test_invalid_profile_leaves_state_untouched() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.calculate_goals(sample_profile()).unwrap();

        let mut bad = sample_profile();
        bad.gender = None;
        assert!(session.calculate_goals(bad).is_err());
        assert_eq!(session.profile(), &sample_profile());
        assert_eq!(session.goals().maintenance, 2759);
    }

    #[test]
    fn test_failed_goals_write_keeps_old_profile() {
        let store = FlakyStore::default();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.calculate_goals(sample_profile()).unwrap();

        let mut heavier = sample_profile();
        heavier.weight = 120.0;
        store.broken.set(Some(SLOT_GOALS));
        assert!(session.calculate_goals(heavier).is_err());

        assert_eq!(session.profile(), &sample_profile());
        assert_eq!(session.goals().protein, 136);

        store.broken.set(None);
        let reopened = TrackerSession::open(&store, &monday()).unwrap();
        assert_eq!(reopened.profile(), &sample_profile());
        assert_eq!(reopened.goals().protein, 136);
    }

    #[test]
    fn test_failed_profile_write_restores_goals() {
        let store = FlakyStore::default();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.calculate_goals(sample_profile()).unwrap();

        let mut heavier = sample_profile();
        heavier.weight = 120.0;
        store.broken.set(Some(SLOT_PROFILE));
        assert!(session.calculate_goals(heavier).is_err());
        assert_eq!(session.goals().protein, 136);

        store.broken.set(None);
        let reopened = TrackerSession::open(&store, &monday()).unwrap();
        assert_eq!(reopened.profile(), &sample_profile());
        assert_eq!(reopened.goals().protein, 136);
    }

    #[test]
    fn test_screen_write_failure_does_not_fail_goal_selection() {
        let store = FlakyStore::default();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.calculate_goals(sample_profile()).unwrap();

        store.broken.set(Some(SLOT_CURRENT_SCREEN));
        let goals = session.select_goal(GoalMode::Surplus).unwrap();
        assert_eq!(goals.calories, 3311);
        assert_eq!(session.screen(), Screen::Goal);

        store.broken.set(None);
        let reopened = TrackerSession::open(&store, &monday()).unwrap();
        assert_eq!(reopened.goals().selected, Some(GoalMode::Surplus));
    }

    #[test]
    fn test_clamped_goals_can_be_selected() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        let tiny = Profile {
            gender: Some(Gender::Female),
            age: 120,
            weight: 1.0,
            height: 1.0,
            activity_level: 1.2,
        };

        session.calculate_goals(tiny).unwrap();
        assert_eq!(session.goals().maintenance, 0);
        session.select_goal(GoalMode::Maintenance).unwrap();
        assert_eq!(session.screen(), Screen::Tracker);
    }

    #[test]
    fn test_add_on_new_day_rolls_over_first() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.add_intake(Intake::new(800, 40), &monday()).unwrap();

        session.add_intake(Intake::new(100, 5), &tuesday()).unwrap();
        assert_eq!(session.daily().calories, 100);
        assert_eq!(session.daily().entries(), 1);
        assert_eq!(session.daily().date, tuesday());
    }

    #[test]
    fn test_undo_after_rollover_is_noop() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.add_intake(Intake::new(800, 40), &monday()).unwrap();

        assert_eq!(session.undo_last(&tuesday()).unwrap(), None);
        assert_eq!(session.daily().calories, 0);
    }

    #[test]
    fn test_saved_food_lifecycle() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();

        let id = session.add_saved_food("Protein Shake", 160.0, 30.0, 1_000).unwrap().id;
        let intake = session.add_saved_food_to_day(id, &monday()).unwrap();
        assert_eq!(intake, Intake::new(160, 30));
        assert_eq!(session.daily().protein, 30);

        let removed = session.delete_saved_food(id).unwrap();
        assert_eq!(removed.name, "Protein Shake");
        assert!(matches!(
            session.delete_saved_food(id),
            Err(TrackerError::FoodNotFound(_))
        ));
        // Already-logged intake is unaffected
        assert_eq!(session.daily().protein, 30);
    }

    #[test]
    fn test_find_saved_food() {
        let store = MemoryStore::new();
        let mut session = TrackerSession::open(&store, &monday()).unwrap();
        session.add_saved_food("Banana", 105.0, 1.3, 10).unwrap();
        session.add_saved_food("Bagel", 245.0, 10.0, 20).unwrap();

        assert_eq!(session.find_saved_food("BANANA").unwrap().id, 10);
        assert_eq!(session.find_saved_food("20").unwrap().name, "Bagel");
        assert!(session.find_saved_food("bananna").is_none());

        let candidates = session.fuzzy_candidates("bananna");
        assert_eq!(candidates[0].0.name, "Banana");
    }
}
