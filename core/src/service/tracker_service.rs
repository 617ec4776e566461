use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::model::{DateKey, Ledger, MonthlySummary, Quantity, Settings};
use crate::repository::{KeyValueStore, TrackerRepository};
use crate::repository::tracker::{DEFAULT_QUANTITY_KEY, UNIT_PRICE_KEY};
use crate::service::reconcile::{ReconcileReport, Reconciler};
use crate::service::summary;
use crate::time::Clock;

/// Everything the tracker mutates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub ledger: Ledger,
    pub settings: Settings,
}

/// Owns the application state and its store; every operation goes through here.
///
/// Mutations are applied in memory first and then persisted. A persistence error
/// is returned to the caller but the in-memory change stays.
pub struct MilkTracker<S: KeyValueStore> {
    repo: TrackerRepository<S>,
    state: TrackerState,
}

impl<S: KeyValueStore> MilkTracker<S> {
    /// Loads state from `store`. Unreadable or malformed data falls back to an
    /// empty ledger and default settings instead of failing.
    pub fn open(store: S) -> Self {
        let repo = TrackerRepository::new(store);

        let ledger = repo.load_ledger().unwrap_or_else(|err| {
            warn!(error = %err, "could not load ledger, starting empty");
            Ledger::new()
        });

        let mut settings = Settings::default();
        match repo.load_default_quantity() {
            Ok(Some(liters)) => {
                if settings.set_default_quantity(liters).is_err() {
                    let reason = format!("{} is out of range", liters);
                    let err = TrackerError::malformed(DEFAULT_QUANTITY_KEY, reason);
                    warn!(error = %err, "using default quantity");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "using default quantity"),
        }
        match repo.load_unit_price() {
            Ok(Some(price)) => {
                if settings.set_unit_price(price).is_err() {
                    let reason = format!("{} is out of range", price);
                    let err = TrackerError::malformed(UNIT_PRICE_KEY, reason);
                    warn!(error = %err, "using default price");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "using default price"),
        }

        Self {
            repo,
            state: TrackerState { ledger, settings },
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn settings(&self) -> Settings {
        self.state.settings
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.repo.store_mut()
    }

    pub fn entry(&self, date: DateKey) -> Option<Quantity> {
        self.state.ledger.get(date)
    }

    /// The value an edit form starts from: the recorded liters, or zero.
    pub fn entry_or_zero(&self, date: DateKey) -> Quantity {
        self.entry(date).unwrap_or_default()
    }

    pub fn record(&mut self, date: DateKey, liters: f64) -> Result<()> {
        self.state.ledger.set(date, liters)?;
        info!(%date, liters, "recorded entry");
        self.persist_ledger()
    }

    /// Backfills skipped days up to yesterday relative to `clock` and persists.
    /// With nothing to anchor on, neither the ledger nor the store is touched.
    pub fn reconcile(&mut self, clock: &dyn Clock) -> Result<ReconcileReport> {
        let reconciler = Reconciler::new(self.state.settings.default_quantity());
        let report = reconciler.run(&mut self.state.ledger, clock.today());
        if report.ran() {
            self.persist_ledger()?;
        }
        Ok(report)
    }

    pub fn summary(&self, year: i32, month: u32) -> MonthlySummary {
        summary::summarize(year, month, &self.state.ledger, self.state.settings.unit_price())
    }

    pub fn month_entries(&self, year: i32, month: u32) -> Vec<(DateKey, Quantity)> {
        summary::month_entries(&self.state.ledger, year, month)
    }

    pub fn set_default_quantity(&mut self, liters: f64) -> Result<()> {
        self.state.settings.set_default_quantity(liters)?;
        info!(liters, "default quantity changed");
        self.persist_settings()
    }

    pub fn set_unit_price(&mut self, price: f64) -> Result<()> {
        self.state.settings.set_unit_price(price)?;
        info!(price, "unit price changed");
        self.persist_settings()
    }

    /// Writes the whole state again, e.g. after an earlier save failed.
    pub fn save(&mut self) -> Result<()> {
        self.persist_ledger()?;
        self.persist_settings()
    }

    fn persist_ledger(&mut self) -> Result<()> {
        self.repo.save_ledger(&self.state.ledger).map_err(|err| {
            warn!(error = %err, "failed to save ledger");
            err
        })
    }

    fn persist_settings(&mut self) -> Result<()> {
        self.repo.save_settings(&self.state.settings).map_err(|err| {
            warn!(error = %err, "failed to save settings");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tracker::{LEDGER_KEY, WATERMARK_KEY};
    use crate::repository::MemoryStore;
    use crate::time::FixedClock;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn on(s: &str) -> FixedClock {
        FixedClock(day(s).date())
    }

    #[test]
    fn test_record_persists_and_reopens() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        tracker.record(day("2024-01-28"), 2.5).unwrap();
        assert_eq!(tracker.store().raw(WATERMARK_KEY), Some("2024-01-28"));

        let store = tracker.store().clone();
        let reopened = MilkTracker::open(store);
        assert_eq!(reopened.entry(day("2024-01-28")).unwrap().liters(), 2.5);
        assert_eq!(reopened.ledger().watermark(), Some(day("2024-01-28")));
    }

    #[test]
    fn test_invalid_record_leaves_state_and_store_alone() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        let err = tracker.record(day("2024-01-28"), -2.0).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidQuantity(_)));
        assert!(tracker.ledger().is_empty());
        assert_eq!(tracker.store().raw(LEDGER_KEY), None);
    }

    #[test]
    fn test_reconcile_uses_configured_default() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        tracker.set_default_quantity(1.5).unwrap();
        tracker.record(day("2024-01-28"), 2.0).unwrap();

        let report = tracker.reconcile(&on("2024-01-31")).unwrap();

        assert_eq!(report.filled, vec![day("2024-01-29")]);
        assert_eq!(tracker.entry(day("2024-01-29")).unwrap().liters(), 1.5);
        assert_eq!(tracker.store().raw(WATERMARK_KEY), Some("2024-01-30"));
        let reopened = MilkTracker::open(tracker.store().clone());
        assert_eq!(reopened.entry(day("2024-01-29")).unwrap().liters(), 1.5);
    }

    #[test]
    fn test_first_run_reconcile_touches_nothing() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        let report = tracker.reconcile(&on("2024-01-31")).unwrap();
        assert!(!report.ran());
        assert_eq!(tracker.store().raw(LEDGER_KEY), None);
        assert_eq!(tracker.store().raw(WATERMARK_KEY), None);
    }

    #[test]
    fn test_save_failure_keeps_in_memory_entry() {
        let mut tracker = MilkTracker::open(MemoryStore::with_quota(4));
        let err = tracker.record(day("2024-03-01"), 1.0).unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(tracker.entry(day("2024-03-01")).unwrap().liters(), 1.0);

        tracker.store_mut().set_quota(None);
        tracker.save().unwrap();
        assert!(tracker.store().raw(LEDGER_KEY).is_some());
    }

    #[test]
    fn test_corrupted_store_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, "not json").unwrap();
        store.set(DEFAULT_QUANTITY_KEY, "abc").unwrap();
        store.set(UNIT_PRICE_KEY, "-5").unwrap();

        let tracker = MilkTracker::open(store);
        assert!(tracker.ledger().is_empty());
        assert_eq!(tracker.settings(), Settings::default());
    }

    #[test]
    fn test_settings_load_independently_of_ledger() {
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, "not json").unwrap();
        store.set(UNIT_PRICE_KEY, "62.5").unwrap();

        let tracker = MilkTracker::open(store);
        assert_eq!(tracker.settings().unit_price(), 62.5);
        assert_eq!(tracker.settings().default_quantity().liters(), 1.0);
    }

    #[test]
    fn test_summary_uses_unit_price() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        tracker.set_unit_price(40.0).unwrap();
        tracker.record(day("2024-02-01"), 2.0).unwrap();
        tracker.record(day("2024-02-15"), 1.5).unwrap();

        let summary = tracker.summary(2024, 2);
        assert_eq!(summary.total_liters, 3.5);
        assert_eq!(summary.total_bill, 140.0);
        assert_eq!(tracker.entry_or_zero(day("2024-02-02")).liters(), 0.0);
    }

    #[test]
    fn test_rejected_price_not_persisted() {
        let mut tracker = MilkTracker::open(MemoryStore::new());
        assert!(matches!(
            tracker.set_unit_price(f64::INFINITY),
            Err(TrackerError::InvalidPrice(_))
        ));
        assert_eq!(tracker.store().raw(UNIT_PRICE_KEY), None);
        assert_eq!(tracker.settings().unit_price(), 50.0);
    }
}
