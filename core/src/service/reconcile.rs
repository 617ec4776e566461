use chrono::NaiveDate;
use tracing::{debug, info};

use crate::model::{DateKey, Ledger, Quantity};

/// What a reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcileReport {
    /// Day the scan started after. `None` when the ledger had nothing to anchor on.
    pub anchor: Option<DateKey>,
    /// Yesterday at the time of the run; the watermark after the pass.
    pub horizon: Option<DateKey>,
    /// Days that received the default quantity, in calendar order.
    pub filled: Vec<DateKey>,
}

impl ReconcileReport {
    /// True when the pass touched the ledger (entries or watermark).
    pub fn ran(&self) -> bool {
        self.horizon.is_some()
    }
}

/// Backfills skipped days with a default quantity.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    default_quantity: Quantity,
}

impl Reconciler {
    pub fn new(default_quantity: Quantity) -> Self {
        Self { default_quantity }
    }

    /// Starting the day after the anchor, fills every empty day strictly before
    /// yesterday, then moves the watermark to yesterday.
    ///
    /// The anchor is the watermark, or the latest entry when no watermark exists.
    /// With neither, nothing happens. Yesterday itself is left for a later run and
    /// today is never filled.
    pub fn run(&self, ledger: &mut Ledger, today: NaiveDate) -> ReconcileReport {
        let Some(anchor) = ledger.watermark().or_else(|| ledger.latest_date()) else {
            debug!("ledger empty and no watermark, skipping backfill");
            return ReconcileReport::default();
        };
        let Some(horizon) = DateKey::new(today).previous_day() else {
            return ReconcileReport {
                anchor: Some(anchor),
                ..Default::default()
            };
        };

        let mut filled = Vec::new();
        let mut current = anchor.next_day();
        while let Some(day) = current {
            if day >= horizon {
                break;
            }
            if !ledger.contains(day) {
                ledger.set_quantity(day, self.default_quantity);
                debug!(%day, liters = self.default_quantity.liters(), "backfilled");
                filled.push(day);
            }
            current = day.next_day();
        }

        ledger.set_watermark(horizon);
        info!(%anchor, %horizon, filled = filled.len(), "reconciled ledger");

        ReconcileReport {
            anchor: Some(anchor),
            horizon: Some(horizon),
            filled,
        }
    }
}
