use std::collections::HashMap;

use crate::error::Result;
use crate::model::date_key::DateKey;
use crate::model::quantity::Quantity;

/// Daily delivered liters keyed by calendar day, plus the reconciliation watermark.
///
/// The ledger never persists itself; callers save it after a mutation so a failed
/// save cannot disturb what is already in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: HashMap<DateKey, Quantity>,
    watermark: Option<DateKey>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(entries: HashMap<DateKey, Quantity>, watermark: Option<DateKey>) -> Self {
        Self { entries, watermark }
    }

    /// Exact lookup, no interpolation between days.
    pub fn get(&self, date: DateKey) -> Option<Quantity> {
        self.entries.get(&date).copied()
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.entries.contains_key(&date)
    }

    /// Validates `liters` and writes it for `date`, replacing any previous value.
    /// The ledger is left untouched when validation fails.
    pub fn set(&mut self, date: DateKey, liters: f64) -> Result<()> {
        let quantity = Quantity::new(liters)?;
        self.set_quantity(date, quantity);
        Ok(())
    }

    /// Writes an already validated quantity. Advances the watermark when `date`
    /// is later than every day known so far.
    pub fn set_quantity(&mut self, date: DateKey, quantity: Quantity) {
        self.entries.insert(date, quantity);
        if self.watermark.map_or(true, |mark| date > mark) {
            self.watermark = Some(date);
        }
    }

    /// Unordered snapshot of every entry.
    pub fn all_entries(&self) -> Vec<(DateKey, Quantity)> {
        self.entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Latest recorded day, compared as calendar dates.
    pub fn latest_date(&self) -> Option<DateKey> {
        self.entries.keys().copied().max()
    }

    pub fn watermark(&self) -> Option<DateKey> {
        self.watermark
    }

    /// Replaces the watermark unconditionally; reconciliation may move it backwards.
    pub fn set_watermark(&mut self, date: DateKey) {
        self.watermark = Some(date);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
