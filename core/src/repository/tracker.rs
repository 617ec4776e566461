use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TrackerError};
use crate::model::{DateKey, Ledger, Quantity, Settings};
use crate::repository::traits::KeyValueStore;

pub const LEDGER_KEY: &str = "milkTrackerData";
pub const DEFAULT_QUANTITY_KEY: &str = "milkTrackerDefault";
pub const UNIT_PRICE_KEY: &str = "milkTrackerPrice";
pub const WATERMARK_KEY: &str = "lastUpdate";

/// Maps the ledger, watermark and settings onto their store keys.
pub struct TrackerRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TrackerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reads entries and watermark. An absent payload is an empty ledger.
    pub fn load_ledger(&self) -> Result<Ledger> {
        let entries = match self.read(LEDGER_KEY)? {
            Some(raw) => serde_json::from_str::<HashMap<DateKey, Quantity>>(&raw)
                .map_err(|err| TrackerError::malformed(LEDGER_KEY, err.to_string()))?,
            None => HashMap::new(),
        };
        let watermark = match self.read(WATERMARK_KEY)? {
            Some(raw) => Some(raw.parse::<DateKey>().map_err(|_| {
                TrackerError::malformed(WATERMARK_KEY, format!("`{}` is not a date", raw))
            })?),
            None => None,
        };
        Ok(Ledger::from_parts(entries, watermark))
    }

    /// Writes entries then watermark, stopping at the first failure.
    ///
    /// The watermark goes last so it never points past persisted entries. If only
    /// the watermark write fails, the stored watermark is older than the entries;
    /// the next reconcile then rescans days that are already filled, which only
    /// skips them.
    pub fn save_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        let sorted: BTreeMap<DateKey, Quantity> = ledger.all_entries().into_iter().collect();
        let payload = serde_json::to_string(&sorted)
            .map_err(|err| TrackerError::persistence(LEDGER_KEY, err.into()))?;
        self.write(LEDGER_KEY, &payload)?;

        match ledger.watermark() {
            Some(mark) => self.write(WATERMARK_KEY, &mark.to_string()),
            None => self
                .store
                .remove(WATERMARK_KEY)
                .map_err(|err| TrackerError::persistence(WATERMARK_KEY, err)),
        }
    }

    pub fn load_default_quantity(&self) -> Result<Option<f64>> {
        self.read_scalar(DEFAULT_QUANTITY_KEY)
    }

    pub fn load_unit_price(&self) -> Result<Option<f64>> {
        self.read_scalar(UNIT_PRICE_KEY)
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.write(
            DEFAULT_QUANTITY_KEY,
            &settings.default_quantity().liters().to_string(),
        )?;
        self.write(UNIT_PRICE_KEY, &settings.unit_price().to_string())
    }

    fn read(&self, key: &'static str) -> Result<Option<String>> {
        self.store
            .get(key)
            .map_err(|err| TrackerError::persistence(key, err))
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<()> {
        self.store
            .set(key, value)
            .map_err(|err| TrackerError::persistence(key, err))
    }

    fn read_scalar(&self, key: &'static str) -> Result<Option<f64>> {
        match self.read(key)? {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| TrackerError::malformed(key, format!("`{}` is not a number", raw))),
            None => Ok(None),
        }
    }
}
