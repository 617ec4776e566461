use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TrackerError};

/// Liters delivered on one day. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Quantity(f64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0.0);

    pub fn new(liters: f64) -> Result<Self> {
        if liters.is_finite() && liters >= 0.0 {
            // normalize -0.0
            Ok(Self(liters + 0.0))
        } else {
            Err(TrackerError::InvalidQuantity(liters))
        }
    }

    pub fn liters(&self) -> f64 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let liters = f64::deserialize(deserializer)?;
        Quantity::new(liters).map_err(serde::de::Error::custom)
    }
}
