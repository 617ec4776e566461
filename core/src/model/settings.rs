use crate::error::{Result, TrackerError};
use crate::model::quantity::Quantity;

pub const DEFAULT_LITERS: f64 = 1.0;
pub const DEFAULT_PRICE_PER_LITER: f64 = 50.0;

/// User configuration: the liters assumed for a skipped day and the price per liter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    default_quantity: Quantity,
    unit_price: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_quantity: Quantity::new(DEFAULT_LITERS).unwrap_or_default(),
            unit_price: DEFAULT_PRICE_PER_LITER,
        }
    }
}

impl Settings {
    pub fn new(default_liters: f64, unit_price: f64) -> Result<Self> {
        let mut settings = Settings::default();
        settings.set_default_quantity(default_liters)?;
        settings.set_unit_price(unit_price)?;
        Ok(settings)
    }

    pub fn default_quantity(&self) -> Quantity {
        self.default_quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn set_default_quantity(&mut self, liters: f64) -> Result<()> {
        self.default_quantity = Quantity::new(liters)?;
        Ok(())
    }

    pub fn set_unit_price(&mut self, price: f64) -> Result<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(TrackerError::InvalidPrice(price));
        }
        self.unit_price = price;
        Ok(())
    }
}
