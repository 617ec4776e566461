use thiserror::Error;

use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Failures surfaced by the tracker core. None of them are fatal to the process.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid quantity {0}: liters must be a finite, non-negative number")]
    InvalidQuantity(f64),

    #[error("invalid price {0}: price per liter must be a finite, non-negative number")]
    InvalidPrice(f64),

    #[error("could not persist `{key}`: {source}")]
    Persistence {
        key: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("stored value for `{key}` is malformed: {reason}")]
    MalformedStoredData { key: &'static str, reason: String },

    #[error("could not parse date: {0}")]
    InvalidDate(String),

    #[error("could not parse month: {0}")]
    InvalidMonth(String),
}

impl TrackerError {
    pub fn persistence(key: &'static str, source: StoreError) -> Self {
        TrackerError::Persistence { key, source }
    }

    pub fn malformed(key: &'static str, reason: impl Into<String>) -> Self {
        TrackerError::MalformedStoredData {
            key,
            reason: reason.into(),
        }
    }

    /// True for failures raised while writing or reading the store.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            TrackerError::Persistence { .. } | TrackerError::MalformedStoredData { .. }
        )
    }
}
