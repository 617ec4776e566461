//! Daily milk delivery ledger: date-keyed entries, gap backfill up to yesterday,
//! and monthly billing summaries.

pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use error::{Result, TrackerError};
pub use model::{DateKey, Ledger, MonthlySummary, Quantity, Settings};
pub use repository::{FileStore, KeyValueStore, MemoryStore, StoreError, TrackerRepository};
pub use service::{summarize, MilkTracker, ReconcileReport, Reconciler, TrackerState};
pub use time::{parse_day, parse_month, Clock, FixedClock, SystemClock};
