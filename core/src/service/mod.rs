pub mod reconcile;
pub mod summary;
pub mod tracker_service;


pub use reconcile::{ReconcileReport, Reconciler};
pub use summary::{month_entries, summarize};
pub use tracker_service::{MilkTracker, TrackerState};
