pub mod date_key;
pub mod ledger;
pub mod quantity;
pub mod settings;
pub mod summary;

pub use date_key::DateKey;
pub use ledger::Ledger;
pub use quantity::Quantity;
pub use settings::Settings;
pub use summary::MonthlySummary;
