pub mod file;
pub mod memory;
pub mod tracker;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use tracker::TrackerRepository;
pub use traits::{KeyValueStore, StoreError};
