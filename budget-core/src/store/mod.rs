pub mod factory;
pub mod memory;
pub mod persist;
pub mod repository;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use repository::{DEFAULT_TTL_DAYS, KeyValueStore, StoreError, Ttl};
