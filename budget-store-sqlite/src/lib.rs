//! SQLite backend for the budget key-value store.

pub mod factory;
pub mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteStore;
