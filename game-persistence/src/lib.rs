pub mod connection;
pub mod entities;
pub mod error;
pub mod file_store;
pub mod repositories;
pub mod stats_store;

pub use error::PersistenceError;
pub use file_store::JsonFileStatsStore;
pub use repositories::SeaOrmStatsStore;
pub use stats_store::{MemoryStatsStore, StatsStore};
