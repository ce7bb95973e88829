pub mod stats_repository;

pub use stats_repository::SeaOrmStatsStore;
