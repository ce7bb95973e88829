pub mod prelude;

pub mod daily_stats;
