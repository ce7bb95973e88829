pub use super::daily_stats::Entity as DailyStats;
