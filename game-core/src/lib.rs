pub mod daily_stats;
pub mod game_state;
pub mod scoring;
pub mod word_validation;

// Re-export main components
pub use daily_stats::*;
pub use game_state::*;
pub use scoring::*;
pub use word_validation::*;
