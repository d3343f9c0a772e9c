// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod styles;
pub mod tables;

pub use matcher::{MatchLimits, MatchLists, Matcher};
pub use scoring::{amateur_score, pro_am_score, score, select_mode};
pub use styles::{closest_shared_level_distance, level_distance, levels_within, shared_styles};
