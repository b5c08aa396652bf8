pub mod config;
pub mod profile;
pub mod report;
pub mod signal_score;
pub mod snapshot;
pub mod tier;
