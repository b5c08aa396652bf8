pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;
pub mod scoring;

pub use commands::scoring::{score_batch, score_snapshot, score_with_extractors};
pub use error::{MaturityError, Result};
pub use models::report::ScoringReport;
pub use models::snapshot::RepositorySnapshot;
pub use scoring::ScoringConfig;
