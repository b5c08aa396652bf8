pub mod git;
pub mod manifest;
pub mod scoring;
pub mod settings;
pub mod snapshot;
