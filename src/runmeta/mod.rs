pub mod git;
pub mod metadata;

pub use metadata::RunMetadata;
