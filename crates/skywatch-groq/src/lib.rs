mod generator;
mod prompt;

pub use generator::{GroqConfig, GroqNarrativeGenerator};
pub use prompt::snapshot_prompt;
