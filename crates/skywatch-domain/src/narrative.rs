use crate::error::DomainResult;
use crate::snapshot::Snapshot;
use async_trait::async_trait;

/// Trait for producing the one-sentence summary attached to a report
///
/// Implementations should:
/// - Build a prompt from the snapshot, placeholders included for absent
///   channels
/// - Return the generated sentence, trimmed
/// - Return error on transport failure or missing credentials; callers
///   degrade to the static fallback sentence
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn summarize(&self, snapshot: &Snapshot) -> DomainResult<String>;
}
