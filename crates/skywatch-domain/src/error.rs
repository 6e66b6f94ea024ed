use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Reading store error: {0}")]
    ReadingStoreError(#[from] anyhow::Error),

    #[error("Narrative generation error: {0}")]
    NarrativeError(String),

    #[error("Narrative credentials missing")]
    NarrativeCredentialsMissing,

    #[error("Publish error on topic {topic}: {reason}")]
    PublishError { topic: String, reason: String },

    #[error("Unknown condition profile: {0} (expected one of: cold, cool, moderate, hot)")]
    UnknownConditionProfile(String),
}
