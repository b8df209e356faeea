use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown schedule bucket `{name}`")]
    UnknownBucket { name: String },
    #[error("`{input}` is neither an ISO-8601 timestamp nor a calendar date")]
    InvalidTime { input: String },
}

impl DomainError {
    pub fn unknown_bucket(name: impl Into<String>) -> Self {
        Self::UnknownBucket { name: name.into() }
    }

    pub fn invalid_time(input: impl Into<String>) -> Self {
        Self::InvalidTime {
            input: input.into(),
        }
    }
}
