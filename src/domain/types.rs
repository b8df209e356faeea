//! Shared domain enumerations.

use std::{fmt, str::FromStr};

use super::error::DomainError;

/// Named classification of a schedule entry relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    All,
    Previous,
    Now,
    UpNext,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::All => "all",
            Bucket::Previous => "previous",
            Bucket::Now => "now",
            Bucket::UpNext => "upnext",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Bucket::All),
            "previous" => Ok(Bucket::Previous),
            "now" => Ok(Bucket::Now),
            "upnext" => Ok(Bucket::UpNext),
            other => Err(DomainError::unknown_bucket(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_round_trip_through_from_str() {
        for bucket in [Bucket::All, Bucket::Previous, Bucket::Now, Bucket::UpNext] {
            assert_eq!(bucket.as_str().parse::<Bucket>(), Ok(bucket));
        }
    }

    #[test]
    fn unknown_bucket_name_is_rejected() {
        assert_eq!(
            "later".parse::<Bucket>(),
            Err(DomainError::unknown_bucket("later"))
        );
        assert!("Now".parse::<Bucket>().is_err());
    }
}
