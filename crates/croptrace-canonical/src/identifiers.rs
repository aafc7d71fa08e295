use chrono::{NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype!(
    BatchId,
    "Business key for a produce batch (URL-safe, e.g. `BCH001`).",
    r"^[A-Za-z0-9_-]{1,64}$"
);
newtype!(
    EventId,
    "Identifier for a supply-chain event (URL-safe).",
    r"^[A-Za-z0-9_-]{1,64}$"
);
newtype!(
    CertificateId,
    "Identifier for an issued certificate (URL-safe).",
    r"^[A-Za-z0-9_-]{1,64}$"
);
newtype!(
    IpfsHash,
    "Opaque content identifier (CIDv0/CIDv1-shaped, not resolved here).",
    r"^[A-Za-z0-9]{1,128}$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

impl Timestamp {
    /// Captures the current UTC time in canonical form.
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Calendar date (`YYYY-MM-DD`) on which a batch was harvested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestDate(String);

impl HarvestDate {
    /// Parses a validated calendar date from a string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if NaiveDate::parse_from_str(&s, "%Y-%m-%d").is_err() {
            return Err(ValidationError::InvalidDate {
                field: "HarvestDate",
                value: s,
            });
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for HarvestDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_id_accepts_url_safe_keys() {
        assert!(BatchId::parse("BCH001").is_ok());
        assert!(BatchId::parse("batch_2024-01").is_ok());
    }

    #[test]
    fn batch_id_rejects_unsafe_characters() {
        assert!(BatchId::parse("BCH 001").is_err());
        assert!(BatchId::parse("bch/../etc").is_err());
        assert!(BatchId::parse("").is_err());
    }

    #[test]
    fn timestamp_accepts_fractional_seconds() {
        assert!(Timestamp::parse("2024-01-15T08:30:00Z").is_ok());
        assert!(Timestamp::parse("2024-01-15T08:30:00.123Z").is_ok());
        assert!(Timestamp::parse("2024-01-15 08:30:00").is_err());
    }

    #[test]
    fn timestamp_now_is_canonical() {
        let now = Timestamp::now();
        assert!(Timestamp::parse(now.as_ref().to_string()).is_ok());
    }

    #[test]
    fn harvest_date_rejects_impossible_dates() {
        assert!(HarvestDate::parse("2024-01-15").is_ok());
        assert!(HarvestDate::parse("2024-02-30").is_err());
        assert!(HarvestDate::parse("not-a-date").is_err());
    }
}
