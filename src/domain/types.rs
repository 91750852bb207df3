//! Strongly-typed value objects used by domain entities.
//!
//! Identifiers are opaque strings assigned by the remote API. The wrappers
//! reject blank values so that a record id or a parent scope reaching the
//! service layer can be trusted to address something.
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier contained no non-whitespace characters.
    #[error("id cannot be empty")]
    EmptyId,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Common behaviour of record identifiers, used by generic repositories and
/// screen controllers.
pub trait RecordId:
    Clone + std::fmt::Debug + Display + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// Parses a raw identifier, rejecting blank input.
    fn parse(value: &str) -> Result<Self, TypeConstraintError>;

    /// Borrow the identifier as a string slice.
    fn as_str(&self) -> &str;
}

/// Identifier as it may appear on the wire: the API is not consistent about
/// quoting numeric ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(value) => value,
            RawId::Number(value) => value.to_string(),
        }
    }
}

/// Macro to generate lightweight newtypes for remote identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier ensuring it is not blank.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    Err(TypeConstraintError::EmptyId)
                } else {
                    Ok(Self(trimmed))
                }
            }

            /// Borrow the identifier as a `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the owned inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl RecordId for $name {
            fn parse(value: &str) -> Result<Self, TypeConstraintError> {
                Self::new(value)
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = RawId::deserialize(deserializer)?;
                Self::new(raw.into_string()).map_err(de::Error::custom)
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client.");
id_newtype!(JobId, "Unique identifier for a job.");
id_newtype!(PaymentId, "Unique identifier for a payment.");

/// Lifecycle status of a job.
///
/// The wire spelling is the underscored Italian key. The spaced variant seen
/// in older payloads is accepted on read only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "in_corso", alias = "in corso")]
    InProgress,
    #[serde(rename = "completato")]
    Completed,
    #[serde(rename = "sospeso")]
    Suspended,
    #[serde(rename = "annullato")]
    Cancelled,
}

impl JobStatus {
    /// Every status, in the order the status picker presents them.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Suspended,
        JobStatus::Cancelled,
    ];

    /// Wire key for this status.
    pub const fn key(self) -> &'static str {
        match self {
            JobStatus::InProgress => "in_corso",
            JobStatus::Completed => "completato",
            JobStatus::Suspended => "sospeso",
            JobStatus::Cancelled => "annullato",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for JobStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in_corso" | "in corso" => Ok(JobStatus::InProgress),
            "completato" => Ok(JobStatus::Completed),
            "sospeso" => Ok(JobStatus::Suspended),
            "annullato" => Ok(JobStatus::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown job status `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_rejects_blank_values() {
        assert_eq!(ClientId::new("   "), Err(TypeConstraintError::EmptyId));
        assert_eq!(ClientId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn id_deserializes_from_number_or_string() {
        let from_number: JobId = serde_json::from_str("7").unwrap();
        let from_text: JobId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<JobId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"7\"");
    }

    #[test]
    fn status_uses_underscored_keys() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"in_corso\""
        );
        let legacy: JobStatus = serde_json::from_str("\"in corso\"").unwrap();
        assert_eq!(legacy, JobStatus::InProgress);
        assert_eq!("sospeso".parse::<JobStatus>(), Ok(JobStatus::Suspended));
        assert!("paused".parse::<JobStatus>().is_err());
    }
}
