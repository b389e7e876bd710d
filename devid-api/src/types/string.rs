//! Constrained string value kinds.
//!
//! Each type keeps the exact text it was parsed from, so re-encoding a decoded value
//! yields the same bytes.

use chrono::{DateTime as ChronoDateTime, FixedOffset};
use regex::Regex;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, ops::Deref, str::FromStr, sync::OnceLock};

/// Common trait implementations for the newtype wrappers around `String`.
macro_rules! string_newtype {
    ($name:ident) => {
        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.into())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = Deserialize::deserialize(deserializer)?;
                Self::new(value).map_err(D::Error::custom)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// A value taken from a fixed set of codes: no leading or trailing whitespace and
/// no runs of whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(String);
string_newtype!(Code);

impl Code {
    pub fn new(code: String) -> Result<Self, &'static str> {
        static RE_CODE: OnceLock<Regex> = OnceLock::new();

        if !RE_CODE
            .get_or_init(|| Regex::new(r"^[^\s]+( [^\s]+)*$").expect("valid regex"))
            .is_match(&code)
        {
            Err("Invalid code")
        } else {
            Ok(Self(code))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A URI. Only checked for being non-empty and free of whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uri(String);
string_newtype!(Uri);

impl Uri {
    pub fn new(uri: String) -> Result<Self, &'static str> {
        if uri.is_empty() || uri.chars().any(char::is_whitespace) {
            Err("Invalid URI")
        } else {
            Ok(Self(uri))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// An ISO-8601 date-time with an explicit offset or `Z`.
///
/// Equality compares the original text, so `...Z` and `...+00:00` are different values
/// that denote the same instant (see [`DateTime::as_ref`] for the parsed value).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateTime {
    serialized: String,
    dt: ChronoDateTime<FixedOffset>,
}

impl DateTime {
    pub fn new(serialized: String) -> Result<Self, &'static str> {
        static RE_DATETIME: OnceLock<Regex> = OnceLock::new();

        // a full date and time with seconds and an explicit offset
        if !RE_DATETIME
            .get_or_init(|| {
                Regex::new(
                    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$",
                )
                .expect("valid regex")
            })
            .is_match(&serialized)
        {
            return Err("Invalid date-time");
        }
        let dt = ChronoDateTime::parse_from_rfc3339(&serialized).map_err(|_| "Invalid date-time")?;
        Ok(Self { serialized, dt })
    }

    pub fn as_str(&self) -> &str {
        self.serialized.as_str()
    }
}

impl FromStr for DateTime {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.into())
    }
}

impl From<ChronoDateTime<FixedOffset>> for DateTime {
    fn from(dt: ChronoDateTime<FixedOffset>) -> Self {
        Self { serialized: dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true), dt }
    }
}

impl AsRef<ChronoDateTime<FixedOffset>> for DateTime {
    fn as_ref(&self) -> &ChronoDateTime<FixedOffset> {
        &self.dt
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.serialized)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}
