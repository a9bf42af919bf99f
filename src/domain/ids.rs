//! Resource identifiers
//!
//! Arrays and volumes are addressed by integer ids. Path segments are parsed
//! into these newtypes so that ownership comparisons happen on the canonical
//! integer form, never on raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a path segment is not a valid id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid identifier: {0}")]
pub struct InvalidId(pub String);

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| InvalidId(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Identifier of a virtual storage array
    ArrayId
);

integer_id!(
    /// Identifier of a volume or drive
    VolumeId
);

integer_id!(
    /// Identifier of an instance type descriptor
    InstanceTypeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_id() {
        assert_eq!("5".parse::<ArrayId>(), Ok(ArrayId(5)));
        assert_eq!(" 42 ".parse::<ArrayId>(), Ok(ArrayId(42)));
    }

    #[test]
    fn test_parse_rejects_non_integer() {
        let err = "abc".parse::<VolumeId>().unwrap_err();
        assert_eq!(err, InvalidId("abc".to_string()));
        assert!("5.0".parse::<VolumeId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&ArrayId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
