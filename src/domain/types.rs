//! Strongly-typed value objects shared by the remote records.
//!
//! Enumerations mirror the spellings the backend puts on the wire, and the
//! string wrappers reject blank input so mutation payloads never carry
//! empty labels to the server.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value is not one of the accepted spellings.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided quantity is zero.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
}

/// Macro to generate closed enumerations with a fixed wire spelling.
macro_rules! wire_enum {
    ($name:ident, $doc:expr, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Spelling used by the backend.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(TypeConstraintError::InvalidValue(other.to_string())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum!(BloodType, "ABO/Rh blood group.", {
    APositive => "A+",
    ANegative => "A-",
    BPositive => "B+",
    BNegative => "B-",
    AbPositive => "AB+",
    AbNegative => "AB-",
    OPositive => "O+",
    ONegative => "O-",
});

wire_enum!(UserRole, "Role assigned to a platform account.", {
    Admin => "admin",
    Donor => "donor",
    Hospital => "hospital",
});

wire_enum!(UserStatus, "Account state of a platform user.", {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
});

wire_enum!(Urgency, "How soon a blood request has to be served.", {
    Low => "low",
    Normal => "normal",
    High => "high",
    Critical => "critical",
});

wire_enum!(RequestStatus, "Processing state of a blood request.", {
    Pending => "pending",
    Approved => "approved",
    Fulfilled => "fulfilled",
    Cancelled => "cancelled",
});

wire_enum!(Severity, "Severity level of a system alert.", {
    Info => "info",
    Warning => "warning",
    Critical => "critical",
});

impl RequestStatus {
    /// Whether the request still waits to be served.
    pub const fn is_open(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
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
    };
}

non_empty_string_newtype!(UserName, "Display name of a platform user.");

non_empty_string_newtype!(PatientName, "Patient name attached to a blood request.");

non_empty_string_newtype!(HospitalName, "Requesting hospital name.");

non_empty_string_newtype!(AlertTitle, "Headline of a system alert.");

/// Number of blood units, always at least one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct Units(u32);

impl Units {
    /// Rejects a zero quantity.
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if value == 0 {
            return Err(TypeConstraintError::ZeroQuantity);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Units {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Units> for u32 {
    fn from(value: Units) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_type_uses_backend_spelling() {
        assert_eq!("AB-".parse::<BloodType>(), Ok(BloodType::AbNegative));
        assert_eq!(BloodType::OPositive.to_string(), "O+");
        assert_eq!(
            serde_json::to_string(&BloodType::ANegative).unwrap(),
            "\"A-\""
        );
    }

    #[test]
    fn unknown_spelling_is_rejected() {
        assert_eq!(
            "superuser".parse::<UserRole>(),
            Err(TypeConstraintError::InvalidValue("superuser".to_string()))
        );
        assert!(serde_json::from_str::<Severity>("\"fatal\"").is_err());
    }

    #[test]
    fn urgency_orders_by_severity() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::Low < Urgency::Normal);
    }

    #[test]
    fn open_statuses() {
        assert!(RequestStatus::Pending.is_open());
        assert!(RequestStatus::Approved.is_open());
        assert!(!RequestStatus::Fulfilled.is_open());
        assert!(!RequestStatus::Cancelled.is_open());
    }

    #[test]
    fn non_empty_wrappers_trim_and_reject_blank() {
        assert_eq!(AlertTitle::new("  Low stock ").unwrap().as_str(), "Low stock");
        assert_eq!(PatientName::new("   "), Err(TypeConstraintError::EmptyString));
        assert!(serde_json::from_str::<HospitalName>("\"\"").is_err());
    }

    #[test]
    fn units_must_be_positive() {
        assert_eq!(Units::new(0), Err(TypeConstraintError::ZeroQuantity));
        assert_eq!(Units::new(3).unwrap().get(), 3);
        assert!(serde_json::from_str::<Units>("0").is_err());
    }
}
