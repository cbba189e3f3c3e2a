//! Strongly-typed ID wrappers for all record types
//!
//! Newtype wrappers keep invoice ids from being passed where an expense id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether user input refers to this ID
            ///
            /// Accepts the full UUID, the short display form (`inv-1a2b3c4d`)
            /// or any UUID prefix of at least four characters.
            pub fn matches(&self, input: &str) -> bool {
                let lowered = input.trim().to_ascii_lowercase();
                let input = lowered.strip_prefix($display_prefix).unwrap_or(&lowered);
                input.len() >= 4 && self.0.to_string().starts_with(input)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(InvoiceId, "inv-");
define_id!(ExpenseId, "exp-");
define_id!(BankTransactionId, "bnk-");
define_id!(EmployeeId, "emp-");
define_id!(ProductId, "prd-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = InvoiceId::new();
        let display = id.to_string();
        assert!(display.starts_with("inv-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short_and_full_forms() {
        let id = ExpenseId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();

        assert!(id.matches("exp-550e8400"));
        assert!(id.matches("550e"));
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches("55"));
        assert!(!id.matches("exp-deadbeef"));
    }

    #[test]
    fn test_id_serialization_is_bare_uuid() {
        let id = ProductId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
