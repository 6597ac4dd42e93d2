//! Identifier types for stored documents.
//!
//! Every document written to the store is keyed by a ULID so that iteration
//! over a collection follows insertion order. That ordering is what makes
//! "first match" well defined for payment and catalog lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use ulid::{Generator, Ulid};

/// Shared so that ids minted within the same millisecond still sort in
/// creation order.
static GENERATOR: Mutex<Generator> = Mutex::new(Generator::new());

fn next_ulid() -> Ulid {
    let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);
    // Overflow needs 2^80 ids in one millisecond.
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

/// Defines a ULID-backed document identifier with the usual trait set.
macro_rules! ulid_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier stamped with the current time.
            ///
            /// Identifiers generated later always compare greater.
            #[must_use]
            pub fn generate() -> Self {
                Self(next_ulid())
            }

            /// Return the 16-byte big-endian encoding used as a store key.
            #[must_use]
            pub fn to_bytes(&self) -> [u8; 16] {
                self.0.to_bytes()
            }

            /// Rebuild an identifier from its store key encoding.
            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Ulid::from_bytes(bytes))
            }

            /// Rebuild an identifier from a key slice.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::InvalidLength`] unless the slice is exactly 16 bytes.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
                let array: [u8; 16] = bytes.try_into().map_err(|_| IdError::InvalidLength {
                    actual: bytes.len(),
                })?;
                Ok(Self::from_bytes(array))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s)
                    .map(Self)
                    .map_err(|_| IdError::InvalidUlid)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

ulid_id_type!(RecordId, "Store key of a captured payment record.");
ulid_id_type!(CatalogId, "Store key of a catalog item.");

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid ULID string.
    #[error("invalid ULID format")]
    InvalidUlid,

    /// A key slice had the wrong length.
    #[error("invalid key length: expected 16 bytes, got {actual}")]
    InvalidLength {
        /// Length of the rejected slice.
        actual: usize,
    },
}
