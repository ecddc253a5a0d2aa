//! External student identifiers.
//!
//! Clients see a student's identity as the 24-character hexadecimal form of
//! the ObjectId the store assigned at creation. [`StudentId`] is the only way
//! handlers turn a path segment into something the store can be queried with,
//! so malformed input is rejected before any store call is made.

use std::{fmt, str::FromStr};

use bson::oid::ObjectId;
use thiserror::Error;

/// The raw path segment is not a valid student identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a valid student id")]
pub struct InvalidIdentifier {
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentId(ObjectId);

impl StudentId {
    /// Validates and converts an external identifier.
    pub fn decode(raw: &str) -> Result<Self, InvalidIdentifier> {
        raw.parse()
    }

    /// Renders the identifier in its external, lowercase hexadecimal form.
    pub fn encode(&self) -> String {
        self.0.to_hex()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for StudentId {
    type Err = InvalidIdentifier;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(StudentId)
            .map_err(|_| InvalidIdentifier { raw: raw.to_string() })
    }
}

impl From<ObjectId> for StudentId {
    fn from(id: ObjectId) -> Self {
        StudentId(id)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
