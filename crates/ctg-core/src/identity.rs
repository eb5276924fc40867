//! # Record Identifiers
//!
//! Every project record carries a UUID in `record_metadata.uuid`, and
//! relations point at other records by the same identifier. [`RecordId`]
//! keeps those identifiers from being confused with free-text strings.
//!
//! Only the hyphenated 8-4-4-4-12 form is accepted. The `uuid` crate would
//! also take the simple, braced and URN forms; record files never use them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CtgError;

/// Length of the hyphenated textual UUID form.
const HYPHENATED_LEN: usize = 36;

/// Unique identifier of a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the hyphenated textual form.
    ///
    /// Any UUID version is accepted, and hex digits may be upper or lower case.
    ///
    /// # Errors
    ///
    /// Returns [`CtgError::InvalidIdentifier`] for any other shape.
    pub fn parse(s: &str) -> Result<Self, CtgError> {
        if s.len() != HYPHENATED_LEN {
            return Err(CtgError::InvalidIdentifier {
                input: s.to_string(),
                reason: format!("expected {HYPHENATED_LEN} characters, got {}", s.len()),
            });
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|e| CtgError::InvalidIdentifier {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
