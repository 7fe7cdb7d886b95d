use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Portable Document Format.
pub const TYPE_PDF: &str = "PDF";

/// Portable Executable (Windows binaries).
pub const TYPE_PE: &str = "PE";

/// Every recognized type tag, in declaration order.
pub const VALID_ASSET_TYPES: &[&str] = &[TYPE_PDF, TYPE_PE];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Content classification of an asset. Stored as its literal tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "PE")]
    Pe,
}

impl AssetType {
    /// Return the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => TYPE_PDF,
            Self::Pe => TYPE_PE,
        }
    }

    /// Parse a raw tag. Matching is case-sensitive.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            TYPE_PDF => Ok(Self::Pdf),
            TYPE_PE => Ok(Self::Pe),
            other => Err(CoreError::InvalidEnumValue {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for AssetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
