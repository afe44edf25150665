//! Validated string types for identifiers and filenames

use crate::error::{ModsyncError, ModsyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable project name on the remote provider (e.g. a mod slug)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier, rejecting values that cannot be spliced into a URL path
    pub fn new(value: impl Into<String>) -> ModsyncResult<Self> {
        let value = value.into();
        let invalid = |reason: &str| ModsyncError::InvalidIdentifier {
            value: value.clone(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("must not contain whitespace"));
        }
        if value.contains(['/', '\\', '?', '#']) {
            return Err(invalid("must not contain '/', '\\', '?' or '#'"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = ModsyncError;

    fn try_from(value: String) -> ModsyncResult<Self> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a single artifact file inside the target directory
///
/// Always a bare file name, never a path, so joining it onto the target
/// directory cannot escape that directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Filename(String);

impl Filename {
    /// Create a filename, rejecting anything that is not a bare file name
    pub fn new(value: impl Into<String>) -> ModsyncResult<Self> {
        let value = value.into();
        let invalid = |reason: &str| ModsyncError::InvalidFilename {
            value: value.clone(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value == "." || value == ".." {
            return Err(invalid("must not be a relative directory"));
        }
        if value.contains(['/', '\\', '\0']) {
            return Err(invalid("must not contain path separators"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the filename carries the given extension (without dot)
    pub fn has_extension(&self, extension: &str) -> bool {
        self.0
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == extension)
    }
}

impl TryFrom<String> for Filename {
    type Error = ModsyncError;

    fn try_from(value: String) -> ModsyncResult<Self> {
        Self::new(value)
    }
}

impl From<Filename> for String {
    fn from(name: Filename) -> Self {
        name.0
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
