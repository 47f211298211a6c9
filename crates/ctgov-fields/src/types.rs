//! Core data types for trial records and extracted field buckets.

use std::fmt;

/// Tags pulled out of a trial record by default.
pub const DEFAULT_TAGS: &[&str] = &["name", "country", "city", "state", "zip"];

/// Prefix prepended to every bucket key.
pub const KEY_PREFIX: &str = "ct";

/// Registry identifier of a single study record (an NCT number).
///
/// Opaque: the only check is that something is left after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrialIdentifier(String);

impl TrialIdentifier {
    /// Build an identifier, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TrialIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrialIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrialIdentifier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TrialIdentifier {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TrialIdentifier {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Extracted values grouped by derived key, in first-seen key order.
///
/// Only the extractor fills a bucket; callers get read-only access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBucket {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldBucket {
    /// Create an empty bucket set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values stored under `key`, if any element produced that key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate `(key, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of populated keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of values across all keys.
    pub fn total_values(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    /// Insert an empty sequence for `key` if absent and return its index.
    pub(crate) fn slot(&mut self, key: &str) -> usize {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        }
    }

    /// Append a value to the sequence at `slot`, returning its position in it.
    pub(crate) fn push_at(&mut self, slot: usize, value: String) -> usize {
        let values = &mut self.entries[slot].1;
        values.push(value);
        values.len() - 1
    }

    /// Overwrite a value previously reserved with [`FieldBucket::push_at`].
    pub(crate) fn set_at(&mut self, slot: usize, index: usize, value: String) {
        self.entries[slot].1[index] = value;
    }
}

/// Derive the bucket key for a tag: `"ct"` plus the tag with its first
/// character upper-cased.
pub fn bucket_key(tag: &str) -> String {
    let mut chars = tag.chars();
    let mut key = String::with_capacity(KEY_PREFIX.len() + tag.len());
    key.push_str(KEY_PREFIX);
    if let Some(first) = chars.next() {
        key.extend(first.to_uppercase());
        key.push_str(chars.as_str());
    }
    key
}

/// Failures while retrieving a trial record.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Request for {identifier} failed: {source}")]
    Request {
        identifier: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request for {identifier} timed out after {timeout_ms} ms")]
    Timeout { identifier: String, timeout_ms: u64 },

    #[error("Registry returned HTTP {status} for {identifier} ({url})")]
    Status {
        identifier: String,
        status: u16,
        url: String,
    },
}

impl FetchError {
    /// Identifier of the record that could not be fetched.
    pub fn identifier(&self) -> &str {
        match self {
            FetchError::Request { identifier, .. }
            | FetchError::Timeout { identifier, .. }
            | FetchError::Status { identifier, .. } => identifier,
        }
    }
}

/// Failures while reading the record XML.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("XML escape error at byte {position}: {message}")]
    Escape { position: u64, message: String },

    #[error("XML document ended with <{tag}> still open")]
    Unclosed { tag: String },

    #[error("XML document has no root element")]
    NoRootElement,
}

/// Invalid settings or input handed to the library.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL {value:?}: {message}")]
    InvalidBaseUrl { value: String, message: String },

    #[error("Invalid timeout {0:?}: expected a positive number of milliseconds")]
    InvalidTimeout(String),

    #[error("Trial identifier is empty")]
    EmptyIdentifier,

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

/// Any failure of a fetch-and-extract run.
#[derive(thiserror::Error, Debug)]
pub enum TrialError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result type.
pub type TrialResult<T> = Result<T, TrialError>;
