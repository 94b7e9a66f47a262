#![forbid(unsafe_code)]

//! Persisted flags.
//!
//! A flag is a named value that survives page reloads (in the browser it
//! lives in `localStorage`). Readers must distinguish "never written" from
//! any written value, so reads return `Option`.
//!
//! [`FlagStore`] is the storage seam: the web crate backs it with
//! `localStorage`, tests and the headless host use [`MemoryFlagStore`].

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Storage backend for persisted flags.
pub trait FlagStore {
    /// Read the raw value stored under `key`. `None` means unset.
    fn read_raw(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), FlagError>;
}

/// Errors from a flag backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// The backend cannot be reached (e.g. storage disabled by the browser).
    Unavailable,
    /// The backend refused the write (quota, private mode).
    WriteRejected { key: String, reason: String },
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "flag storage unavailable"),
            Self::WriteRejected { key, reason } => {
                write!(f, "write to flag {key:?} rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for FlagError {}

/// A value that can be stored in a flag.
pub trait FlagValue: Sized {
    /// Encode for storage.
    fn encode(&self) -> &'static str;

    /// Decode a stored value. `None` for unrecognized strings.
    fn decode(raw: &str) -> Option<Self>;
}

impl FlagValue for bool {
    fn encode(&self) -> &'static str {
        if *self { "true" } else { "false" }
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

/// Typed handle to a flag stored under a fixed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFlag<T> {
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T: FlagValue> PersistedFlag<T> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether anything has been written under this key, parseable or not.
    pub fn is_set(&self, store: &(impl FlagStore + ?Sized)) -> bool {
        store.read_raw(&self.key).is_some()
    }

    /// Typed read. Unset and unrecognized values both read as `None`.
    pub fn read(&self, store: &(impl FlagStore + ?Sized)) -> Option<T> {
        let raw = store.read_raw(&self.key)?;
        let value = T::decode(&raw);
        if value.is_none() {
            tracing::debug!(key = %self.key, raw = %raw, "ignoring unrecognized flag value");
        }
        value
    }

    pub fn write(&self, store: &mut (impl FlagStore + ?Sized), value: &T) -> Result<(), FlagError> {
        store.write_raw(&self.key, value.encode())
    }
}

/// In-memory flag store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFlagStore {
    values: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like storage in some private modes.
    pub fn read_only() -> Self {
        Self {
            values: BTreeMap::new(),
            read_only: true,
        }
    }

    /// Seed a raw value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FlagStore for MemoryFlagStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), FlagError> {
        if self.read_only {
            return Err(FlagError::WriteRejected {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
