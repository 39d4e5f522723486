//! Error handling stuff
use displaydoc::Display;
use std::{io, num::ParseIntError, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for everything in [`linstat`][crate]
#[derive(Debug, Display, Error)]
pub enum Error {
    /// IO Failed: {0}
    Io(#[from] io::Error),

    /// Couldn't read attribute `{path:?}`: {source}
    Read { path: PathBuf, source: io::Error },

    /// Attribute `{path:?}` was not an integer: {source}
    ParseInt {
        path: PathBuf,
        source: ParseIntError,
    },

    /// Malformed line in `{path:?}`: `{line}`
    Malformed { path: PathBuf, line: String },

    /// Invalid device pattern: {0}
    Pattern(#[from] glob::PatternError),

    /// Couldn't enumerate devices: {0}
    Walk(#[from] walkdir::Error),

    /// Change notification failed: {0}
    Notify(#[from] notify::Error),

    /// Change notifier stopped delivering events
    NotifierClosed,

    /// System call failed: {0}
    Sys(#[from] nix::Error),

    /// Unknown user `{0}`
    UnknownUser(String),

    /// Unknown group id `{0}`
    UnknownGroup(u32),
}

// Every session of a `Watches` reports through the same channel, so the
// device is carried along with the error.
/// Watching device `{device}` failed: {source}
#[derive(Debug, Display, Error)]
pub struct WatchError {
    device: String,
    source: Error,
}

impl WatchError {
    pub(crate) fn new(device: impl Into<String>, source: Error) -> Self {
        Self {
            device: device.into(),
            source,
        }
    }

    /// Basename of the device whose session failed
    pub fn device(&self) -> &str {
        &self.device
    }

    /// The underlying failure
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Split into the device name and the underlying failure
    pub fn into_parts(self) -> (String, Error) {
        (self.device, self.source)
    }
}

/// Error text.
pub(crate) mod text {
    pub const PATH_UTF8: &str = "device name is not valid utf-8";
}
