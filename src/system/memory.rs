//! Memory usage, from `/proc/meminfo`
//!
//! Documentation for the keys is taken from [proc_meminfo(5)][1].
//!
//! [1]: https://man7.org/linux/man-pages/man5/proc_meminfo.5.html
use crate::{
    error::{Error, Result},
    util::PROC_PATH,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Path of the meminfo file
pub fn meminfo_path() -> PathBuf {
    Path::new(PROC_PATH).join("meminfo")
}

/// A snapshot of `/proc/meminfo`
///
/// Most values are in kibibytes, despite the `kB` suffix. A few, such as
/// `HugePages_Total`, are plain counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemInfo {
    info: HashMap<String, u64>,
}

impl MemInfo {
    pub fn read() -> Result<Self> {
        Self::read_from(&meminfo_path())
    }

    /// Parse a file in the `/proc/meminfo` format
    ///
    /// # Errors
    ///
    /// - I/O
    /// - A line that isn't `Key: value [unit]`
    pub fn read_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.into(),
            source,
        })?;
        let malformed = |line: &str| Error::Malformed {
            path: path.into(),
            line: line.into(),
        };
        let mut info = HashMap::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let mut fields = line.split_whitespace();
            let (key, value) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
                (Some(key), Some(value), _, None) => (key, value),
                _ => return Err(malformed(line)),
            };
            let key = key.strip_suffix(':').ok_or_else(|| malformed(line))?;
            let value = value.parse::<u64>().map_err(|_| malformed(line))?;
            info.insert(key.to_owned(), value);
        }
        Ok(Self { info })
    }

    /// Value of any key, or [`None`] if this kernel doesn't report it.
    pub fn key(&self, key: &str) -> Option<u64> {
        self.info.get(key).copied()
    }

    /// Total usable RAM, physical RAM minus a few reserved bits and the
    /// kernel binary code.
    pub fn mem_total(&self) -> Option<u64> {
        self.key("MemTotal")
    }

    /// Sum of `LowFree` and `HighFree`.
    pub fn mem_free(&self) -> Option<u64> {
        self.key("MemFree")
    }

    /// Estimate of how much memory is available for starting new
    /// applications, without swapping.
    ///
    /// Since Linux 3.14
    pub fn mem_available(&self) -> Option<u64> {
        self.key("MemAvailable")
    }
}
