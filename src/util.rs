//! Utility functions
use crate::error::{Error, Result};
use std::{collections::HashMap, fs, path::Path};

/// Technically Linux requires sysfs to be at `/sys`, calling it a system
/// configuration error otherwise.
///
/// But theres an upcoming distro planning to experiment with filesystem layout
/// changes, including of `/sys`, so do this to allow easily changing it.
pub const SYSFS_PATH: &str = "/sys";

/// procfs location. Same reasons as [`SYSFS_PATH`].
pub const PROC_PATH: &str = "/proc";

/// Read a single-line attribute file.
///
/// Exactly one trailing line terminator is removed, anything else is kept
/// as-is.
pub fn read_str(path: &Path) -> Result<String> {
    let mut s = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.into(),
        source,
    })?;
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    Ok(s)
}

/// Read a single-line attribute file containing a decimal integer.
pub fn read_int(path: &Path) -> Result<i64> {
    read_str(path)?
        .parse::<i64>()
        .map_err(|source| Error::ParseInt {
            path: path.into(),
            source,
        })
}

/// Read a uevent file, or anything else made of `KEY=VALUE` lines.
///
/// # Arguments
///
/// - `path`, path to the uevent file.
///
/// # Errors
///
/// - I/O
/// - A non-empty line without a `=`
pub fn read_uevent(path: &Path) -> Result<HashMap<String, String>> {
    let data = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.into(),
        source,
    })?;
    let mut map = HashMap::new();
    for line in data.lines().filter(|l| !l.is_empty()) {
        let (key, val) = line.split_once('=').ok_or_else(|| Error::Malformed {
            path: path.into(),
            line: line.into(),
        })?;
        map.insert(key.into(), val.into());
    }
    Ok(map)
}
