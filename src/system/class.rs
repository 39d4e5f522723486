//! Abstractions for handling certain classes of device
//!
//! A "class" is a specific kernel subsystem, exposed as a directory of
//! devices under `/sys/class`.
//!
//! Every device is itself a directory of attribute files, most holding a
//! single value. Classes whose attributes are tracked as a unit implement
//! [`Snapshot`], which is also what the [watcher][crate::watch] works with.
//!
//! See the [sysfs rules][1] for details
//!
//! [1]: https://www.kernel.org/doc/html/latest/admin-guide/sysfs-rules.html
use crate::{
    error::{text, Error, Result},
    util::{read_int, read_str, SYSFS_PATH},
};
use std::{collections::HashMap, io, path::Path};
use walkdir::WalkDir;

pub mod backlight;
pub mod power_supply;

pub use self::{
    backlight::Backlight,
    power_supply::{Battery, PowerSupply},
};

/// How an [`Attribute`] file is read
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Decimal integer
    Int,

    /// Short token, such as a state name
    Str,
}

/// A value read from an [`Attribute`] file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
}

/// A single-valued attribute file tracked by a [`Snapshot`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// File name, relative to the device directory
    pub name: &'static str,

    /// How the file is read
    pub kind: Kind,
}

impl Attribute {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Int,
        }
    }

    pub const fn str(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Str,
        }
    }

    /// Read this attribute for the device at `dir`
    pub fn read(&self, dir: &Path) -> Result<Value> {
        let path = dir.join(self.name);
        Ok(match self.kind {
            Kind::Int => Value::Int(read_int(&path)?),
            Kind::Str => Value::Str(read_str(&path)?),
        })
    }
}

/// The state of one device at one instant.
///
/// Implementors list the attribute files they are made of in
/// [`Snapshot::ATTRIBUTES`], and know how to store one freshly read
/// [`Value`] with [`Snapshot::set`].
/// Everything else is provided.
pub trait Snapshot: Clone + Default + Send + Sync + 'static {
    /// Every attribute file making up this snapshot, relative to the device
    /// directory.
    const ATTRIBUTES: &'static [Attribute];

    /// Store `value` for the attribute `name`.
    ///
    /// Only called with names from [`Snapshot::ATTRIBUTES`], and values of
    /// the matching [`Kind`].
    fn set(&mut self, name: &str, value: Value);

    /// Look up a tracked attribute by file name.
    fn attribute(name: &str) -> Option<&'static Attribute> {
        Self::ATTRIBUTES.iter().find(|a| a.name == name)
    }

    /// Read every tracked attribute of the device at `dir`.
    fn read_dir(dir: &Path) -> Result<Self> {
        let mut snap = Self::default();
        for attr in Self::ATTRIBUTES {
            snap.set(attr.name, attr.read(dir)?);
        }
        Ok(snap)
    }

    /// A copy of this snapshot with only `attr` re-read from `dir`.
    fn reread(&self, dir: &Path, attr: &Attribute) -> Result<Self> {
        let value = attr.read(dir)?;
        let mut snap = self.clone();
        snap.set(attr.name, value);
        Ok(snap)
    }
}

/// Basenames of the entries directly under `base` matching the glob
/// `pattern`.
///
/// Returned in directory order, which is not sorted.
///
/// # Errors
///
/// - If `pattern` is invalid
/// - If `base` can't be read
pub fn devices(base: &Path, pattern: &str) -> Result<Vec<String>> {
    let pattern = glob::Pattern::new(pattern)?;
    let mut v = Vec::new();
    for entry in WalkDir::new(base).min_depth(1).max_depth(1) {
        let entry = entry?;
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::Io(io::Error::new(io::ErrorKind::InvalidData, text::PATH_UTF8)))?;
        if pattern.matches(name) {
            v.push(name.to_owned());
        }
    }
    Ok(v)
}

/// Path of the class directory `class` under [`SYSFS_PATH`]
pub(crate) fn class_path(class: &str) -> std::path::PathBuf {
    Path::new(SYSFS_PATH).join("class").join(class)
}

/// Read a [`Snapshot`] of every device under `base` matching `pattern`.
pub(crate) fn read_all<S: Snapshot>(base: &Path, pattern: &str) -> Result<Vec<(String, S)>> {
    devices(base, pattern)?
        .into_iter()
        .map(|name| {
            let snap = S::read_dir(&base.join(&name))?;
            Ok((name, snap))
        })
        .collect()
}

/// Assert [`Snapshot::set`] stores every one of `S::ATTRIBUTES`, each in a
/// field of its own.
#[cfg(test)]
pub(crate) fn assert_attributes_settable<S: Snapshot + PartialEq + std::fmt::Debug>() {
    let set: Vec<S> = S::ATTRIBUTES
        .iter()
        .map(|attr| {
            let mut snap = S::default();
            snap.set(attr.name, match attr.kind {
                Kind::Int => Value::Int(7),
                Kind::Str => Value::Str("x".into()),
            });
            assert_ne!(snap, S::default(), "{} was not stored", attr.name);
            snap
        })
        .collect();
    for (i, a) in set.iter().enumerate() {
        for b in &set[i + 1..] {
            assert_ne!(a, b, "two attributes share a field");
        }
    }
}

/// Raw `KEY=VALUE` attributes of a device, usually from its `uevent` file.
///
/// Which keys exist depends on the device and its driver, so every accessor
/// reports whether the key was present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    values: HashMap<String, String>,
}

impl AttributeBag {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw value of `key`, or [`None`] if the device doesn't have it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of `key` as an integer.
    ///
    /// [`None`] if the device doesn't have it, or it isn't an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.parse().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over every key and raw value, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, fs};

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Dial {
        level: i64,
        mode: String,
    }

    impl Snapshot for Dial {
        const ATTRIBUTES: &'static [Attribute] = &[Attribute::int("level"), Attribute::str("mode")];

        fn set(&mut self, name: &str, value: Value) {
            match (name, value) {
                ("level", Value::Int(v)) => self.level = v,
                ("mode", Value::Str(v)) => self.mode = v,
                (name, value) => unreachable!("{name} = {value:?}"),
            }
        }
    }

    #[test]
    fn attributes_settable() {
        assert_attributes_settable::<Dial>();
    }

    #[test]
    fn devices_glob() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["BAT0", "BAT1", "AC", "ucsi-source-psy-USBC000:001"] {
            fs::create_dir(dir.path().join(name))?;
        }
        let all: HashSet<_> = devices(dir.path(), "*")?.into_iter().collect();
        assert_eq!(all.len(), 4);

        let bats: HashSet<_> = devices(dir.path(), "BAT*")?.into_iter().collect();
        assert_eq!(bats, HashSet::from(["BAT0".to_owned(), "BAT1".to_owned()]));

        assert!(devices(dir.path(), "nothing*")?.is_empty());
        Ok(())
    }

    #[test]
    fn devices_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(matches!(devices(dir.path(), "[*"), Err(Error::Pattern(_))));
        assert!(matches!(
            devices(&dir.path().join("missing"), "*"),
            Err(Error::Walk(_))
        ));
        Ok(())
    }

    #[test]
    fn snapshot_read_and_reread() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("level"), "50\n")?;
        fs::write(dir.path().join("mode"), "auto\n")?;

        let snap = Dial::read_dir(dir.path())?;
        assert_eq!(
            snap,
            Dial {
                level: 50,
                mode: "auto".into()
            }
        );

        fs::write(dir.path().join("level"), "75\n")?;
        fs::write(dir.path().join("mode"), "manual\n")?;
        let attr = Dial::attribute("level").ok_or("level is tracked")?;
        let next = snap.reread(dir.path(), attr)?;
        // Only the re-read attribute changes
        assert_eq!(
            next,
            Dial {
                level: 75,
                mode: "auto".into()
            }
        );
        assert!(Dial::attribute("uevent").is_none());
        Ok(())
    }

    #[test]
    fn snapshot_missing_attribute() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("level"), "50\n")?;
        assert!(matches!(Dial::read_dir(dir.path()), Err(Error::Read { .. })));
        Ok(())
    }

    #[test]
    fn bag() {
        let bag = AttributeBag::new(HashMap::from([
            ("POWER_SUPPLY_CAPACITY".to_owned(), "88".to_owned()),
            ("POWER_SUPPLY_STATUS".to_owned(), "Charging".to_owned()),
        ]));
        assert_eq!(bag.get("POWER_SUPPLY_STATUS"), Some("Charging"));
        assert_eq!(bag.get_int("POWER_SUPPLY_CAPACITY"), Some(88));
        assert_eq!(bag.get_int("POWER_SUPPLY_STATUS"), None);
        assert_eq!(bag.get("POWER_SUPPLY_NAME"), None);
        assert!(bag.contains("POWER_SUPPLY_CAPACITY"));
        assert_eq!(bag.iter().count(), 2);
    }
}
