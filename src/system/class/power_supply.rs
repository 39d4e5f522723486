//! Abstraction for handling devices in the power_supply class
//!
//! # Implementation
//!
//! Which attributes a power supply has depends heavily on its type and
//! driver, so [`PowerSupply`] keeps the `uevent` contents as an
//! [`AttributeBag`] rather than a struct per supply type.
//!
//! See the [kernel docs][1] for the meaning of the attributes.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-class-power
use super::{class_path, devices, read_all, Attribute, AttributeBag, Snapshot, Value};
use crate::{
    error::Result,
    util::read_uevent,
    watch::{Registry, Watches},
};
use std::path::{Path, PathBuf};

/// Directory holding every power supply device
pub fn power_supply_path() -> PathBuf {
    class_path("power_supply")
}

/// Glob matching batteries in [`power_supply_path`]
pub const BATTERY_PATTERN: &str = "BAT*";

/// A power supply, as described by its `uevent` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSupply {
    attrs: AttributeBag,
}

impl PowerSupply {
    /// Read the power supply `name`
    pub fn read(name: &str) -> Result<Self> {
        Self::read_in(&power_supply_path(), name)
    }

    /// Like [`PowerSupply::read`], for power supplies under `base`.
    pub fn read_in(base: &Path, name: &str) -> Result<Self> {
        Ok(Self {
            attrs: AttributeBag::new(read_uevent(&base.join(name).join("uevent"))?),
        })
    }

    /// Read every power supply matching the glob `pattern`.
    pub fn all(pattern: &str) -> Result<Vec<Self>> {
        Self::all_in(&power_supply_path(), pattern)
    }

    pub fn all_in(base: &Path, pattern: &str) -> Result<Vec<Self>> {
        devices(base, pattern)?
            .iter()
            .map(|name| Self::read_in(base, name))
            .collect()
    }

    /// Every battery, ie power supplies matching [`BATTERY_PATTERN`].
    pub fn batteries() -> Result<Vec<Self>> {
        Self::all(BATTERY_PATTERN)
    }

    /// Every raw attribute
    pub fn attributes(&self) -> &AttributeBag {
        &self.attrs
    }

    /// Name of the device
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_NAME")
    }

    /// Main type of the supply.
    ///
    /// One of `Battery`, `UPS`, `Mains`, `USB` or `Wireless`.
    pub fn supply_type(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_TYPE")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_MANUFACTURER")
    }

    pub fn model_name(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_MODEL_NAME")
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_SERIAL_NUMBER")
    }

    /// Charging status, for batteries.
    ///
    /// One of `Unknown`, `Charging`, `Discharging`, `Not charging` or `Full`.
    pub fn status(&self) -> Option<&str> {
        self.attrs.get("POWER_SUPPLY_STATUS")
    }

    /// Fine grained charge level, in percent.
    pub fn capacity(&self) -> Option<i64> {
        self.attrs.get_int("POWER_SUPPLY_CAPACITY")
    }
}

/// The charge state of a battery, at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Battery {
    status: String,
    capacity: i64,
}

impl Battery {
    /// See [`PowerSupply::status`]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// See [`PowerSupply::capacity`]
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Read the battery `name`, such as `BAT0`.
    pub fn read(name: &str) -> Result<Self> {
        Self::read_in(&power_supply_path(), name)
    }

    pub fn read_in(base: &Path, name: &str) -> Result<Self> {
        Self::read_dir(&base.join(name))
    }

    /// Read every battery matching the glob `pattern`, with its name.
    pub fn all(pattern: &str) -> Result<Vec<(String, Self)>> {
        Self::all_in(&power_supply_path(), pattern)
    }

    pub fn all_in(base: &Path, pattern: &str) -> Result<Vec<(String, Self)>> {
        read_all(base, pattern)
    }

    /// Watch every battery matching the glob `pattern`.
    ///
    /// See [`Registry::watch_all`].
    ///
    /// # Panics
    ///
    /// If not called from within a tokio runtime.
    pub fn watch_all(pattern: &str) -> Result<Watches<Self>> {
        Registry::new().watch_all(&power_supply_path(), pattern)
    }
}

impl Snapshot for Battery {
    const ATTRIBUTES: &'static [Attribute] = &[Attribute::str("status"), Attribute::int("capacity")];

    fn set(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("status", Value::Str(v)) => self.status = v,
            ("capacity", Value::Int(v)) => self.capacity = v,
            (name, value) => debug_assert!(false, "cannot set {name} to {value:?}"),
        }
    }
}
