//! Abstraction for handling devices in the backlight class
//!
//! Documentation for the attributes is taken from the [kernel docs][1]
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/stable/sysfs-class-backlight
use super::{class_path, read_all, Attribute, Snapshot, Value};
use crate::{
    error::Result,
    watch::{Registry, Watches},
};
use std::path::{Path, PathBuf};

/// Directory holding every backlight device
pub fn backlight_path() -> PathBuf {
    class_path("backlight")
}

/// A backlight, at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backlight {
    bl_power: i64,
    brightness: i64,
    actual_brightness: i64,
    max_brightness: i64,
    ty: String,
}

// Public
impl Backlight {
    /// Backlight power, values are compatible with `FB_BLANK_*` from `fb.h`
    ///
    /// - 0 (`FB_BLANK_UNBLANK`), power on
    /// - 4 (`FB_BLANK_POWERDOWN`), power off
    pub fn bl_power(&self) -> i64 {
        self.bl_power
    }

    /// Brightness stored in the driver, between 0 and
    /// [`Backlight::max_brightness`].
    ///
    /// This may not be the actual brightness, see
    /// [`Backlight::actual_brightness`].
    pub fn brightness(&self) -> i64 {
        self.brightness
    }

    /// Actual brightness, as reported by the hardware.
    pub fn actual_brightness(&self) -> i64 {
        self.actual_brightness
    }

    pub fn max_brightness(&self) -> i64 {
        self.max_brightness
    }

    /// Type of interface controlling this backlight.
    ///
    /// - `firmware`, a standard firmware interface
    /// - `platform`, a platform-specific interface
    /// - `raw`, hardware registers directly
    ///
    /// When multiple interfaces are available for a single device, prefer
    /// firmware over platform over raw.
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Read the backlight `name`
    ///
    /// # Errors
    ///
    /// - If any attribute can't be read or parsed
    pub fn read(name: &str) -> Result<Self> {
        Self::read_in(&backlight_path(), name)
    }

    /// Like [`Backlight::read`], for backlights under `base`.
    pub fn read_in(base: &Path, name: &str) -> Result<Self> {
        Self::read_dir(&base.join(name))
    }

    /// Read every backlight matching the glob `pattern`, with its name.
    pub fn all(pattern: &str) -> Result<Vec<(String, Self)>> {
        Self::all_in(&backlight_path(), pattern)
    }

    pub fn all_in(base: &Path, pattern: &str) -> Result<Vec<(String, Self)>> {
        read_all(base, pattern)
    }

    /// Watch every backlight matching the glob `pattern`.
    ///
    /// See [`Registry::watch_all`].
    ///
    /// # Panics
    ///
    /// If not called from within a tokio runtime.
    pub fn watch_all(pattern: &str) -> Result<Watches<Self>> {
        Registry::new().watch_all(&backlight_path(), pattern)
    }
}

impl Snapshot for Backlight {
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute::int("bl_power"),
        Attribute::int("brightness"),
        Attribute::int("actual_brightness"),
        Attribute::int("max_brightness"),
        Attribute::str("type"),
    ];

    fn set(&mut self, name: &str, value: Value) {
        match (name, value) {
            ("bl_power", Value::Int(v)) => self.bl_power = v,
            ("brightness", Value::Int(v)) => self.brightness = v,
            ("actual_brightness", Value::Int(v)) => self.actual_brightness = v,
            ("max_brightness", Value::Int(v)) => self.max_brightness = v,
            ("type", Value::Str(v)) => self.ty = v,
            (name, value) => debug_assert!(false, "cannot set {name} to {value:?}"),
        }
    }
}
