//! Point-in-time and live-updating Linux system state
//!
//! Backlights, batteries and other power supplies, memory usage, and user
//! identity, read from the files the kernel exposes in `/sys` and `/proc`.
//!
//! Device classes whose state is a handful of single-valued attribute files
//! can also be [watched][watch], producing a fresh snapshot every time one
//! of those files is written.
//!
//! # Implementation details
//!
//! Most Linux APIs and interfaces are provided through files in `/sys` and
//! `/proc`, so this library requires them to exist.
//!
//! Most of these interfaces are also undocumented, and some may change between
//! kernel versions.
//!
//! This crate attempts to correctly document these interfaces, and provide
//! kernel documentation sources where possible.
//! This is done on a best effort basis.
#![doc(html_root_url = "https://docs.rs/linstat/0.1.0")]

pub mod error;
pub mod system;
pub mod util;
pub mod watch;

pub use self::error::{Error, Result, WatchError};
