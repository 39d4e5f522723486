//! This module provides ways to get information about a running Linux system
pub mod class;
pub mod memory;
pub mod user;
