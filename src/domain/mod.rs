//! Domain types for Account Hub.
//!
//! This module contains the two persisted entities and their input shapes.

mod account;
mod device;
mod validate;

pub use account::*;
pub use device::*;
