//! Tritius Entity Bindings
//!
//! This crate binds `tritius-core` snapshots to host-framework entities
//! without depending on any particular host. Sensor values and attributes
//! are produced by a closed set of named accessor functions dispatched
//! through const lookup tables, so the mapping stays inspectable and
//! testable on its own.
//!
//! # Entities
//! - `borrowings` sensor - count, with the full list as attributes
//! - `registration_expiration` sensor - end of the library registration
//! - `borrowing_expiration` sensor - nearest due date
//! - `borrowing_alert` binary sensor - due date inside the alert window
//! - renew button - renew everything now, then refresh
//! - auto-renew switch - renew automatically, at most once per day

pub mod controls;
pub mod descriptors;

// Re-export main types for convenience
pub use controls::{AutoRenewSwitch, RenewButton};
pub use descriptors::{
    binary_sensor, sensor, BinarySensorDescriptor, BinarySensorKind, SensorDescriptor,
    SensorKind, StateValue, BINARY_SENSORS, SENSORS,
};
