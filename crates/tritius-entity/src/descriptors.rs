//! Entity descriptors and their accessor tables
//!
//! Each entity kind maps to one named accessor function over the
//! coordinator snapshot. Dispatch goes through const tables rather than
//! closures attached to descriptions, so the full entity surface is
//! visible in one place.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use tritius_core::Snapshot;

/// Sensor entities exposed for one patron account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorKind {
    /// Number of current borrowings
    Borrowings,
    /// End of the library registration
    RegistrationExpiration,
    /// Nearest borrowing due date
    BorrowingExpiration,
}

/// Binary-sensor entities exposed for one patron account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinarySensorKind {
    /// A borrowing is due within the alert window
    BorrowingAlert,
}

/// Publishable state of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Numeric state
    Count(usize),
    /// Date state
    Date(NaiveDate),
    /// No value available, rendered as unknown by the host
    Unknown,
}

/// Static description of one sensor entity
pub struct SensorDescriptor {
    /// Entity kind the descriptor belongs to
    pub kind: SensorKind,
    /// Stable key used for unique ids and translations
    pub key: &'static str,
    /// Material-design icon name
    pub icon: &'static str,
    /// Accessor producing the state from a snapshot
    pub value: fn(&Snapshot) -> StateValue,
    /// Optional accessor producing extra state attributes
    pub attributes: Option<fn(&Snapshot) -> Value>,
}

/// Static description of one binary-sensor entity
pub struct BinarySensorDescriptor {
    /// Entity kind the descriptor belongs to
    pub kind: BinarySensorKind,
    /// Stable key used for unique ids and translations
    pub key: &'static str,
    /// Material-design icon name
    pub icon: &'static str,
    /// Accessor deciding the on/off state for a given day
    pub is_on: fn(&Snapshot, NaiveDate) -> bool,
}

/// All sensor entities, one row per [`SensorKind`].
pub const SENSORS: &[SensorDescriptor] = &[
    SensorDescriptor {
        kind: SensorKind::Borrowings,
        key: "borrowings",
        icon: "mdi:book-open-variant-outline",
        value: borrowing_count,
        attributes: Some(borrowing_attributes),
    },
    SensorDescriptor {
        kind: SensorKind::RegistrationExpiration,
        key: "registration_expiration",
        icon: "mdi:calendar-alert",
        value: registration_expiration,
        attributes: None,
    },
    SensorDescriptor {
        kind: SensorKind::BorrowingExpiration,
        key: "borrowing_expiration",
        icon: "mdi:calendar-alert",
        value: borrowing_expiration,
        attributes: None,
    },
];

/// All binary-sensor entities, one row per [`BinarySensorKind`].
pub const BINARY_SENSORS: &[BinarySensorDescriptor] = &[BinarySensorDescriptor {
    kind: BinarySensorKind::BorrowingAlert,
    key: "borrowing_alert",
    icon: "mdi:calendar-alert",
    is_on: borrowing_alert,
}];

/// Look up the descriptor for a sensor kind.
pub fn sensor(kind: SensorKind) -> &'static SensorDescriptor {
    SENSORS
        .iter()
        .find(|descriptor| descriptor.kind == kind)
        .expect("every sensor kind has a table row")
}

/// Look up the descriptor for a binary-sensor kind.
pub fn binary_sensor(kind: BinarySensorKind) -> &'static BinarySensorDescriptor {
    BINARY_SENSORS
        .iter()
        .find(|descriptor| descriptor.kind == kind)
        .expect("every binary-sensor kind has a table row")
}

fn borrowing_count(snapshot: &Snapshot) -> StateValue {
    StateValue::Count(snapshot.borrowing_count())
}

fn borrowing_attributes(snapshot: &Snapshot) -> Value {
    json!({ "borrowings": snapshot.borrowings.clone().unwrap_or_default() })
}

fn registration_expiration(snapshot: &Snapshot) -> StateValue {
    snapshot
        .user
        .as_ref()
        .and_then(|user| user.registration_expiration)
        .map_or(StateValue::Unknown, StateValue::Date)
}

fn borrowing_expiration(snapshot: &Snapshot) -> StateValue {
    snapshot
        .borrowing_expiration
        .map_or(StateValue::Unknown, StateValue::Date)
}

fn borrowing_alert(snapshot: &Snapshot, today: NaiveDate) -> bool {
    snapshot.has_borrowing_alert(today)
}
