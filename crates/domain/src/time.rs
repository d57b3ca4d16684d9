//! Time and timestamp helpers.

use chrono::{DateTime, Local, NaiveTime, Utc};

/// UTC timestamp used for snapshot times and storage-key generation.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Current wall-clock time of day in the host's local timezone.
///
/// Slots are painted against the clock the user sees, not UTC.
#[must_use]
pub fn local_time_of_day() -> NaiveTime {
    Local::now().time()
}
