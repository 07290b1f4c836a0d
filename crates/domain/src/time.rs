//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, Utc};

/// UTC timestamp used for slot boundaries, `created_at`, token expiry, etc.
pub type Timestamp = DateTime<Utc>;

/// Calendar day a schedule slot belongs to.
pub type Date = NaiveDate;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current UTC calendar day.
#[must_use]
pub fn today() -> Date {
    Utc::now().date_naive()
}
