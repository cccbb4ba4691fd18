//! Record timestamps.

use chrono::{DateTime, Duration, Utc};

/// Current time, used for `createdAt` and the first `updatedAt`.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Next `updatedAt` for a record last touched at `previous`.
///
/// Always strictly later than `previous`, even when the clock has not moved
/// (or moved backwards) since the last write.
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = Utc::now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
