use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds since the UNIX epoch.
///
/// Nodes carry `created_at`/`updated_at` timestamps and commits carry the
/// instant they were recorded. Serialized as a bare integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from explicit milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(ms)
    }

    /// The zero timestamp (UNIX epoch).
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Milliseconds since the UNIX epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// A timestamp strictly after `self`: the current time, or `self + 1ms`
    /// when the clock has not moved past `self` yet.
    pub fn advanced(&self) -> Self {
        let now = Self::now();
        if now > *self {
            now
        } else {
            Self(self.0.saturating_add(1))
        }
    }

    /// Convert to a `chrono` UTC datetime for display.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        // After 2020-01-01.
        assert!(Timestamp::now().as_millis() > 1_577_836_800_000);
    }

    #[test]
    fn advanced_is_strictly_later() {
        let t = Timestamp::now();
        assert!(t.advanced() > t);
    }

    #[test]
    fn advanced_from_future_bumps_by_one() {
        let future = Timestamp::from_millis(u64::MAX / 2);
        assert_eq!(future.advanced().as_millis(), u64::MAX / 2 + 1);
    }

    #[test]
    fn zero_is_smallest() {
        assert!(Timestamp::zero() < Timestamp::from_millis(1));
    }

    #[test]
    fn display_format() {
        let t = Timestamp::from_millis(0);
        assert_eq!(t.to_string(), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn serializes_as_integer() {
        let t = Timestamp::from_millis(1234);
        assert_eq!(serde_json::to_string(&t).unwrap(), "1234");
    }
}
