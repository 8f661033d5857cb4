//! Countdown evaluation.
//!
//! Pure mapping from an absolute expiry and the current wall-clock time to
//! the remaining duration. No internal state; called on every render and on
//! every generator sweep.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown instead of a duration once a countdown has run out.
pub const EXPIRED_LABEL: &str = "Expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub expired: bool,
    /// `max(0, expires_at - now)`.
    #[serde(with = "millis")]
    pub remaining: Duration,
    /// Signed `expires_at - now`; negative once expired.
    #[serde(with = "millis")]
    pub time_left: Duration,
}

impl Countdown {
    pub fn evaluate(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let time_left = expires_at - now;
        Self {
            expired: expires_at <= now,
            remaining: time_left.max(Duration::zero()),
            time_left,
        }
    }

    /// Whole minutes left, rounded down. Negative after expiry.
    pub fn minutes_remaining(&self) -> i64 {
        self.time_left.num_seconds().div_euclid(60)
    }

    /// `HH:MM:SS`, or [`EXPIRED_LABEL`].
    pub fn label(&self) -> String {
        if self.expired {
            return EXPIRED_LABEL.to_string();
        }
        let secs = self.remaining.num_seconds();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

mod millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        i64::deserialize(d).map(Duration::milliseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn formats_zero_padded() {
        let c = Countdown::evaluate(t0() + Duration::seconds(3 * 3600 + 4 * 60 + 5), t0());
        assert!(!c.expired);
        assert_eq!(c.label(), "03:04:05");
    }

    #[test]
    fn hours_are_not_wrapped_at_a_day() {
        let c = Countdown::evaluate(t0() + Duration::hours(30), t0());
        assert_eq!(c.label(), "30:00:00");
    }

    #[test]
    fn expiry_instant_counts_as_expired() {
        let c = Countdown::evaluate(t0(), t0());
        assert!(c.expired);
        assert_eq!(c.remaining, Duration::zero());
        assert_eq!(c.label(), EXPIRED_LABEL);
    }

    #[test]
    fn remaining_is_clamped_after_expiry() {
        let c = Countdown::evaluate(t0(), t0() + Duration::seconds(90));
        assert_eq!(c.remaining, Duration::zero());
        assert_eq!(c.time_left, Duration::seconds(-90));
        assert_eq!(c.minutes_remaining(), -2);
    }

    #[test]
    fn minutes_remaining_rounds_down() {
        let c = Countdown::evaluate(t0() + Duration::seconds(5 * 60 + 59), t0());
        assert_eq!(c.minutes_remaining(), 5);
    }

    proptest! {
        #[test]
        fn expired_iff_now_at_or_after_expiry(offset_secs in -86_400i64..86_400) {
            let expires_at = t0();
            let now = t0() + Duration::seconds(offset_secs);
            let c = Countdown::evaluate(expires_at, now);
            prop_assert_eq!(c.expired, now >= expires_at);
            prop_assert!(c.remaining >= Duration::zero());
        }
    }
}
