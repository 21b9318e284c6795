use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::phase::HalvingPhase;

/// Estimated days until the active halving target is reached.
///
/// `Unbounded` is the explicit "issuance is not growing" answer; it is never
/// encoded as a sentinel day count or a division-by-zero result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimatedDays {
    Days(u128),
    Unbounded,
}

impl EstimatedDays {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub fn as_days(&self) -> Option<u128> {
        match self {
            Self::Days(n) => Some(*n),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for EstimatedDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

// Wire shape: a bare non-negative number, or the string "unbounded".
impl Serialize for EstimatedDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Days(n) => serializer.serialize_u128(*n),
            Self::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for EstimatedDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DaysVisitor;

        impl Visitor<'_> for DaysVisitor {
            type Value = EstimatedDays;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative day count or the string \"unbounded\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(EstimatedDays::Days(v.into()))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
                Ok(EstimatedDays::Days(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(|n| EstimatedDays::Days(n.into()))
                    .map_err(|_| E::custom("day count cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == "unbounded" {
                    Ok(EstimatedDays::Unbounded)
                } else {
                    Err(E::custom(format!("unexpected day count string {v:?}")))
                }
            }
        }

        deserializer.deserialize_any(DaysVisitor)
    }
}

/// One refresh cycle's output. Immutable once constructed; each refresh
/// replaces the previous record wholesale, so readers never observe a
/// half-updated mix of old and new fields.
///
/// Balance fields are full-precision on-chain integers (18 implied decimal
/// places) rendered as base-10 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalvingStats {
    pub current_issuance: String,
    pub remaining_amount: String,
    pub estimated_days: EstimatedDays,
    pub average_daily_increase: String,
    pub halving_phase: HalvingPhase,
}

/// Countdown breakdown derived from an estimated completion date.
///
/// Always recomputed from the authoritative record, never stored or
/// incremented in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeLeft {
    pub const ZERO: TimeLeft = TimeLeft {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Remaining time from `now` to `target`, clamped to zero once the
    /// target has passed.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds().max(0) as u64;
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn estimated_days_wire_shape() {
        assert_eq!(
            serde_json::to_string(&EstimatedDays::Days(1050)).unwrap(),
            "1050"
        );
        assert_eq!(
            serde_json::to_string(&EstimatedDays::Unbounded).unwrap(),
            "\"unbounded\""
        );
        assert_eq!(
            serde_json::from_str::<EstimatedDays>("1050").unwrap(),
            EstimatedDays::Days(1050)
        );
        assert_eq!(
            serde_json::from_str::<EstimatedDays>("\"unbounded\"").unwrap(),
            EstimatedDays::Unbounded
        );
        assert!(serde_json::from_str::<EstimatedDays>("-3").is_err());
        assert!(serde_json::from_str::<EstimatedDays>("\"soon\"").is_err());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = HalvingStats {
            current_issuance: "500000000000000000000000000".into(),
            remaining_amount: "1500000000000000000000000000".into(),
            estimated_days: EstimatedDays::Days(1050),
            average_daily_increase: "1428571428571428571428571".into(),
            halving_phase: HalvingPhase::Second,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json["currentIssuance"],
            "500000000000000000000000000"
        );
        assert_eq!(json["estimatedDays"], 1050);
        assert_eq!(json["halvingPhase"], "SECOND");
        let back: HalvingStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn time_left_breaks_down_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let target = now + chrono::Duration::seconds(90_061); // 1d 1h 1m 1s
        let left = TimeLeft::until(target, now);
        assert_eq!(
            left,
            TimeLeft {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(left.to_string(), "1d 01h 01m 01s");
    }

    #[test]
    fn time_left_clamps_past_targets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let target = now - chrono::Duration::seconds(5);
        assert_eq!(TimeLeft::until(target, now), TimeLeft::ZERO);
    }
}
