use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Timestamps arrive from hardware pushes, kiosk entries and batch imports in
/// four shapes. Branching on the shape happens once, here; everything past
/// the ingestion boundary only ever sees canonical millisecond epochs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Native store timestamp shape (`{"seconds": ...}`).
    Db { seconds: i64 },
    /// Epoch seconds or epoch milliseconds, disambiguated by magnitude.
    Number(f64),
    /// A date/time string, e.g. ISO-8601.
    Text(String),
    /// Absent/null input.
    Null,
}

/// Values below this are epoch seconds; at or above, already milliseconds.
/// 1e12 ms is Sep 2001, far below any realistic ms-epoch the system sees.
const MS_THRESHOLD: i64 = 1_000_000_000_000;

/// Converts any raw timestamp into canonical milliseconds since epoch.
///
/// Total: unparseable or absent input yields 0 rather than an error.
/// Idempotent on values already in canonical form.
pub fn normalize(ts: &RawTimestamp) -> i64 {
    match ts {
        RawTimestamp::Null => 0,
        RawTimestamp::Db { seconds } => seconds.saturating_mul(1000),
        RawTimestamp::Number(n) => {
            if !n.is_finite() {
                return 0;
            }
            normalize_numeric(*n as i64)
        }
        RawTimestamp::Text(s) => parse_datetime_str(s),
    }
}

/// The numeric branch on its own, for callers that already hold an integer.
pub fn normalize_numeric(v: i64) -> i64 {
    if v == 0 {
        0
    } else if v < MS_THRESHOLD {
        v.saturating_mul(1000)
    } else {
        v
    }
}

fn parse_datetime_str(s: &str) -> i64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.and_utc().timestamp_millis();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp_millis());
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_zero() {
        assert_eq!(normalize(&RawTimestamp::Null), 0);
    }

    #[test]
    fn ten_digit_number_is_seconds() {
        assert_eq!(normalize(&RawTimestamp::Number(1_700_000_000.0)), 1_700_000_000_000);
    }

    #[test]
    fn thirteen_digit_number_is_already_millis() {
        assert_eq!(
            normalize(&RawTimestamp::Number(1_700_000_000_000.0)),
            1_700_000_000_000
        );
    }

    #[test]
    fn second_pass_is_stable_for_canonical_values() {
        let once = normalize(&RawTimestamp::Number(1_700_000_000.0));
        let twice = normalize(&RawTimestamp::Number(once as f64));
        assert_eq!(once, twice);
    }

    #[test]
    fn db_shape_is_seconds() {
        assert_eq!(
            normalize(&RawTimestamp::Db { seconds: 1_700_000_000 }),
            1_700_000_000_000
        );
    }

    #[test]
    fn iso_string_parses() {
        assert_eq!(
            normalize(&RawTimestamp::Text("2023-11-14T22:13:20Z".to_string())),
            1_700_000_000_000
        );
    }

    #[test]
    fn garbage_string_is_zero_not_panic() {
        assert_eq!(normalize(&RawTimestamp::Text("not a date".to_string())), 0);
        assert_eq!(normalize(&RawTimestamp::Text("".to_string())), 0);
    }

    #[test]
    fn untagged_deserialization_covers_all_shapes() {
        let n: RawTimestamp = serde_json::from_str("1700000000").unwrap();
        assert_eq!(normalize(&n), 1_700_000_000_000);

        let s: RawTimestamp = serde_json::from_str("\"2023-11-14T22:13:20Z\"").unwrap();
        assert_eq!(normalize(&s), 1_700_000_000_000);

        let d: RawTimestamp = serde_json::from_str("{\"seconds\": 1700000000}").unwrap();
        assert_eq!(normalize(&d), 1_700_000_000_000);

        let nul: RawTimestamp = serde_json::from_str("null").unwrap();
        assert_eq!(normalize(&nul), 0);
    }
}
