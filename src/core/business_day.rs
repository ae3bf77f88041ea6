use chrono::{DateTime, LocalResult, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// The single canonical "today" policy. Every place that needs a day
/// boundary (classifier threshold, histogram filter, present counter id,
/// gate-pass date keys) goes through here, in the configured display zone
/// with a configurable rollover hour. Nothing else computes midnight.
pub fn to_local(ts_ms: i64, tz: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap())
        .with_timezone(&tz)
}

/// Millisecond epoch at which the current business day began.
///
/// Before the rollover hour, the business day is still yesterday's: a 5 AM
/// rollover means a 2 AM scan belongs to the previous day's roll call.
pub fn day_start_ms(now_ms: i64, tz: Tz, rollover_hour: u32) -> i64 {
    let local = to_local(now_ms, tz);
    let mut date = local.date_naive();
    if local.hour() < rollover_hour {
        date = date.pred_opt().unwrap_or(date);
    }
    let naive = match date.and_hms_opt(rollover_hour, 0, 0) {
        Some(n) => n,
        None => return 0,
    };
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        // DST gap at the rollover instant: the first valid instant after it.
        LocalResult::None => tz
            .from_local_datetime(&(naive + chrono::Duration::hours(1)))
            .earliest()
            .map_or(0, |dt| dt.timestamp_millis()),
    }
}

/// Stable id for the business day containing `now_ms`, e.g. `2026-08-29`.
/// Keys the cached present counter.
pub fn day_id(now_ms: i64, tz: Tz, rollover_hour: u32) -> String {
    let local = to_local(now_ms, tz);
    let mut date = local.date_naive();
    if local.hour() < rollover_hour {
        date = date.pred_opt().unwrap_or(date);
    }
    date.format("%Y-%m-%d").to_string()
}

/// Local calendar-day display key, `DD/MM/YYYY`. Groups sessions for display.
pub fn date_key(ts_ms: i64, tz: Tz) -> String {
    to_local(ts_ms, tz).format("%d/%m/%Y").to_string()
}

/// Zero-padded `HH:MM` local time. Lexicographic order matches time order.
pub fn time_hm(ts_ms: i64, tz: Tz) -> String {
    to_local(ts_ms, tz).format("%H:%M").to_string()
}

pub fn local_hour(ts_ms: i64, tz: Tz) -> u32 {
    to_local(ts_ms, tz).hour()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Tz;

    const HARARE: Tz = chrono_tz::Africa::Harare; // UTC+2, no DST

    fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        HARARE
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn midnight_rollover_splits_at_local_midnight() {
        let late_night = local_ms(2026, 8, 28, 23, 59);
        let early_morning = local_ms(2026, 8, 29, 0, 1);
        assert_eq!(day_start_ms(late_night, HARARE, 0), local_ms(2026, 8, 28, 0, 0));
        assert_eq!(day_start_ms(early_morning, HARARE, 0), local_ms(2026, 8, 29, 0, 0));
    }

    #[test]
    fn five_am_rollover_keeps_early_scans_on_yesterday() {
        let two_am = local_ms(2026, 8, 29, 2, 0);
        assert_eq!(day_start_ms(two_am, HARARE, 5), local_ms(2026, 8, 28, 5, 0));
        assert_eq!(day_id(two_am, HARARE, 5), "2026-08-28");

        let six_am = local_ms(2026, 8, 29, 6, 0);
        assert_eq!(day_start_ms(six_am, HARARE, 5), local_ms(2026, 8, 29, 5, 0));
        assert_eq!(day_id(six_am, HARARE, 5), "2026-08-29");
    }

    #[test]
    fn display_keys_use_local_zone() {
        let ts = local_ms(2026, 8, 29, 8, 3);
        assert_eq!(date_key(ts, HARARE), "29/08/2026");
        assert_eq!(time_hm(ts, HARARE), "08:03");
        assert_eq!(local_hour(ts, HARARE), 8);
    }
}
