use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// The club calendar runs on KST (UTC+9) regardless of host time zone
const KST_OFFSET_SECS: i32 = 9 * 3600;

pub(crate) fn kst() -> FixedOffset {
    // 9 hours is always a valid offset
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("valid UTC+9 offset")
}

/// Previous calendar month of `now` evaluated in KST, as (year, month)
pub fn previous_month(now: DateTime<Utc>) -> (i32, u32) {
    let local = now.with_timezone(&kst());
    if local.month() == 1 {
        (local.year() - 1, 12)
    } else {
        (local.year(), local.month() - 1)
    }
}

/// Snapshot document key for an archive run at `now`.
/// `YYYY-MM` for production, `YYYY-MM-TEST` for test-mode runs.
pub fn archive_key(now: DateTime<Utc>, is_test: bool) -> String {
    let (year, month) = previous_month(now);
    if is_test {
        format!("{:04}-{:02}-TEST", year, month)
    } else {
        format!("{:04}-{:02}", year, month)
    }
}
