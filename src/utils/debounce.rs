use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Last successful scan time per subject. A second scan inside the
/// configured window is a double-tap, not a new toggle: without this, one
/// accidental re-scan flips the subject straight back out of the building.
static LAST_SCAN: Lazy<Cache<String, i64>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_live(Duration::from_secs(60)) // entries only matter for a few seconds
        .build()
});

/// True if the subject already produced a SUCCESS event within `window_ms`.
pub async fn is_duplicate(subject_id: &str, now_ms: i64, window_ms: i64) -> bool {
    match LAST_SCAN.get(&subject_id.trim().to_string()).await {
        Some(last) => now_ms - last < window_ms,
        None => false,
    }
}

pub async fn record(subject_id: &str, now_ms: i64) {
    LAST_SCAN.insert(subject_id.trim().to_string(), now_ms).await;
}
