use moka::future::Cache;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Duration;
use utoipa::ToSchema;

use crate::model::event::EventAction;

/// How long a scan stays interesting to the kiosk display.
const STALENESS_CUTOFF: Duration = Duration::from_secs(15);

const LATEST_KEY: &str = "latest";

/// Best-effort live channel: one slot holding the most recent scan, expiring
/// on its own after the staleness cutoff. A missed or expired notification
/// has no correctness impact, the kiosk just shows no popup.
static LIVE_SCANS: Lazy<Cache<&'static str, LiveScan>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(STALENESS_CUTOFF)
        .build()
});

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LiveScan {
    pub subject_id: String,
    pub subject_name: String,
    pub action: EventAction,
    pub timestamp: i64,
}

pub async fn publish(scan: LiveScan) {
    LIVE_SCANS.insert(LATEST_KEY, scan).await;
}

pub async fn latest() -> Option<LiveScan> {
    LIVE_SCANS.get(&LATEST_KEY).await
}
