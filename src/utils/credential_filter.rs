use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Sized for a large site registry; PINs and QR payloads share one filter.
const FILTER_CAPACITY: usize = 50_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Negative pre-filter over registered kiosk credentials. A miss here is a
/// guaranteed unknown credential and fails fast without a registry query;
/// a hit still goes to the database (false positives possible).
static CREDENTIAL_FILTER: Lazy<RwLock<CuckooFilter<String>>> = Lazy::new(|| {
    RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE))
});

#[inline]
fn normalize(credential: &str) -> String {
    credential.trim().to_string()
}

pub fn might_exist(credential: &str) -> bool {
    let credential = normalize(credential);
    CREDENTIAL_FILTER
        .read()
        .expect("credential filter poisoned")
        .contains(&credential)
}

pub fn insert(credential: &str) {
    let credential = normalize(credential);
    CREDENTIAL_FILTER
        .write()
        .expect("credential filter poisoned")
        .add(&credential);
}

pub fn remove(credential: &str) {
    let credential = normalize(credential);
    CREDENTIAL_FILTER
        .write()
        .expect("credential filter poisoned")
        .remove(&credential);
}

/// Warm up the filter from the employee registry using streaming + batching.
pub async fn warmup_credential_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (String, String)>("SELECT pin, qr_code_data FROM employees")
            .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size * 2);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (pin, qr) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&pin));
        batch.push(normalize(&qr));
        total += 1;

        if batch.len() >= batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Credential filter warmup complete: {} employees", total);
    Ok(())
}

fn insert_batch(credentials: &[String]) {
    let mut filter = CREDENTIAL_FILTER
        .write()
        .expect("credential filter poisoned");

    for credential in credentials {
        filter.add(credential);
    }
}
