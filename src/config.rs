use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    /// Display/business timezone for day keys and HH:MM formatting.
    pub display_tz: Tz,
    /// Hour at which the business day rolls over (0 = local midnight).
    pub rollover_hour: u32,

    /// Duplicate-scan rejection window, in seconds.
    pub debounce_secs: u64,

    /// How far back the read models look into the event log.
    pub event_limit: u32,
    pub visitor_event_limit: u32,

    // Biometric bridge
    pub fingerprint_url: String,
    pub fingerprint_timeout_secs: u64,
    pub fingerprint_mock: bool,

    // Rate limiting
    pub rate_verify_per_min: u32,
    pub rate_admin_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            display_tz: env::var("DISPLAY_TIMEZONE")
                .unwrap_or_else(|_| "Africa/Harare".to_string())
                .parse()
                .expect("DISPLAY_TIMEZONE must be a valid IANA zone name"),
            rollover_hour: env::var("BUSINESS_DAY_ROLLOVER_HOUR")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u32>()
                .map(|h| h.min(23))
                .unwrap_or(0),

            debounce_secs: env::var("SCAN_DEBOUNCE_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            event_limit: env::var("EVENT_QUERY_LIMIT")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .unwrap_or(2000),
            visitor_event_limit: env::var("VISITOR_EVENT_QUERY_LIMIT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),

            fingerprint_url: env::var("FINGERPRINT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            fingerprint_timeout_secs: env::var("FINGERPRINT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),
            fingerprint_mock: env::var("FINGERPRINT_MOCK")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),

            rate_verify_per_min: env::var("RATE_VERIFY_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            rate_admin_per_min: env::var("RATE_ADMIN_PER_MIN")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn debounce_ms(&self) -> i64 {
        self.debounce_secs as i64 * 1000
    }
}
