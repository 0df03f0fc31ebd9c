use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static LOOKUPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "steam_ledger_lookups_total",
        "Total profile lookups handled"
    )
    .expect("register lookups_total")
});

pub static BANNED_LOOKUPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "steam_ledger_banned_lookups_total",
        "Total lookups denied because the record is banned"
    )
    .expect("register banned_lookups_total")
});

pub static UPSTREAM_CALLS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "steam_ledger_upstream_calls_total",
        "Total outbound Steam Web API calls"
    )
    .expect("register upstream_calls_total")
});

pub static UPSTREAM_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "steam_ledger_upstream_errors_total",
        "Total failed outbound Steam Web API calls"
    )
    .expect("register upstream_errors_total")
});

pub static RECORDS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "steam_ledger_records_created_total",
        "Total records auto-created on first lookup"
    )
    .expect("register records_created_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
