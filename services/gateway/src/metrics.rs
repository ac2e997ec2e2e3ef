//! Prometheus metrics for the gateway.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, register_counter_vec};

/// Login attempts by strategy and outcome.
///
/// The `unavailable` outcome is kept separate from `rejected` so directory
/// outages can be alerted on independently of brute-force noise.
pub static LOGIN_ATTEMPTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "webjive_auth_login_attempts_total",
        "Credential verification attempts",
        &["strategy", "outcome"]
    )
    .expect("Failed to register login_attempts metric")
});

/// Session tokens issued after successful logins.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "webjive_auth_tokens_issued_total",
        "Session tokens issued",
        &["operation"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Renewal attempts by outcome.
pub static TOKENS_RENEWED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "webjive_auth_tokens_renewed_total",
        "Session token renewal attempts",
        &["outcome"]
    )
    .expect("Failed to register tokens_renewed metric")
});
