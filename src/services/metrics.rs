//! Verification metrics and Prometheus integration.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;

use crate::config::LoginMode;

/// Prometheus metrics for login verification
#[derive(Clone)]
pub struct VerifierMetrics {
    pub registry: Registry,
    pub login_verifications_total: CounterVec,
    pub login_verification_duration_seconds: HistogramVec,
}

impl VerifierMetrics {
    /// Create a new metrics collector in its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Verification counter by mode and outcome code
        let login_verifications_total = CounterVec::new(
            Opts::new(
                "login_verifications_total",
                "Total number of login verifications",
            ),
            &["mode", "outcome"],
        )?;

        // Hashing is in the microsecond range, so buckets start low
        let login_verification_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "login_verification_duration_seconds",
                "Login verification duration in seconds",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05,
            ]),
            &["mode"],
        )?;

        registry.register(Box::new(login_verifications_total.clone()))?;
        registry.register(Box::new(login_verification_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            login_verifications_total,
            login_verification_duration_seconds,
        })
    }

    /// Record one verification. `outcome` is `success` or a failure code.
    pub fn record_verification(&self, mode: LoginMode, outcome: &str, duration: Duration) {
        self.login_verifications_total
            .with_label_values(&[mode.as_str(), outcome])
            .inc();

        self.login_verification_duration_seconds
            .with_label_values(&[mode.as_str()])
            .observe(duration.as_secs_f64());
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
