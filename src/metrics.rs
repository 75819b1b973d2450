//! Service metrics
//!
//! Counters are emitted through the `metrics` facade; without an installed
//! recorder they are no-ops. The `prometheus` feature installs an exporter
//! when the server starts.
//!
//! # Metrics
//!
//! - `learnify_ask_total`: `ask` calls by status (`ok`, `invalid`, `unconfigured`, `provider_error`)
//! - `learnify_simplify_total`: summary follow-ups by outcome
//! - `learnify_audio_chunks_total`: chunk fetches by result (`written`, `failed`, `rejected`)
//! - `learnify_audio_artifacts_total`: audio stage outcomes

use ::metrics::increment_counter;

/// Record the final status of an `ask` call
pub fn record_ask(status: &'static str) {
    increment_counter!("learnify_ask_total", "status" => status);
}

/// Record the outcome of the summary follow-up stage
pub fn record_simplify(outcome: &'static str) {
    increment_counter!("learnify_simplify_total", "outcome" => outcome);
}

/// Record one chunk fetch
pub fn record_chunk(result: &'static str) {
    increment_counter!("learnify_audio_chunks_total", "result" => result);
}

/// Record the outcome of the audio stage
pub fn record_artifact(outcome: &'static str) {
    increment_counter!("learnify_audio_artifacts_total", "outcome" => outcome);
}

/// Install the Prometheus exporter when built with the `prometheus` feature
///
/// The exporter serves scrapes on its own listener (default port 9000).
/// Without the feature this does nothing.
pub fn init_metrics_exporter() {
    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        if let Err(e) = PrometheusBuilder::new().install() {
            tracing::warn!("Failed to install Prometheus exporter: {}", e);
        }
    }
}
