//! Prometheus metrics for message ingestion.
//!
//! The [`IngestMetrics`] struct owns a dedicated [`Registry`] that a metrics
//! endpoint can encode into the Prometheus text exposition format. Outcome
//! counters mirror the three-state status reported to the transport, so
//! operators see `ParsingFailed`/`Waiting` rates without reading logs.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Histogram,
    HistogramOpts, IntCounter, Opts, Registry,
};

/// Central collection of ingestion metrics.
pub struct IngestMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Total messages handed to the ingest service.
    pub messages_received: IntCounter,
    /// Messages that completed reconciliation (including policy no-ops).
    pub processed: IntCounter,
    /// Messages deferred on a transient failure, awaiting redelivery.
    pub waiting: IntCounter,
    /// Messages discarded after structural validation failure.
    pub parsing_failed: IntCounter,

    /// Time spent processing one message, in milliseconds.
    pub process_time_ms: Histogram,
}

impl IngestMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let messages_received = register_int_counter_with_registry!(
            Opts::new(
                "agora_messages_received_total",
                "Total governance messages received"
            ),
            registry
        )
        .expect("failed to register messages_received counter");

        let processed = register_int_counter_with_registry!(
            Opts::new(
                "agora_messages_processed_total",
                "Total messages that completed reconciliation"
            ),
            registry
        )
        .expect("failed to register processed counter");

        let waiting = register_int_counter_with_registry!(
            Opts::new(
                "agora_messages_waiting_total",
                "Total messages deferred on transient failures"
            ),
            registry
        )
        .expect("failed to register waiting counter");

        let parsing_failed = register_int_counter_with_registry!(
            Opts::new(
                "agora_messages_parsing_failed_total",
                "Total messages discarded after structural validation failure"
            ),
            registry
        )
        .expect("failed to register parsing_failed counter");

        // Exponential buckets covering 0.1 ms → ~1.6 s.
        let process_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "agora_message_process_time_ms",
                "Message processing time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register process_time_ms histogram");

        Self {
            registry,
            messages_received,
            processed,
            waiting,
            parsing_failed,
            process_time_ms,
        }
    }
}

impl Default for IngestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_register() {
        let metrics = IngestMetrics::new();
        assert_eq!(metrics.messages_received.get(), 0);
        assert_eq!(metrics.processed.get(), 0);
        // All metrics live in the owned registry.
        assert_eq!(metrics.registry.gather().len(), 5);
    }
}
