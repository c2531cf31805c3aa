//! Dispatch metrics.
//!
//! # Metrics
//! - `dispatch_route_lookups_total` (counter): lookups by outcome (exact, pattern, miss)
//! - `dispatch_binding_failures_total` (counter): binding errors by kind
//! - `dispatch_invocations_total` (counter): handler invocations by outcome
//! - `dispatch_warmup_failures_total` (counter): failed warm-up invocations
//!
//! # Design Decisions
//! - Only the `metrics` facade is used; the embedding process installs a recorder
//! - Without a recorder every call is a no-op
//! - Recording can be switched off through `observability.metrics_enabled`

use metrics::counter;

/// Switch for the dispatch counters, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct DispatchMetrics {
    enabled: bool,
}

impl DispatchMetrics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Record a route lookup: `exact`, `pattern` or `miss`.
    pub fn record_lookup(&self, outcome: &'static str) {
        if self.enabled {
            counter!("dispatch_route_lookups_total", "outcome" => outcome).increment(1);
        }
    }

    /// Record a binding failure by error kind.
    pub fn record_binding_failure(&self, kind: &'static str) {
        if self.enabled {
            counter!("dispatch_binding_failures_total", "kind" => kind).increment(1);
        }
    }

    /// Record a handler invocation: `ok` or `error`.
    pub fn record_invocation(&self, outcome: &'static str) {
        if self.enabled {
            counter!("dispatch_invocations_total", "outcome" => outcome).increment(1);
        }
    }

    pub fn record_warmup_failure(&self) {
        if self.enabled {
            counter!("dispatch_warmup_failures_total").increment(1);
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        for metrics in [DispatchMetrics::default(), DispatchMetrics::new(false)] {
            metrics.record_lookup("exact");
            metrics.record_binding_failure("missing");
            metrics.record_invocation("ok");
            metrics.record_warmup_failure();
        }
    }
}
