// file: src/utils/telemetry.rs
// description: timing helpers for long-running triage operations
// reference: https://docs.rs/tracing

use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Logs start and completion of a named operation.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_count(self, count: usize, unit: &str) -> Duration {
        let elapsed = self.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            "Completed operation: {} - {} {} in {:.2}s ({:.2} {}/sec)",
            self.operation,
            count,
            unit,
            elapsed.as_secs_f64(),
            rate,
            unit
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) -> bool {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}] took {:.2}s (threshold: {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
            return true;
        }
        false
    }
}
