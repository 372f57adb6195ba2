//! Sampled micro-benchmark timer
//!
//! Accumulates elapsed time over a fixed number of samples and logs the
//! average, then starts a new interval.

use std::time::{Duration, Instant};

/// Summary of one reporting interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerReport {
    pub samples: u64,
    pub total: Duration,
}

impl TimerReport {
    /// Mean duration per sample
    pub fn average(&self) -> Duration {
        if self.samples == 0 {
            Duration::ZERO
        } else {
            // Samples per interval are far below u32::MAX in practice
            let samples = u32::try_from(self.samples).unwrap_or(u32::MAX);
            self.total / samples
        }
    }
}

#[derive(Debug)]
pub struct MicroTimer {
    label: String,
    sample_size: u64,
    samples: u64,
    elapsed: Duration,
    started: Option<Instant>,
}

impl MicroTimer {
    /// Create a timer that reports every `sample_size` samples (at least 1)
    pub fn new(label: impl Into<String>, sample_size: u64) -> Self {
        Self {
            label: label.into(),
            sample_size: sample_size.max(1),
            samples: 0,
            elapsed: Duration::ZERO,
            started: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// Samples accumulated in the current interval
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop the running sample.
    ///
    /// Returns the interval report when this sample completed one. A stop
    /// without a matching start is ignored.
    pub fn stop(&mut self) -> Option<TimerReport> {
        let started = self.started.take()?;
        self.record(started.elapsed())
    }

    /// Add one externally measured sample
    pub fn record(&mut self, elapsed: Duration) -> Option<TimerReport> {
        self.elapsed += elapsed;
        self.samples += 1;

        if self.samples >= self.sample_size {
            self.report_and_clear()
        } else {
            None
        }
    }

    /// Log the current interval, if it has any samples, and reset it
    pub fn report_and_clear(&mut self) -> Option<TimerReport> {
        if self.samples == 0 {
            return None;
        }

        let report = TimerReport {
            samples: self.samples,
            total: self.elapsed,
        };

        tracing::info!(
            timer = %self.label,
            samples = report.samples,
            avg_ns = report.average().as_nanos() as u64,
            total_us = report.total.as_micros() as u64,
            "timing report"
        );

        self.samples = 0;
        self.elapsed = Duration::ZERO;
        Some(report)
    }
}
