// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for ingestion passes
// reference: uses indicatif for progress bars and tracks processing metrics

use crate::models::ClassificationSource;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestStats {
    pub rows_total: usize,
    pub rows_processed: usize,
    pub rows_skipped: usize,
    pub messages_created: usize,
    pub external_classified: usize,
    pub rule_classified: usize,
    pub fallback_classified: usize,
    /// Percentage boundaries (10, 20, ... 100) announced during the pass, in order.
    pub milestones: Vec<u8>,
    pub duration_ms: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.rows_processed as f64 / (self.duration_ms as f64 / 1000.0)
    }

    pub fn success_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            return 0.0;
        }
        (self.messages_created as f64 / self.rows_processed as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    stats: IngestStats,
    last_milestone: u8,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_rows: usize, show_bar: bool) -> Self {
        let (main_bar, detail_bar) = if show_bar {
            let multi_progress = MultiProgress::new();
            (
                create_progress_bar(&multi_progress, total_rows as u64),
                create_detail_bar(&multi_progress),
            )
        } else {
            (ProgressBar::hidden(), ProgressBar::hidden())
        };

        Self {
            main_bar,
            detail_bar,
            stats: IngestStats {
                rows_total: total_rows,
                ..IngestStats::default()
            },
            last_milestone: 0,
            start_time: Instant::now(),
        }
    }

    pub fn hidden(total_rows: usize) -> Self {
        Self::new(total_rows, false)
    }

    pub fn record_message(&mut self, source: ClassificationSource) {
        self.stats.messages_created += 1;
        match source {
            ClassificationSource::External => self.stats.external_classified += 1,
            ClassificationSource::RuleFallback => self.stats.fallback_classified += 1,
            ClassificationSource::Rules | ClassificationSource::Preset => {
                self.stats.rule_classified += 1
            }
        }
        self.advance();
    }

    pub fn record_skipped(&mut self) {
        self.stats.rows_skipped += 1;
        self.advance();
    }

    pub fn milestones(&self) -> &[u8] {
        &self.stats.milestones
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Ingestion complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.main_bar.abandon_with_message("Ingestion cancelled");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> IngestStats {
        IngestStats {
            duration_ms: self.start_time.elapsed().as_millis() as u64,
            ..self.stats.clone()
        }
    }

    /// Counts one processed row and announces the highest 10% boundary crossed, if new.
    fn advance(&mut self) -> Option<u8> {
        self.stats.rows_processed += 1;
        self.main_bar.inc(1);
        self.update_detail_bar();

        if self.stats.rows_total == 0 {
            return None;
        }

        let percent = (self.stats.rows_processed * 100 / self.stats.rows_total).min(100);
        let milestone = (percent / 10 * 10) as u8;

        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            self.stats.milestones.push(milestone);
            info!(
                "Processing: {}% complete ({}/{})",
                milestone, self.stats.rows_processed, self.stats.rows_total
            );
            return Some(milestone);
        }

        None
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Messages: {} | Skipped: {} | External: {} | Fallback: {}",
            self.stats.messages_created,
            self.stats.rows_skipped,
            self.stats.external_classified,
            self.stats.fallback_classified
        );
        self.detail_bar.set_message(message);
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta}) {msg}",
    ) {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_calculations() {
        let stats = IngestStats {
            rows_processed: 100,
            messages_created: 90,
            duration_ms: 10_000,
            ..IngestStats::new()
        };

        assert_eq!(stats.rows_per_second(), 10.0);
        assert_eq!(stats.success_rate(), 90.0);
    }

    #[test]
    fn test_stats_zero_rows() {
        let stats = IngestStats::new();
        assert_eq!(stats.rows_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_milestones_every_ten_percent() {
        let mut tracker = ProgressTracker::hidden(20);
        for _ in 0..20 {
            tracker.record_message(ClassificationSource::Rules);
        }
        assert_eq!(tracker.milestones(), &[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_milestones_with_few_rows() {
        let mut tracker = ProgressTracker::hidden(3);
        tracker.record_message(ClassificationSource::External);
        tracker.record_skipped();
        tracker.record_message(ClassificationSource::RuleFallback);

        assert_eq!(tracker.milestones(), &[30, 60, 100]);

        let stats = tracker.get_stats();
        assert_eq!(stats.rows_processed, 3);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.external_classified, 1);
        assert_eq!(stats.fallback_classified, 1);
        assert_eq!(stats.messages_created, 2);
    }
}
