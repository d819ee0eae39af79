use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Converted,
    Failed,
    /// Cancelled before the file was started.
    Skipped,
}

/// What happened to one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub status: OutcomeStatus,
    pub error: Option<String>,
}

impl ConversionOutcome {
    pub fn converted(source_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            source_path,
            output_path,
            status: OutcomeStatus::Converted,
            error: None,
        }
    }

    pub fn failed<S: Into<String>>(source_path: PathBuf, output_path: PathBuf, error: S) -> Self {
        Self {
            source_path,
            output_path,
            status: OutcomeStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn skipped(source_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            source_path,
            output_path,
            status: OutcomeStatus::Skipped,
            error: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Totals for one batch, folded from its outcomes in input order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub attempted: usize,
    pub failures: usize,
    pub skipped: usize,
    /// Every output path, failed files included.
    pub output_paths: Vec<PathBuf>,
    pub outcomes: Vec<ConversionOutcome>,
    pub elapsed: Duration,
}

impl BatchResult {
    pub fn from_outcomes(outcomes: Vec<ConversionOutcome>, elapsed: Duration) -> Self {
        let (attempted, failures, skipped) =
            outcomes
                .iter()
                .fold((0, 0, 0), |(attempted, failures, skipped), outcome| {
                    match outcome.status {
                        OutcomeStatus::Converted => (attempted + 1, failures, skipped),
                        OutcomeStatus::Failed => (attempted + 1, failures + 1, skipped),
                        OutcomeStatus::Skipped => (attempted, failures, skipped + 1),
                    }
                });

        let output_paths = outcomes
            .iter()
            .filter(|o| o.status != OutcomeStatus::Skipped)
            .map(|o| o.output_path.clone())
            .collect();

        Self {
            attempted,
            failures,
            skipped,
            output_paths,
            outcomes,
            elapsed,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Live counters handed to progress callbacks while a batch runs.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl BatchProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let rate = self.files_processed as f64 / self.elapsed().as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(name: &str) -> (PathBuf, PathBuf) {
        (
            PathBuf::from(format!("in/{}.svg", name)),
            PathBuf::from(format!("out/{}.xml", name)),
        )
    }

    #[test]
    fn test_fold_counts() {
        let (a_in, a_out) = paths("a");
        let (b_in, b_out) = paths("b");
        let (c_in, c_out) = paths("c");

        let result = BatchResult::from_outcomes(
            vec![
                ConversionOutcome::converted(a_in, a_out.clone()),
                ConversionOutcome::failed(b_in, b_out.clone(), "bad path data"),
                ConversionOutcome::skipped(c_in, c_out),
            ],
            Duration::from_millis(5),
        );

        assert_eq!(result.attempted, 2);
        assert_eq!(result.failures, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.output_paths, vec![a_out, b_out]);
        assert!(result.has_failures());
        assert_eq!(result.failed().count(), 1);
        assert_eq!(result.outcomes.len(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let result = BatchResult::from_outcomes(Vec::new(), Duration::ZERO);
        assert_eq!(result.attempted, 0);
        assert!(!result.has_failures());
        assert!(result.output_paths.is_empty());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OutcomeStatus::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
    }

    #[test]
    fn test_progress_estimate() {
        let progress = BatchProgress::new(10);
        assert_eq!(progress.estimated_remaining(), Duration::from_secs(0));
        assert_eq!(progress.files_processed, 0);
    }
}
