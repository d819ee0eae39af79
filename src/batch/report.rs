use crate::batch::outcome::{BatchResult, ConversionOutcome};
use crate::batch::request::ConversionRequest;
use crate::batch::writer::write_output;
use crate::error::{Result, VdToolError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// The console summary of a convert run.
pub fn summary_line(result: &BatchResult) -> String {
    format!(
        "Convert {} SVG files in total, errors found in {} files",
        result.attempted, result.failures
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub converter: String,
    pub request: ConversionRequest,
    pub summary: ReportSummary,
    pub outcomes: Vec<ConversionOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub attempted: usize,
    pub failures: usize,
    pub skipped: usize,
    pub duration_ms: u128,
}

impl BatchReport {
    pub fn new(request: &ConversionRequest, result: &BatchResult, converter: &str) -> Self {
        Self {
            generated_at: Utc::now(),
            converter: converter.to_string(),
            request: request.clone(),
            summary: ReportSummary {
                attempted: result.attempted,
                failures: result.failures,
                skipped: result.skipped,
                duration_ms: result.elapsed.as_millis(),
            },
            outcomes: result.outcomes.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| VdToolError::Io(e.into()))
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut json = self.to_json()?;
        json.push('\n');
        write_output(path, &json)?;
        log::info!("wrote batch report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample() -> (ConversionRequest, BatchResult) {
        let request = ConversionRequest::new(
            vec![PathBuf::from("in/a.svg"), PathBuf::from("in/b.svg")],
            PathBuf::from("out"),
        );
        let result = BatchResult::from_outcomes(
            vec![
                ConversionOutcome::converted("in/a.svg".into(), "out/a.xml".into()),
                ConversionOutcome::failed("in/b.svg".into(), "out/b.xml".into(), "bad arc"),
            ],
            Duration::from_millis(12),
        );
        (request, result)
    }

    #[test]
    fn test_summary_line() {
        let (_, result) = sample();
        assert_eq!(
            summary_line(&result),
            "Convert 2 SVG files in total, errors found in 1 files"
        );
    }

    #[test]
    fn test_report_json() {
        let (request, result) = sample();
        let report = BatchReport::new(&request, &result, "builtin");
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["converter"], "builtin");
        assert_eq!(value["summary"]["attempted"], 2);
        assert_eq!(value["summary"]["failures"], 1);
        assert_eq!(value["outcomes"][1]["status"], "failed");
        assert_eq!(value["outcomes"][1]["error"], "bad arc");
        assert_eq!(value["request"]["add_header"], false);
    }

    #[test]
    fn test_save_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        let (request, result) = sample();

        BatchReport::new(&request, &result, "builtin")
            .save_json(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"outcomes\""));
        assert!(content.ends_with("}\n"));
    }
}
