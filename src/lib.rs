pub mod batch;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod preview;
pub mod scanner;
pub mod ui;
pub mod vector;

// Public API re-exports
pub use cli::{normalize_legacy_args, Cli, OutputFormat, USAGE};
pub use config::{CliOverrides, Config, ConversionConfig, ConverterConfig, ConverterKind, OutputConfig};
pub use error::{Result, UserFriendlyError, VdToolError};

// Core functionality re-exports
pub use batch::{
    validate_options, BatchConverter, BatchReport, BatchResult, ConversionOutcome,
    ConversionRequest, OutcomeStatus, RunOptions, ValidatedOptions,
};
pub use converter::{build_converter, BuiltinConverter, CommandConverter, SvgConverter};
pub use preview::{collect_preview, PreviewEntry};
pub use scanner::FileFilter;
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};
pub use vector::{override_xml_content, ForcedSize, OverrideInfo};

use std::path::{Path, PathBuf};

/// What a run did, used to pick the exit status.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub batch: Option<BatchResult>,
    pub preview: Option<Vec<PreviewEntry>>,
}

impl RunSummary {
    /// 0 on full success, 2 when some files failed, 130 when the batch
    /// was interrupted.
    pub fn exit_code(&self) -> i32 {
        match self.batch {
            Some(ref batch) if batch.skipped > 0 => 130,
            Some(ref batch) if batch.has_failures() => 2,
            _ => 0,
        }
    }
}

/// Main library interface: one configured tool instance per process.
pub struct VdTool {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl VdTool {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Instance without a process-wide Ctrl-C handler.
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Converts (when asked), then lists (when asked). Display after a
    /// conversion shows the batch's outputs; otherwise the input files.
    pub fn run(&self, options: &ValidatedOptions) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if let Some(request) = options.conversion_request(&self.config) {
            summary.batch = Some(self.convert(&request)?);
        }

        if options.display {
            let paths = match summary.batch {
                Some(ref batch) => batch.output_paths.clone(),
                None => options.files.clone(),
            };
            summary.preview = Some(self.display(&paths)?);
        }

        Ok(summary)
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<BatchResult> {
        self.shutdown.check_shutdown()?;

        let converter = build_converter(&self.config.converter)?;
        let filter = FileFilter::new(&self.config.conversion)?;

        self.output_formatter.start_operation(&format!(
            "Converting {} into {}",
            describe_inputs(&request.files),
            request.output_dir.display()
        ));

        let file_progress = self
            .progress_manager
            .create_file_progress(request.files.iter().filter(|p| filter.is_source_file(p)).count() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &batch::BatchProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = BatchConverter::new(converter.as_ref(), &filter)
            .with_shutdown(&self.shutdown)
            .run(request, Some(&progress_callback));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Converted {} files", result.attempted - result.failures),
            result.elapsed,
        );

        self.output_formatter.print_failures(&result);
        self.output_formatter.print_batch_summary(&result);

        if let Some(ref report_path) = self.config.output.report_path {
            BatchReport::new(request, &result, converter.name()).save_json(report_path)?;
            self.output_formatter
                .success(&format!("Report written to {}", report_path.display()));
        }

        Ok(result)
    }

    pub fn display(&self, paths: &[PathBuf]) -> Result<Vec<PreviewEntry>> {
        self.shutdown.check_shutdown()?;

        let filter = FileFilter::new(&self.config.conversion)?;
        let entries = collect_preview(paths, &filter);
        self.output_formatter.print_preview(&entries);

        Ok(entries)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn handle_error(&self, error: &VdToolError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn describe_inputs(files: &[PathBuf]) -> String {
    match files {
        [single] => single.display().to_string(),
        _ => format!("{} files", files.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><path d="M4 4h40v40H4z"/></svg>"#;

    fn icons() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.svg"), SVG).unwrap();
        fs::write(temp_dir.path().join("b.svg"), "<svg").unwrap();
        fs::write(temp_dir.path().join("c.txt"), "notes").unwrap();
        temp_dir
    }

    fn validated(dir: &Path, convert: bool, display: bool) -> ValidatedOptions {
        validate_options(&RunOptions {
            convert,
            display,
            input: Some(dir.display().to_string()),
            ..RunOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn test_convert_then_display() {
        let temp_dir = icons();
        let tool = VdTool::new_for_test(Config::default(), OutputMode::Plain, 0, true);

        let summary = tool.run(&validated(temp_dir.path(), true, true)).unwrap();

        let batch = summary.batch.as_ref().unwrap();
        assert_eq!(batch.attempted, 2);
        assert_eq!(batch.failures, 1);
        assert_eq!(summary.exit_code(), 2);

        // Only the written output is a display candidate.
        let preview = summary.preview.unwrap();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].width.as_deref(), Some("48dp"));
    }

    #[test]
    fn test_display_only() {
        let temp_dir = icons();
        fs::write(
            temp_dir.path().join("x.xml"),
            r#"<vector xmlns:android="http://schemas.android.com/apk/res/android" android:width="8dp" android:height="8dp"/>"#,
        )
        .unwrap();
        let tool = VdTool::new_for_test(Config::default(), OutputMode::Plain, 0, true);

        let summary = tool.run(&validated(temp_dir.path(), false, true)).unwrap();
        assert!(summary.batch.is_none());
        assert_eq!(summary.preview.unwrap().len(), 1);
        assert!(!temp_dir.path().join("a.xml").exists());
    }

    #[test]
    fn test_report_is_written() {
        let temp_dir = icons();
        let report_path = temp_dir.path().join("report.json");
        let mut config = Config::default();
        config.output.report_path = Some(report_path.clone());
        let tool = VdTool::new_for_test(config, OutputMode::Plain, 0, true);

        tool.run(&validated(temp_dir.path(), true, false)).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["summary"]["failures"], 1);
        assert_eq!(report["converter"], "builtin");
    }

    #[test]
    fn test_cancelled_tool_refuses_work() {
        let temp_dir = icons();
        let tool = VdTool::new_for_test(Config::default(), OutputMode::Plain, 0, true);
        tool.shutdown.request_shutdown();

        let result = tool.run(&validated(temp_dir.path(), true, false));
        assert!(matches!(result, Err(VdToolError::Cancelled)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunSummary::default().exit_code(), 0);
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("vdtool.toml");

        VdTool::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[conversion]"));
        assert!(content.contains("[converter]"));
    }
}
