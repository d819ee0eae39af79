use crate::error::{Result, VdToolError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub conversion: ConversionConfig,
    pub converter: ConverterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub source_extension: String,
    pub target_extension: String,
    pub add_header: bool,
    pub keep_broken: bool,
    pub broken_extension: String,
    pub jobs: usize,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    Builtin,
    Command,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub kind: ConverterKind,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_path: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_extension: "svg".to_string(),
            target_extension: "xml".to_string(),
            add_header: false,
            keep_broken: false,
            broken_extension: "broken".to_string(),
            jobs: 1, // Sequential keeps console output ordered
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            kind: ConverterKind::Builtin,
            command: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(VdToolError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| VdToolError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| VdToolError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["vdtool.toml", ".vdtool.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(add_header) = cli_args.add_header {
            self.conversion.add_header = add_header;
        }

        if let Some(keep_broken) = cli_args.keep_broken {
            self.conversion.keep_broken = keep_broken;
        }

        if let Some(jobs) = cli_args.jobs {
            self.conversion.jobs = jobs;
        }

        if let Some(kind) = cli_args.converter {
            self.converter.kind = kind;
        }

        if let Some(ref report_path) = cli_args.report_path {
            self.output.report_path = Some(report_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let source = self.conversion.source_extension.trim_start_matches('.');
        let target = self.conversion.target_extension.trim_start_matches('.');

        if source.is_empty() || target.is_empty() {
            return Err(VdToolError::Config {
                message: "Source and target extensions must not be empty".to_string(),
            });
        }

        if source == target {
            return Err(VdToolError::Config {
                message: format!(
                    "Source and target extensions are both '{}'; outputs would overwrite inputs",
                    source
                ),
            });
        }

        for pattern in &self.conversion.exclude_patterns {
            Regex::new(pattern)?;
        }

        if self.converter.kind == ConverterKind::Command && self.converter.command.is_empty() {
            return Err(VdToolError::Config {
                message: "converter.kind = \"command\" requires a non-empty converter.command"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Worker count with `0` meaning one worker per CPU.
    pub fn effective_jobs(&self) -> usize {
        if self.conversion.jobs == 0 {
            num_cpus::get()
        } else {
            self.conversion.jobs
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub add_header: Option<bool>,
    pub keep_broken: Option<bool>,
    pub jobs: Option<usize>,
    pub converter: Option<ConverterKind>,
    pub report_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_add_header(mut self, add_header: Option<bool>) -> Self {
        self.add_header = add_header;
        self
    }

    pub fn with_keep_broken(mut self, keep_broken: Option<bool>) -> Self {
        self.keep_broken = keep_broken;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_converter(mut self, converter: Option<ConverterKind>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_report_path(mut self, report_path: Option<PathBuf>) -> Self {
        self.report_path = report_path;
        self
    }
}
