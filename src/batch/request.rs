use crate::config::Config;
use crate::error::{Result, VdToolError};
use crate::scanner::{self, InputKind};
use crate::vector::ForcedSize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options as they arrive from the command line, before any checks.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub convert: bool,
    pub display: bool,
    pub input: Option<String>,
    pub output: Option<String>,
    pub width_dp: Option<i64>,
    pub height_dp: Option<i64>,
}

/// Options that passed every check in [`validate_options`].
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    pub convert: bool,
    pub display: bool,
    pub input: PathBuf,
    pub files: Vec<PathBuf>,
    /// Present whenever `convert` is set.
    pub output_dir: Option<PathBuf>,
    pub width: Option<ForcedSize>,
    pub height: Option<ForcedSize>,
}

/// Everything one batch needs. Built once, never changed.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionRequest {
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub width: Option<ForcedSize>,
    pub height: Option<ForcedSize>,
    pub add_header: bool,
    pub keep_broken: bool,
    pub broken_extension: String,
    pub jobs: usize,
}

impl ConversionRequest {
    pub fn new(files: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        Self {
            files,
            output_dir,
            width: None,
            height: None,
            add_header: false,
            keep_broken: false,
            broken_extension: "broken".to_string(),
            jobs: 1,
        }
    }

    pub fn with_size(mut self, width: Option<ForcedSize>, height: Option<ForcedSize>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_header(mut self, add_header: bool) -> Self {
        self.add_header = add_header;
        self
    }

    pub fn with_keep_broken(mut self, keep_broken: bool) -> Self {
        self.keep_broken = keep_broken;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

impl ValidatedOptions {
    /// The batch to run, or `None` when only display mode was requested.
    pub fn conversion_request(&self, config: &Config) -> Option<ConversionRequest> {
        if !self.convert {
            return None;
        }

        let output_dir = self.output_dir.clone()?;
        let mut request = ConversionRequest::new(self.files.clone(), output_dir)
            .with_size(self.width, self.height)
            .with_header(config.conversion.add_header)
            .with_keep_broken(config.conversion.keep_broken)
            .with_jobs(config.effective_jobs());
        request.broken_extension = config.conversion.broken_extension.clone();

        Some(request)
    }
}

/// Checks the options in a fixed order and resolves the input file set.
///
/// Reads the file system but never writes to it.
pub fn validate_options(options: &RunOptions) -> Result<ValidatedOptions> {
    if !options.convert && !options.display {
        return Err(VdToolError::ModeRequired);
    }

    let input = match options.input.as_deref() {
        Some(input) if !input.is_empty() => PathBuf::from(input),
        _ => return Err(VdToolError::InputRequired),
    };

    let files = scanner::resolve(&input);
    if files.is_empty() {
        return Err(VdToolError::EmptyInputSet {
            path: input.display().to_string(),
        });
    }

    let output_dir = if options.convert {
        let dir = match options.output.as_deref() {
            Some(output) => expand_home(output),
            None => default_output_dir(&input),
        };
        if !dir.is_dir() {
            return Err(VdToolError::InvalidOutputDir {
                path: dir.display().to_string(),
            });
        }
        Some(dir)
    } else {
        None
    };

    Ok(ValidatedOptions {
        convert: options.convert,
        display: options.display,
        input,
        files,
        output_dir,
        width: options.width_dp.and_then(ForcedSize::from_raw),
        height: options.height_dp.and_then(ForcedSize::from_raw),
    })
}

fn default_output_dir(input: &Path) -> PathBuf {
    match InputKind::of(input) {
        InputKind::Directory => input.to_path_buf(),
        _ => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };

    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match home {
        Some(home) => {
            let mut expanded = PathBuf::from(home);
            let rest = rest.trim_start_matches(['/', '\\']);
            if !rest.is_empty() {
                expanded.push(rest);
            }
            expanded
        }
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(input: Option<&Path>) -> RunOptions {
        RunOptions {
            convert: true,
            input: input.map(|p| p.display().to_string()),
            ..RunOptions::default()
        }
    }

    #[test]
    fn test_mode_is_checked_first() {
        let result = validate_options(&RunOptions::default());
        assert!(matches!(result, Err(VdToolError::ModeRequired)));
    }

    #[test]
    fn test_input_required() {
        let result = validate_options(&options(None));
        assert!(matches!(result, Err(VdToolError::InputRequired)));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_options(&options(Some(temp_dir.path())));

        match result {
            Err(VdToolError::EmptyInputSet { path }) => {
                assert_eq!(path, temp_dir.path().display().to_string())
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_output_defaults_to_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.svg"), "<svg/>").unwrap();

        let validated = validate_options(&options(Some(temp_dir.path()))).unwrap();
        assert_eq!(validated.output_dir.as_deref(), Some(temp_dir.path()));
        assert_eq!(validated.files.len(), 1);
    }

    #[test]
    fn test_output_defaults_to_file_parent() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.svg");
        fs::write(&file, "<svg/>").unwrap();

        let validated = validate_options(&options(Some(&file))).unwrap();
        assert_eq!(validated.output_dir.as_deref(), Some(temp_dir.path()));
        assert_eq!(validated.files, vec![file]);
    }

    #[test]
    fn test_invalid_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.svg");
        fs::write(&file, "<svg/>").unwrap();

        let mut opts = options(Some(&file));
        opts.output = Some(temp_dir.path().join("missing").display().to_string());
        assert!(matches!(
            validate_options(&opts),
            Err(VdToolError::InvalidOutputDir { .. })
        ));

        opts.output = Some(file.display().to_string());
        assert!(matches!(
            validate_options(&opts),
            Err(VdToolError::InvalidOutputDir { .. })
        ));
    }

    #[test]
    fn test_display_only_skips_output_check() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.xml"), "<vector/>").unwrap();

        let opts = RunOptions {
            display: true,
            input: Some(temp_dir.path().display().to_string()),
            output: Some("/definitely/not/here".to_string()),
            ..RunOptions::default()
        };

        let validated = validate_options(&opts).unwrap();
        assert!(validated.output_dir.is_none());
        assert!(validated.conversion_request(&Config::default()).is_none());
    }

    #[test]
    fn test_non_positive_sizes_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.svg"), "<svg/>").unwrap();

        let mut opts = options(Some(temp_dir.path()));
        opts.width_dp = Some(-1);
        opts.height_dp = Some(0);
        let validated = validate_options(&opts).unwrap();
        assert_eq!(validated.width, None);
        assert_eq!(validated.height, None);

        opts.width_dp = Some(24);
        let validated = validate_options(&opts).unwrap();
        assert_eq!(validated.width.map(|w| w.dp()), Some(24));
    }

    #[test]
    fn test_conversion_request_takes_config_flags() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.svg"), "<svg/>").unwrap();

        let mut config = Config::default();
        config.conversion.add_header = true;
        config.conversion.jobs = 3;

        let validated = validate_options(&options(Some(temp_dir.path()))).unwrap();
        let request = validated.conversion_request(&config).unwrap();
        assert!(request.add_header);
        assert!(!request.keep_broken);
        assert_eq!(request.jobs, 3);
        assert_eq!(request.output_dir, temp_dir.path());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("out"), PathBuf::from("out"));
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));

        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_home("~"), PathBuf::from(&home));
            assert_eq!(expand_home("~/icons"), PathBuf::from(&home).join("icons"));
        }
    }
}
