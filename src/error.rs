use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VdToolError {
    #[error("either -c or -d must be specified")]
    ModeRequired,

    #[error("no input files argument")]
    InputRequired,

    #[error("there is no file to process in {path}")]
    EmptyInputSet { path: String },

    #[error("output directory {path} doesn't exist or isn't a valid directory")]
    InvalidOutputDir { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conversion of {path} failed: {message}")]
    Conversion { path: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl VdToolError {
    pub fn conversion<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        VdToolError::Conversion {
            path: path.into().display().to_string(),
            message: message.into(),
        }
    }

    /// True for errors caused by the command line itself, which are
    /// reported together with the usage text.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            VdToolError::ModeRequired
                | VdToolError::InputRequired
                | VdToolError::EmptyInputSet { .. }
                | VdToolError::InvalidOutputDir { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            VdToolError::ModeRequired
            | VdToolError::InputRequired
            | VdToolError::EmptyInputSet { .. }
            | VdToolError::InvalidOutputDir { .. } => 1,
            VdToolError::Config { .. } => 3,
            VdToolError::Io(_) | VdToolError::Write { .. } => 4,
            VdToolError::Conversion { .. } => 5,
            VdToolError::Cancelled => 130, // Interrupted (SIGINT)
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for VdToolError {
    fn user_message(&self) -> String {
        match self {
            VdToolError::EmptyInputSet { path } => {
                format!("There is no file to process in {}", path)
            }
            VdToolError::InvalidOutputDir { path } => {
                format!(
                    "Output directory {} doesn't exist or isn't a valid directory",
                    path
                )
            }
            VdToolError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            VdToolError::Conversion { path, message } => {
                format!("Error converting {}: {}", path, message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            VdToolError::ModeRequired => Some(
                "Pass -c to convert SVG files, -d to display VectorDrawables, or both.".to_string(),
            ),
            VdToolError::InputRequired => Some(
                "Pass -in <file or directory> to choose what to process.".to_string(),
            ),
            VdToolError::EmptyInputSet { .. } => Some(
                "Check that the input path exists and contains files.".to_string(),
            ),
            VdToolError::InvalidOutputDir { .. } => Some(
                "Create the directory first; -out never creates missing directories.".to_string(),
            ),
            VdToolError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config."
                    .to_string(),
            ),
            VdToolError::Write { .. } => Some(
                "Ensure you have write permission for the output directory.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for VdToolError {
    fn from(error: toml::de::Error) -> Self {
        VdToolError::Config {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for VdToolError {
    fn from(error: regex::Error) -> Self {
        VdToolError::Config {
            message: format!("invalid exclude pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, VdToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = VdToolError::EmptyInputSet {
            path: "icons".to_string(),
        };
        assert!(error.user_message().contains("no file to process in icons"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_usage_errors_share_exit_code() {
        let errors = [
            VdToolError::ModeRequired,
            VdToolError::InputRequired,
            VdToolError::EmptyInputSet {
                path: "x".to_string(),
            },
            VdToolError::InvalidOutputDir {
                path: "y".to_string(),
            },
        ];

        for error in &errors {
            assert!(error.is_usage_error());
            assert_eq!(error.exit_code(), 1);
        }

        assert!(!VdToolError::Cancelled.is_usage_error());
        assert_eq!(VdToolError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = VdToolError::from(toml_error);
        assert!(matches!(error, VdToolError::Config { .. }));
    }

    #[test]
    fn test_conversion_helper() {
        let error = VdToolError::conversion("a/b.svg", "bad path data");
        assert_eq!(error.to_string(), "Conversion of a/b.svg failed: bad path data");
    }
}
