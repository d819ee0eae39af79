pub mod builtin;
pub mod command;

pub use builtin::BuiltinConverter;
pub use command::CommandConverter;

use crate::config::{ConverterConfig, ConverterKind};
use crate::error::{Result, VdToolError};
use std::path::Path;

/// Turns one SVG file into VectorDrawable XML text.
///
/// An `Err` means the file failed to convert; the batch records it and
/// moves on to the next file.
pub trait SvgConverter: Send + Sync {
    fn convert(&self, input: &Path) -> Result<String>;

    fn name(&self) -> &str;
}

pub fn build_converter(config: &ConverterConfig) -> Result<Box<dyn SvgConverter>> {
    match config.kind {
        ConverterKind::Builtin => Ok(Box::new(BuiltinConverter::new())),
        ConverterKind::Command => {
            let (program, args) = config.command.split_first().ok_or_else(|| {
                VdToolError::Config {
                    message: "converter.command is empty".to_string(),
                }
            })?;
            Ok(Box::new(CommandConverter::new(program, args.to_vec())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_builtin() {
        let converter = build_converter(&ConverterConfig::default()).unwrap();
        assert_eq!(converter.name(), "builtin");
    }

    #[test]
    fn test_build_command() {
        let config = ConverterConfig {
            kind: ConverterKind::Command,
            command: vec!["svg2vd".to_string(), "--stdout".to_string()],
        };
        let converter = build_converter(&config).unwrap();
        assert_eq!(converter.name(), "svg2vd");

        let empty = ConverterConfig {
            kind: ConverterKind::Command,
            command: Vec::new(),
        };
        assert!(build_converter(&empty).is_err());
    }
}
