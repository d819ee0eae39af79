use crate::converter::SvgConverter;
use crate::error::{Result, VdToolError};
use std::path::Path;
use std::process::{Command, Stdio};

/// Delegates conversion to an external program that takes the SVG path as
/// its last argument and prints VectorDrawable XML on stdout.
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl SvgConverter for CommandConverter {
    fn convert(&self, input: &Path) -> Result<String> {
        log::debug!("running {} {:?} {}", self.program, self.args, input.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                VdToolError::conversion(input, format!("cannot run '{}': {}", self.program, e))
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("'{}' exited with {}", self.program, output.status)
            } else {
                stderr
            };
            Err(VdToolError::conversion(input, message))
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
