use crate::batch::{summary_line, BatchResult};
use crate::error::{UserFriendlyError, VdToolError};
use crate::preview::{showing_line, PreviewEntry};
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &VdToolError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => self.print_json_object(&serde_json::json!({
                    "type": "suggestion",
                    "message": suggestion
                })),
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Per-file failures, in input order.
    pub fn print_failures(&self, result: &BatchResult) {
        for outcome in result.failed() {
            let message = outcome.error.as_deref().unwrap_or("conversion failed");
            match self.mode {
                OutputMode::Json => self.print_json_object(&serde_json::json!({
                    "type": "failure",
                    "source": outcome.source_path.display().to_string(),
                    "output": outcome.output_path.display().to_string(),
                    "message": message
                })),
                _ => self.error(message),
            }
        }
    }

    /// Printed for every convert run, quiet or not.
    pub fn print_batch_summary(&self, result: &BatchResult) {
        let line = summary_line(result);

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    let styled = if result.has_failures() {
                        style(line).yellow().bold()
                    } else {
                        style(line).green().bold()
                    };
                    let mark = if result.has_failures() { WARNING } else { CHECKMARK };
                    println!("{}{}", mark, styled);
                } else {
                    println!("{}", line);
                }
                if result.skipped > 0 && !self.quiet {
                    println!("  Skipped after interruption: {}", result.skipped);
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "summary",
                "attempted": result.attempted,
                "failures": result.failures,
                "skipped": result.skipped,
                "duration_ms": result.elapsed.as_millis(),
                "output_paths": result
                    .output_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => {
                println!("{}", line);
                if result.skipped > 0 {
                    println!("Skipped: {}", result.skipped);
                }
            }
        }
    }

    pub fn print_preview(&self, entries: &[PreviewEntry]) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "preview",
                "count": entries.len(),
                "icons": entries
            })),
            _ => {
                println!("{}", showing_line(entries.len()));
                for entry in entries {
                    let name = entry.path.display().to_string();
                    match (&entry.width, &entry.height) {
                        (Some(width), Some(height)) => {
                            if self.use_colors {
                                println!("  {}  {}", name, style(format!("{} x {}", width, height)).cyan());
                            } else {
                                println!("  {}  {} x {}", name, width, height);
                            }
                        }
                        _ => {
                            if self.use_colors {
                                println!("  {}  {}", name, style("(invalid VectorDrawable)").red());
                            } else {
                                println!("  {}  (invalid VectorDrawable)", name);
                            }
                        }
                    }
                }
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (CHECKMARK, style(message).green().bold()),
                MessageType::Error => (CROSS, style(message).red().bold()),
                MessageType::Info => (INFO, style(message).cyan()),
            };
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Info => "i",
            };
            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.use_colors);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }
}
