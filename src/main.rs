use clap::Parser;
use std::process;
use vdtool::{
    normalize_legacy_args, validate_options, Cli, OutputFormatter, OutputMode, UserFriendlyError,
    VdTool, VdToolError, USAGE,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::try_parse_from(normalize_legacy_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            if !e.use_stderr() {
                // --help and --version
                let _ = e.print();
                return 0;
            }
            eprintln!("{}", e);
            eprint!("{}", USAGE);
            return 1;
        }
    };

    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Command line problems are reported before anything else happens.
    let options = match validate_options(&cli.run_options()) {
        Ok(options) => options,
        Err(e) => {
            if e.is_usage_error() {
                print_usage_error(&e);
            } else {
                print_startup_error(&e);
            }
            return e.exit_code();
        }
    };

    let vdtool = match VdTool::from_cli(&cli) {
        Ok(vdtool) => vdtool,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    match vdtool.run(&options) {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            vdtool.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "vdtool.toml".to_string());

    match VdTool::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  vdtool -c -in <directory> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_usage_error(error: &VdToolError) {
    eprintln!("ERROR: {}", error.user_message());
    eprint!("{}", USAGE);
}

fn print_startup_error(error: &VdToolError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

/// `RUST_LOG` wins over the level picked by -v/-q.
fn setup_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level());
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "vdtool",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[conversion]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let cli = Cli::parse_from([
            "vdtool",
            "--generate-config",
            "--config",
            "/definitely/not/here/vdtool.toml",
        ]);
        assert_eq!(handle_generate_config(&cli), 1);
    }
}
