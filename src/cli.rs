use crate::batch::RunOptions;
use crate::config::{CliOverrides, Config, ConverterKind};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
Converts SVG files to VectorDrawable XML files.
Displays VectorDrawables.
Usage: [-c] [-d] [-in <file or directory>] [-out <directory>] [-widthDp <size>] [-heightDp <size>] [-addHeader]
Options:
  -in <file or directory>   With -c, converts the given .svg file, or every .svg
                            file directly inside the given directory. With -d,
                            lists the given VectorDrawable XML file, or every
                            VectorDrawable directly inside the given directory.
  -out <directory>          Writes converted files to <directory>, which must
                            already exist. Defaults to the directory holding
                            the input files.
  -c                        Converts SVG files to VectorDrawable XML and writes
                            them out.
  -d                        Lists the given VectorDrawables, or the conversion
                            results when -c is also given.
  -widthDp <size>           Forces the width to <size> dp; <size> is an integer.
  -heightDp <size>          Forces the height to <size> dp; <size> is an integer.
  -addHeader                Puts the AOSP license header at the top of each
                            generated XML file.
Flags are case-insensitive. Run with --help for the long options.
Examples:
  1) Convert every SVG file in <directory> next to its source and list the results:
  vdtool -c -d -in <directory>
  2) Convert one SVG file and list the result:
  vdtool -c -d -in file.svg
  3) List the VectorDrawable XML files in <directory>:
  vdtool -d -in <directory>
";

#[derive(Parser, Debug)]
#[command(name = "vdtool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(args_override_self = true)]
#[command(about = "Convert SVG files to VectorDrawable XML and list VectorDrawables")]
#[command(
    long_about = "vdtool converts a single SVG file, or every SVG file in a directory, into \
                  Android VectorDrawable XML. Output sizes can be forced in dp and an AOSP \
                  license header can be prepended. Display mode lists VectorDrawables with \
                  their declared size."
)]
#[command(after_help = "EXAMPLES:\n  \
    vdtool -c -in icons/\n  \
    vdtool -c -d -in icons/ -out res/drawable -widthDp 24 -heightDp 24\n  \
    vdtool --convert --input logo.svg --add-header\n  \
    vdtool -d -in res/drawable\n\n\
    Legacy single-dash flags (-in, -out, -widthDp, ...) are accepted in any case.")]
pub struct Cli {
    /// Convert SVG files to VectorDrawable XML
    #[arg(short = 'c', long)]
    pub convert: bool,

    /// List VectorDrawables (the conversion results when combined with -c)
    #[arg(short = 'd', long)]
    pub display: bool,

    /// Input file or directory
    #[arg(long, value_name = "FILE_OR_DIR")]
    pub input: Option<String>,

    /// Output directory; must exist (defaults to the input's directory)
    #[arg(long, value_name = "DIR")]
    pub output: Option<String>,

    /// Force the output width in dp (zero or less leaves it unchanged)
    #[arg(long, value_name = "SIZE", allow_negative_numbers = true)]
    pub width_dp: Option<i64>,

    /// Force the output height in dp (zero or less leaves it unchanged)
    #[arg(long, value_name = "SIZE", allow_negative_numbers = true)]
    pub height_dp: Option<i64>,

    /// Prepend the AOSP license header to generated files
    #[arg(long)]
    pub add_header: bool,

    /// Configuration file path
    #[arg(long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors and the final summary)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of files converted at once (0 = one per CPU)
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Copy SVG files that fail to convert next to the outputs
    #[arg(long)]
    pub keep_broken: bool,

    /// Write a JSON report of the batch to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Converter used for each SVG file
    #[arg(long, value_enum)]
    pub converter: Option<ConverterChoice>,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConverterChoice {
    /// Built-in converter for common icon SVGs
    Builtin,
    /// External program from `converter.command` in the config file
    Command,
}

impl From<ConverterChoice> for ConverterKind {
    fn from(choice: ConverterChoice) -> Self {
        match choice {
            ConverterChoice::Builtin => ConverterKind::Builtin,
            ConverterChoice::Command => ConverterKind::Command,
        }
    }
}

/// (legacy spelling in lower case, long flag, takes a value)
const LEGACY_FLAGS: &[(&str, &str, bool)] = &[
    ("-c", "--convert", false),
    ("-d", "--display", false),
    ("-in", "--input", true),
    ("-out", "--output", true),
    ("-widthdp", "--width-dp", true),
    ("-heightdp", "--height-dp", true),
    ("-addheader", "--add-header", false),
];

const VALUE_FLAGS: &[&str] = &[
    "--input",
    "--output",
    "--width-dp",
    "--height-dp",
    "--config",
    "--output-format",
    "--jobs",
    "--report",
    "--converter",
];

/// Rewrites the legacy single-dash flags, in any case, to
/// their long forms so clap can parse them. Flag values are passed through
/// untouched.
pub fn normalize_legacy_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expect_value = false;

    for arg in args {
        if expect_value {
            expect_value = false;
            normalized.push(arg);
            continue;
        }

        let text = arg.to_str().map(str::to_ascii_lowercase);
        let legacy = text
            .as_deref()
            .and_then(|lower| LEGACY_FLAGS.iter().find(|(flag, _, _)| *flag == lower));

        match legacy {
            Some((_, long, takes_value)) => {
                normalized.push(OsString::from(*long));
                expect_value = *takes_value;
            }
            None => {
                expect_value = arg
                    .to_str()
                    .map(|s| VALUE_FLAGS.contains(&s))
                    .unwrap_or(false);
                normalized.push(arg);
            }
        }
    }

    normalized
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    /// Switches only override the file when given; absent means "keep".
    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_add_header(self.add_header.then_some(true))
            .with_keep_broken(self.keep_broken.then_some(true))
            .with_jobs(self.jobs)
            .with_converter(self.converter.map(ConverterKind::from))
            .with_report_path(self.report.clone())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            convert: self.convert,
            display: self.display,
            input: self.input.clone(),
            output: self.output.clone(),
            width_dp: self.width_dp,
            height_dp: self.height_dp,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Off;
        }
        match self.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
