pub mod orchestrator;
pub mod outcome;
pub mod report;
pub mod request;
pub mod writer;

pub use orchestrator::{BatchConverter, ProgressCallback};
pub use outcome::{BatchProgress, BatchResult, ConversionOutcome, OutcomeStatus};
pub use report::{summary_line, BatchReport};
pub use request::{expand_home, validate_options, ConversionRequest, RunOptions, ValidatedOptions};
pub use writer::write_output;
