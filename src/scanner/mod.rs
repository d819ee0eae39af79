pub mod file_filter;
pub mod file_set;

pub use file_filter::FileFilter;
pub use file_set::{resolve, InputKind};
