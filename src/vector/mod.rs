pub mod document;
pub mod header;
pub mod overrides;

pub use document::{parse_vector_document, VectorSize, ANDROID_NS};
pub use header::{current_year, license_header, prepend_header};
pub use overrides::{override_xml_content, ForcedSize, OverrideInfo};
