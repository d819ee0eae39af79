//! Textual display mode: lists the VectorDrawables a run produced (or was
//! pointed at) together with their declared size.

use crate::scanner::FileFilter;
use crate::vector::{parse_vector_document, VectorSize};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct PreviewEntry {
    pub path: PathBuf,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Keeps the display candidates among `paths`, in order, and reads the size
/// each one declares. Files whose root cannot be read get no size.
pub fn collect_preview(paths: &[PathBuf], filter: &FileFilter) -> Vec<PreviewEntry> {
    paths
        .iter()
        .filter(|path| filter.is_display_candidate(path))
        .map(|path| {
            let size = std::fs::read_to_string(path)
                .ok()
                .and_then(|text| parse_vector_document(&text).and_then(|doc| VectorSize::read(&doc)));

            if size.is_none() {
                log::debug!("{} has no readable vector size", path.display());
            }

            PreviewEntry {
                path: path.clone(),
                width: size.as_ref().map(|s| s.width.clone()),
                height: size.map(|s| s.height),
            }
        })
        .collect()
}

pub fn showing_line(count: usize) -> String {
    format!("Showing {} valid icons", count)
}
