use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where a resolved file set came from; decides the default output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
    Missing,
}

impl InputKind {
    pub fn of(path: &Path) -> Self {
        if path.is_file() {
            InputKind::File
        } else if path.is_dir() {
            InputKind::Directory
        } else {
            InputKind::Missing
        }
    }
}

/// Resolves an input path into the ordered list of candidate files.
///
/// A regular file resolves to itself. A directory resolves to the regular
/// files directly inside it, sorted byte-wise by file name so repeated runs
/// over the same directory always produce the same order. Anything else
/// resolves to an empty list.
pub fn resolve<P: AsRef<Path>>(path: P) -> Vec<PathBuf> {
    let path = path.as_ref();

    match InputKind::of(path) {
        InputKind::File => vec![path.to_path_buf()],
        InputKind::Directory => list_directory(path),
        InputKind::Missing => Vec::new(),
    }
}

fn list_directory(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => log::warn!("skipping unreadable entry in {}: {}", dir.display(), err),
        }
    }

    files
}
