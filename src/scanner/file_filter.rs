use crate::config::ConversionConfig;
use crate::error::Result;
use regex::Regex;
use std::path::Path;

/// Decides which resolved files take part in a batch and what their
/// outputs are called.
pub struct FileFilter {
    source_suffix: String,
    target_suffix: String,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ConversionConfig) -> Result<Self> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            source_suffix: dotted(&config.source_extension),
            target_suffix: dotted(&config.target_extension),
            exclude_patterns,
        })
    }

    /// Case-sensitive suffix match on the file name, minus excluded names.
    pub fn is_source_file(&self, path: &Path) -> bool {
        match file_name(path) {
            Some(name) => name.ends_with(&self.source_suffix) && !self.is_excluded(name),
            None => false,
        }
    }

    /// A file the preview step can show: an existing, non-empty regular
    /// file carrying the target extension.
    pub fn is_display_candidate(&self, path: &Path) -> bool {
        let Some(name) = file_name(path) else {
            return false;
        };

        if name.is_empty() || !name.ends_with(&self.target_suffix) {
            return false;
        }

        std::fs::metadata(path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    /// Output file name: everything before the last '.' plus the target
    /// extension.
    pub fn output_file_name(&self, path: &Path) -> Option<String> {
        let name = file_name(path)?;
        let stem = match name.rfind('.') {
            Some(index) => &name[..index],
            None => name,
        };
        Some(format!("{}{}", stem, self.target_suffix))
    }

    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    pub fn target_suffix(&self) -> &str {
        &self.target_suffix
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.matches_any_pattern(name)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            source_suffix: ".svg".to_string(),
            target_suffix: ".xml".to_string(),
            exclude_patterns: Vec::new(),
        }
    }
}

fn dotted(extension: &str) -> String {
    format!(".{}", extension.trim_start_matches('.'))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|s| s.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_source_file_detection() {
        let filter = FileFilter::default();

        assert!(filter.is_source_file(Path::new("icon.svg")));
        assert!(filter.is_source_file(Path::new("dir/ic_add_24.svg")));
        assert!(filter.is_source_file(Path::new("archive.tar.svg")));

        assert!(!filter.is_source_file(Path::new("icon.SVG")));
        assert!(!filter.is_source_file(Path::new("notes.txt")));
        assert!(!filter.is_source_file(Path::new("icon.svgz")));
        assert!(!filter.is_source_file(Path::new("svg")));
    }

    #[test]
    fn test_output_file_name() {
        let filter = FileFilter::default();

        assert_eq!(
            filter.output_file_name(Path::new("in/icon.svg")).unwrap(),
            "icon.xml"
        );
        assert_eq!(
            filter.output_file_name(Path::new("a.b.svg")).unwrap(),
            "a.b.xml"
        );
    }

    #[test]
    fn test_exclude_patterns() {
        let config = ConversionConfig {
            exclude_patterns: vec![r"^draft_".to_string(), r".*\.min\.svg$".to_string()],
            ..ConversionConfig::default()
        };
        let filter = FileFilter::new(&config).unwrap();

        assert!(filter.is_source_file(Path::new("icon.svg")));
        assert!(!filter.is_source_file(Path::new("draft_icon.svg")));
        assert!(!filter.is_source_file(Path::new("icon.min.svg")));
        assert!(filter.matches_any_pattern("draft_x"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let config = ConversionConfig {
            exclude_patterns: vec!["[".to_string()],
            ..ConversionConfig::default()
        };
        assert!(FileFilter::new(&config).is_err());
    }

    #[test]
    fn test_custom_extensions() {
        let config = ConversionConfig {
            source_extension: ".svg".to_string(),
            target_extension: "vd.xml".to_string(),
            ..ConversionConfig::default()
        };
        let filter = FileFilter::new(&config).unwrap();

        assert_eq!(filter.source_suffix(), ".svg");
        assert_eq!(
            filter.output_file_name(Path::new("icon.svg")).unwrap(),
            "icon.vd.xml"
        );
    }

    #[test]
    fn test_display_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let filter = FileFilter::default();

        let good = temp_dir.path().join("good.xml");
        fs::write(&good, "<vector/>").unwrap();
        let empty = temp_dir.path().join("empty.xml");
        fs::write(&empty, "").unwrap();
        let other = temp_dir.path().join("other.svg");
        fs::write(&other, "<svg/>").unwrap();

        assert!(filter.is_display_candidate(&good));
        assert!(!filter.is_display_candidate(&empty));
        assert!(!filter.is_display_candidate(&other));
        assert!(!filter.is_display_candidate(&temp_dir.path().join("missing.xml")));
    }
}
