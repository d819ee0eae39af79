use crate::vector::document::{parse_vector_document, ANDROID_NS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A forced output dimension in dp. Only positive values exist; a raw
/// value of zero or below means "leave the dimension alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedSize(u32);

impl ForcedSize {
    pub fn from_raw(value: i64) -> Option<Self> {
        if value > 0 {
            u32::try_from(value).ok().map(ForcedSize)
        } else {
            None
        }
    }

    pub fn dp(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ForcedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}dp", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideInfo {
    pub width: Option<ForcedSize>,
    pub height: Option<ForcedSize>,
    pub alpha: f64,
    pub auto_mirrored: bool,
}

impl OverrideInfo {
    pub fn new(width: Option<ForcedSize>, height: Option<ForcedSize>) -> Self {
        Self {
            width,
            height,
            alpha: 1.0,
            auto_mirrored: false,
        }
    }

    pub fn is_requested(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Rewrites the root attributes of a VectorDrawable according to `info`.
///
/// Returns `None` when `text` does not parse. Only the touched attribute
/// values change; every other byte of the document is kept as is.
pub fn override_xml_content(text: &str, info: &OverrideInfo) -> Option<String> {
    let doc = parse_vector_document(text)?;
    let root = doc.root_element();
    let prefix = root.lookup_prefix(ANDROID_NS);

    let mut updates: Vec<(&str, String)> = Vec::new();
    if let Some(width) = info.width {
        updates.push(("width", width.to_string()));
    }
    if let Some(height) = info.height {
        updates.push(("height", height.to_string()));
    }
    if (info.alpha - 1.0).abs() > f64::EPSILON {
        updates.push(("alpha", format_float(info.alpha)));
    }
    if info.auto_mirrored {
        updates.push(("autoMirrored", "true".to_string()));
    }

    let start_tag_end = start_tag_insert_point(text, &root)?;
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    for (name, value) in updates {
        let existing = root
            .attributes()
            .find(|a| a.namespace() == Some(ANDROID_NS) && a.name() == name);

        match (existing, prefix) {
            (Some(attr), _) => edits.push((attr.range_value(), value)),
            (None, Some(prefix)) => edits.push((
                start_tag_end..start_tag_end,
                format!(" {}:{}=\"{}\"", prefix, name, value),
            )),
            (None, None) => {
                log::debug!("no android namespace prefix; cannot add android:{}", name);
            }
        }
    }

    // Apply back to front so earlier ranges stay valid.
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut output = text.to_string();
    for (range, replacement) in edits {
        output.replace_range(range, &replacement);
    }

    Some(output)
}

/// Byte offset just before the `>` or `/>` closing the root start tag.
fn start_tag_insert_point(text: &str, root: &roxmltree::Node<'_, '_>) -> Option<usize> {
    let scan_from = root
        .attributes()
        .map(|a| a.range().end)
        .max()
        .unwrap_or(root.range().start + 1);

    let offset = text[scan_from..].find('>')? + scan_from;
    if offset > scan_from && text.as_bytes()[offset - 1] == b'/' {
        Some(offset - 1)
    } else {
        Some(offset)
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
