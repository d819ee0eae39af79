use roxmltree::{Document, Node};

pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Parses VectorDrawable text; `None` when the text is not well-formed XML.
pub fn parse_vector_document(text: &str) -> Option<Document<'_>> {
    match Document::parse(text) {
        Ok(doc) => Some(doc),
        Err(err) => {
            log::debug!("vector document did not parse: {}", err);
            None
        }
    }
}

/// Looks up an `android:` attribute on a node.
pub fn android_attribute<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((ANDROID_NS, name))
}

/// Declared size of a VectorDrawable, as written in its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSize {
    pub width: String,
    pub height: String,
}

impl VectorSize {
    pub fn read(doc: &Document<'_>) -> Option<Self> {
        let root = doc.root_element();
        if root.tag_name().name() != "vector" {
            return None;
        }

        Some(Self {
            width: android_attribute(&root, "width")?.to_string(),
            height: android_attribute(&root, "height")?.to_string(),
        })
    }
}
