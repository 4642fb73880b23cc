use std::path::Path;

/// Stable identity of a media item within one gallery.
pub type MediaId = u64;

/// A single picture shown by the gallery.
///
/// Items are owned by the host. The gallery clones them into its own views
/// (columns, dock) but never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: MediaId,
    pub title: String,
    pub desc: String,
    pub url: String,
    pub tag: Option<String>,
}

impl MediaItem {
    /// Create a new MediaItem with an empty description and no tag
    pub fn new(id: MediaId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            desc: String::new(),
            url: url.into(),
            tag: None,
        }
    }

    /// Build an item for a local image file.
    ///
    /// The title is the file stem and the tag is the upper-cased extension.
    pub fn from_path(id: MediaId, path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let tag = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_uppercase());
        Self {
            id,
            title,
            desc: path.display().to_string(),
            url: path.to_string_lossy().into_owned(),
            tag,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Position of `id` in `items`, looked up by identity rather than by reference.
pub fn index_of(items: &[MediaItem], id: MediaId) -> Option<usize> {
    items.iter().position(|item| item.id == id)
}
