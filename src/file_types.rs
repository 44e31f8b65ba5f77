use serde::{Deserialize, Serialize};

/// Extensions whose content is shown as a text preview on a card
const TEXT_EXTENSIONS: &[&str] = &[
    "md", "markdown", "txt", "csv", "json", "yaml", "yml", "toml", "xml", "html", "css", "js",
    "ts", "rs", "py", "sh", "canvas",
];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "avif"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "flac", "webm"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "ogv"];

/// Which files appear in the tree
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileFilter {
    /// Only `.md` notes
    #[default]
    MarkdownOnly,
    /// Every file, with icons and type labels for non-text files
    AllFiles,
}

impl FileFilter {
    pub fn accepts(&self, file_name: &str) -> bool {
        match self {
            FileFilter::MarkdownOnly => extension_of(file_name).as_deref() == Some("md"),
            FileFilter::AllFiles => true,
        }
    }
}

/// Broad category of a file, derived from its extension
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Markdown,
    Text,
    Image,
    Audio,
    Video,
    Pdf,
    Other,
}

impl FileType {
    pub fn from_name(file_name: &str) -> Self {
        let Some(ext) = extension_of(file_name) else {
            return FileType::Other;
        };
        match ext.as_str() {
            "md" | "markdown" => FileType::Markdown,
            "pdf" => FileType::Pdf,
            e if TEXT_EXTENSIONS.contains(&e) => FileType::Text,
            e if IMAGE_EXTENSIONS.contains(&e) => FileType::Image,
            e if AUDIO_EXTENSIONS.contains(&e) => FileType::Audio,
            e if VIDEO_EXTENSIONS.contains(&e) => FileType::Video,
            _ => FileType::Other,
        }
    }

    /// Whether a card may read the file to build a preview
    pub fn is_text(&self) -> bool {
        matches!(self, FileType::Markdown | FileType::Text)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FileType::Markdown => "📝",
            FileType::Text => "📃",
            FileType::Image => "🖼️",
            FileType::Audio => "🎵",
            FileType::Video => "🎬",
            FileType::Pdf => "📕",
            FileType::Other => "📎",
        }
    }
}

/// Short label shown on cards for files that are not previewed, e.g. "PDF file".
pub fn type_label(file_name: &str) -> String {
    match extension_of(file_name) {
        Some(ext) => format!("{} file", ext.to_uppercase()),
        None => "File".to_string(),
    }
}

/// Lowercased extension of a file name, without the dot.
///
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// File name without its extension
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => file_name,
    }
}
