use serde::{Deserialize, Serialize};

use crate::file_types::{file_stem, type_label, FileType};
use crate::filesystem::Storage;
use crate::models::{ExplorerConfig, NodeKind, TreeNode};

/// Icon shown on an expanded folder header
pub const ICON_EXPANDED: &str = "chevron-down";
/// Icon shown on a collapsed folder header
pub const ICON_COLLAPSED: &str = "chevron-right";
/// Appended to a preview cut at the character budget
pub const ELLIPSIS: &str = "…";

/// How card previews are produced
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewSettings {
    pub lines: usize,
    pub char_budget: Option<usize>,
    pub show_type_icons: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self::from(&ExplorerConfig::default())
    }
}

impl From<&ExplorerConfig> for PreviewSettings {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            lines: config.preview_lines,
            char_budget: config.preview_char_budget,
            show_type_icons: config.show_type_icons,
        }
    }
}

/// The rendered content of one folder level: sub-folders, then a grid of cards
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub folders: Vec<FolderView>,
    pub cards: Vec<Card>,
}

/// A folder header, plus its content when expanded
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub expanded: bool,
    pub icon: String,
    pub badge_color: String,
    /// Present only for expanded folders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Panel>,
}

/// A file card
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub body: CardBody,
}

impl Card {
    /// Title with the type icon in front, when there is one
    pub fn display_title(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{} {}", icon, self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum CardBody {
    /// First lines of a text file
    Preview(String),
    /// Short type description for files that are not read, e.g. "PDF file"
    TypeLabel(String),
    /// The file could not be read
    Unavailable,
}

impl Panel {
    /// Paths of every card reachable through expanded folders, top-down.
    pub fn card_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for folder in &self.folders {
            if let Some(content) = &folder.content {
                paths.extend(content.card_paths());
            }
        }
        paths.extend(self.cards.iter().map(|c| c.path.clone()));
        paths
    }

    /// Finds a rendered folder header by path.
    pub fn folder(&self, path: &str) -> Option<&FolderView> {
        self.folders.iter().find_map(|folder| {
            if folder.path == path {
                Some(folder)
            } else {
                folder.content.as_ref().and_then(|c| c.folder(path))
            }
        })
    }

    pub fn card(&self, path: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.path == path).or_else(|| {
            self.folders
                .iter()
                .filter_map(|f| f.content.as_ref())
                .find_map(|c| c.card(path))
        })
    }
}

/// Renders a forest of nodes into a panel.
///
/// Folder content is only produced for expanded folders, so collapsed
/// folders never read their files.
pub fn render_forest<S: Storage>(
    nodes: &[TreeNode<S::Handle>],
    depth: usize,
    storage: &S,
    settings: &PreviewSettings,
) -> Panel {
    let mut panel = Panel::default();
    for node in nodes {
        match node.kind {
            NodeKind::Folder => panel.folders.push(render_folder(node, depth, storage, settings)),
            NodeKind::File => panel.cards.push(render_card(node, storage, settings)),
        }
    }
    panel
}

fn render_folder<S: Storage>(
    node: &TreeNode<S::Handle>,
    depth: usize,
    storage: &S,
    settings: &PreviewSettings,
) -> FolderView {
    let content = node
        .expanded
        .then(|| render_forest(&node.children, depth + 1, storage, settings));
    FolderView {
        path: node.path.clone(),
        name: node.name.clone(),
        depth,
        expanded: node.expanded,
        icon: if node.expanded { ICON_EXPANDED } else { ICON_COLLAPSED }.to_string(),
        badge_color: badge_color(&node.name),
        content,
    }
}

fn render_card<S: Storage>(node: &TreeNode<S::Handle>, storage: &S, settings: &PreviewSettings) -> Card {
    let file_type = FileType::from_name(&node.name);
    let body = if file_type.is_text() {
        match storage.read_text(&node.handle) {
            Ok(content) => CardBody::Preview(snippet(&content, settings.lines, settings.char_budget)),
            Err(e) => {
                log::warn!("No preview for '{}': {}", node.path, e);
                CardBody::Unavailable
            }
        }
    } else {
        CardBody::TypeLabel(type_label(&node.name))
    };

    Card {
        path: node.path.clone(),
        title: file_stem(&node.name).to_string(),
        icon: settings.show_type_icons.then(|| file_type.icon().to_string()),
        body,
    }
}

/// Joins the first `lines` lines of `content` with spaces, cutting the result
/// to `char_budget` characters with an ellipsis when it is longer.
pub fn snippet(content: &str, lines: usize, char_budget: Option<usize>) -> String {
    let joined = content.lines().take(lines).collect::<Vec<_>>().join(" ");
    match char_budget {
        Some(budget) if joined.chars().count() > budget => {
            let cut: String = joined.chars().take(budget).collect();
            format!("{}{}", cut.trim_end(), ELLIPSIS)
        }
        _ => joined,
    }
}

/// Stable badge colour for a folder, hashed from its name.
pub fn badge_color(name: &str) -> String {
    let hash = name
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32));
    format!("hsl({}, 45%, 55%)", hash % 360)
}
