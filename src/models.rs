use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::file_types::FileFilter;

/// Folder paths currently shown expanded. Keyed by vault path so the state
/// survives full tree rebuilds.
pub type ExpandedSet = BTreeSet<String>;

/// Whether an entry is a folder or a file
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// One entry returned by a storage listing
#[derive(Clone, Debug, PartialEq)]
pub struct StorageEntry<H> {
    pub name: String,
    pub kind: NodeKind,
    pub handle: H,
}

/// A node of the in-memory snapshot produced by the tree builder.
///
/// `children` is always empty for files. `expanded` only means something
/// for folders.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode<H> {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode<H>>,
    pub expanded: bool,
    pub handle: H,
}

impl<H> TreeNode<H> {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Finds the node with the given path in this subtree.
    pub fn find(&self, path: &str) -> Option<&TreeNode<H>> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

/// Finds a node by path in a forest.
pub fn find_node<'a, H>(nodes: &'a [TreeNode<H>], path: &str) -> Option<&'a TreeNode<H>> {
    nodes.iter().find_map(|node| node.find(path))
}

/// A screen position in CSS pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A measured width and height in CSS pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Keyboard modifiers held during a click
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// The platform's "open in new tab" modifier (Ctrl, or Cmd on macOS)
    pub secondary: bool,
}

/// Explorer configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
    pub file_filter: FileFilter,
    pub preview_lines: usize,
    pub preview_char_budget: Option<usize>,
    pub show_type_icons: bool,
    pub default_extension: String,
    pub confirm_delete: bool,
    pub expanded_folders: Vec<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            file_filter: FileFilter::MarkdownOnly,
            preview_lines: 3,
            preview_char_budget: Some(100),
            show_type_icons: true,
            default_extension: "md".to_string(),
            confirm_delete: true,
            expanded_folders: vec![],
        }
    }
}

impl ExplorerConfig {
    pub fn expanded_set(&self) -> ExpandedSet {
        self.expanded_folders.iter().cloned().collect()
    }
}
