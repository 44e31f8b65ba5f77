use serde::{Deserialize, Serialize};

use crate::models::{NodeKind, Point, Size};

/// Actions offered on a folder header
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FolderAction {
    Rename,
    CreateSubfolder,
    CreateFile,
    Delete,
}

/// Actions offered on a file card
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FileAction {
    Open,
    Rename,
    Duplicate,
    Move,
    Delete,
}

impl FolderAction {
    pub const ALL: [FolderAction; 4] = [
        FolderAction::Rename,
        FolderAction::CreateSubfolder,
        FolderAction::CreateFile,
        FolderAction::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FolderAction::Rename => "Rename",
            FolderAction::CreateSubfolder => "Create subfolder",
            FolderAction::CreateFile => "Create file",
            FolderAction::Delete => "Delete",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, FolderAction::Delete)
    }
}

impl FileAction {
    pub const ALL: [FileAction; 5] = [
        FileAction::Open,
        FileAction::Rename,
        FileAction::Duplicate,
        FileAction::Move,
        FileAction::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FileAction::Open => "Open",
            FileAction::Rename => "Rename",
            FileAction::Duplicate => "Duplicate",
            FileAction::Move => "Move",
            FileAction::Delete => "Delete",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, FileAction::Delete)
    }
}

/// One entry of a shown menu
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,
    pub destructive: bool,
}

/// A context menu, resolved once from the kind of node that was right-clicked
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum ContextMenu {
    Folder { path: String },
    File { path: String },
}

/// A choice made from a context menu
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "target", content = "action", rename_all = "camelCase")]
pub enum MenuAction {
    Folder(FolderAction),
    File(FileAction),
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Folder(action) => action.label(),
            MenuAction::File(action) => action.label(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        match self {
            MenuAction::Folder(action) => action.is_destructive(),
            MenuAction::File(action) => action.is_destructive(),
        }
    }
}

impl ContextMenu {
    pub fn for_node(kind: NodeKind, path: &str) -> Self {
        let path = path.to_string();
        match kind {
            NodeKind::Folder => ContextMenu::Folder { path },
            NodeKind::File => ContextMenu::File { path },
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ContextMenu::Folder { path } | ContextMenu::File { path } => path,
        }
    }

    /// Actions in display order
    pub fn actions(&self) -> Vec<MenuAction> {
        match self {
            ContextMenu::Folder { .. } => FolderAction::ALL.iter().copied().map(MenuAction::Folder).collect(),
            ContextMenu::File { .. } => FileAction::ALL.iter().copied().map(MenuAction::File).collect(),
        }
    }

    pub fn items(&self) -> Vec<MenuItem> {
        self.actions()
            .into_iter()
            .map(|action| MenuItem {
                label: action.label().to_string(),
                destructive: action.is_destructive(),
            })
            .collect()
    }

    /// Whether this menu offers `action`
    pub fn offers(&self, action: MenuAction) -> bool {
        self.actions().contains(&action)
    }
}

/// Places a menu of `menu` size at the cursor without leaving the viewport.
///
/// When the menu would overflow the right or bottom edge it opens on the
/// other side of the cursor instead. The result is never negative.
pub fn position_menu(cursor: Point, menu: Size, viewport: Size) -> Point {
    let x = if cursor.x + menu.width > viewport.width {
        cursor.x - menu.width
    } else {
        cursor.x
    };
    let y = if cursor.y + menu.height > viewport.height {
        cursor.y - menu.height
    } else {
        cursor.y
    };
    Point::new(x.max(0.0), y.max(0.0))
}
