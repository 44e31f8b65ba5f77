use serde::{Deserialize, Serialize};

use crate::actions::{self, ActionOutcome};
use crate::config::ConfigManager;
use crate::error::Result;
use crate::filesystem::{is_within, parent_path, Storage};
use crate::host::{Host, PromptRequest};
use crate::menu::{position_menu, ContextMenu, FileAction, FolderAction, MenuAction};
use crate::models::{find_node, ExpandedSet, Modifiers, NodeKind, Point, TreeNode};
use crate::render::{render_forest, Panel, PreviewSettings};
use crate::tree::build_tree;

/// A user gesture forwarded by the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Gesture {
    /// Left-click on a folder header
    FolderClick { path: String },
    /// Left-click on a file card
    CardClick {
        path: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Right-click on a folder header or a card
    ContextMenu { path: String, cursor: Point },
    /// An entry picked from the open context menu
    MenuChoice { action: MenuAction },
}

/// The card explorer session.
///
/// Owns the expand-state set and the current snapshot. Every structural
/// change goes through storage and is followed by a full rebuild; nothing
/// else outlives a rebuild.
pub struct CardExplorerView<S: Storage, H: Host> {
    storage: S,
    host: H,
    config: ConfigManager,
    expanded: ExpandedSet,
    snapshot: Vec<TreeNode<S::Handle>>,
    panel: Option<Panel>,
    open_menu: Option<ContextMenu>,
    is_open: bool,
}

impl<S: Storage, H: Host> CardExplorerView<S, H> {
    pub fn new(storage: S, host: H, config: ConfigManager) -> Self {
        let expanded = config.expanded_folders();
        Self {
            storage,
            host,
            config,
            expanded,
            snapshot: Vec::new(),
            panel: None,
            open_menu: None,
            is_open: false,
        }
    }

    /// Builds and mounts the tree.
    pub fn on_open(&mut self) {
        log::info!("Opening card explorer");
        self.is_open = true;
        self.refresh();
    }

    /// Tears the tree down. Gestures arriving after this are ignored.
    pub fn on_close(&mut self) {
        log::info!("Closing card explorer");
        self.is_open = false;
        self.snapshot.clear();
        self.panel = None;
        self.open_menu = None;
        self.host.clear();
    }

    /// Rebuilds the snapshot from storage and remounts the panel.
    pub fn refresh(&mut self) {
        if !self.is_open {
            return;
        }
        let config = self.config.get();
        self.snapshot = build_tree(&self.storage, &self.expanded, config.file_filter);
        let panel = render_forest(&self.snapshot, 0, &self.storage, &PreviewSettings::from(&config));
        self.host.mount(&panel);
        self.panel = Some(panel);
    }

    pub fn handle(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::FolderClick { path } => self.toggle_folder(&path),
            Gesture::CardClick { path, modifiers } => self.open_file(&path, modifiers),
            Gesture::ContextMenu { path, cursor } => self.show_menu(&path, cursor),
            Gesture::MenuChoice { action } => self.choose(action),
        }
    }

    /// Flips a folder between collapsed and expanded.
    pub fn toggle_folder(&mut self, path: &str) {
        if !self.is_open {
            return;
        }
        if !self.panel.as_ref().is_some_and(|p| p.folder(path).is_some()) {
            log::debug!("Ignoring click on unknown folder '{}'", path);
            return;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        self.persist_expanded();
        self.refresh();
    }

    /// Asks the host to display a file.
    pub fn open_file(&mut self, path: &str, modifiers: Modifiers) {
        if !self.is_open {
            return;
        }
        if self.panel.as_ref().is_some_and(|p| p.card(path).is_some()) {
            self.host.open_in_viewer(path, modifiers.secondary);
        }
    }

    /// Shows the context menu for the node at `path` next to the cursor.
    pub fn show_menu(&mut self, path: &str, cursor: Point) {
        self.open_menu = None;
        if !self.is_open || !self.is_rendered(path) {
            return;
        }
        let Some(node) = find_node(&self.snapshot, path) else {
            return;
        };
        let menu = ContextMenu::for_node(node.kind, &node.path);
        let position = position_menu(cursor, self.host.menu_size(&menu), self.host.viewport());
        self.host.show_context_menu(&menu, position);
        self.open_menu = Some(menu);
    }

    /// Runs an action picked from the open menu.
    ///
    /// On success the tree is rebuilt; on failure the user gets a notice and
    /// nothing else changes. Cancelled dialogs and empty input do nothing.
    pub fn choose(&mut self, action: MenuAction) {
        if !self.is_open {
            return;
        }
        let Some(menu) = self.open_menu.take() else {
            return;
        };
        if !menu.offers(action) {
            log::debug!("'{}' is not offered for '{}'", action.label(), menu.path());
            return;
        }
        let Some(node) = find_node(&self.snapshot, menu.path()).cloned() else {
            return;
        };

        match self.run_action(&node, action) {
            Ok(Some(outcome)) => {
                log::info!("{} succeeded: {:?}", action.label(), outcome);
                self.apply_outcome(&outcome);
                self.refresh();
            }
            Ok(None) => {}
            Err(e) if !e.is_user_visible() => log::debug!("{} skipped: {}", action.label(), e),
            Err(e) => {
                log::warn!("{} failed: {}", action.label(), e);
                self.host.notice(&e.to_string());
            }
        }
    }

    fn run_action(&mut self, node: &TreeNode<S::Handle>, action: MenuAction) -> Result<Option<ActionOutcome>> {
        let outcome = match action {
            MenuAction::File(FileAction::Open) => {
                self.host.open_in_viewer(&node.path, false);
                return Ok(None);
            }
            MenuAction::File(FileAction::Rename) | MenuAction::Folder(FolderAction::Rename) => {
                let request = PromptRequest::new("Rename", "New name", node.name.clone());
                let Some(input) = self.host.prompt(&request) else {
                    return Ok(None);
                };
                actions::rename_entry(&self.storage, node, &input)?
            }
            MenuAction::Folder(FolderAction::CreateSubfolder) => {
                let request = PromptRequest::new("Create subfolder", "Folder name", "").confirm_with("Create");
                let Some(input) = self.host.prompt(&request) else {
                    return Ok(None);
                };
                actions::create_subfolder(&self.storage, node, &input)?
            }
            MenuAction::Folder(FolderAction::CreateFile) => {
                let request = PromptRequest::new("Create file", "File name", "Untitled").confirm_with("Create");
                let Some(input) = self.host.prompt(&request) else {
                    return Ok(None);
                };
                let extension = self.config.get().default_extension;
                actions::create_file(&self.storage, node, &input, &extension)?
            }
            MenuAction::File(FileAction::Duplicate) => actions::duplicate_file(&self.storage, node)?,
            MenuAction::File(FileAction::Move) => {
                let request = PromptRequest::new("Move", "Destination folder", parent_path(&node.path))
                    .confirm_with("Move");
                let Some(input) = self.host.prompt(&request) else {
                    return Ok(None);
                };
                actions::move_file(&self.storage, node, &input)?
            }
            MenuAction::File(FileAction::Delete) | MenuAction::Folder(FolderAction::Delete) => {
                let message = match node.kind {
                    NodeKind::Folder => format!("Move folder '{}' and everything in it to the trash?", node.name),
                    NodeKind::File => format!("Move '{}' to the trash?", node.name),
                };
                if self.config.get().confirm_delete && !self.host.confirm(&message) {
                    return Ok(None);
                }
                actions::delete_entry(&self.storage, node)?
            }
        };
        Ok(Some(outcome))
    }

    /// Keeps the expand-state set in step with renamed and deleted folders.
    fn apply_outcome(&mut self, outcome: &ActionOutcome) {
        let changed = match outcome {
            ActionOutcome::Renamed { from, to } => {
                let moved: Vec<String> = self
                    .expanded
                    .iter()
                    .filter(|p| is_within(p, from))
                    .cloned()
                    .collect();
                for path in &moved {
                    self.expanded.remove(path);
                    self.expanded.insert(format!("{}{}", to, &path[from.len()..]));
                }
                !moved.is_empty()
            }
            ActionOutcome::Deleted { path } => {
                let before = self.expanded.len();
                self.expanded.retain(|p| !is_within(p, path));
                before != self.expanded.len()
            }
            ActionOutcome::Created { .. } => false,
        };
        if changed {
            self.persist_expanded();
        }
    }

    /// Whether `path` has a header or card in the mounted panel
    fn is_rendered(&self, path: &str) -> bool {
        self.panel
            .as_ref()
            .is_some_and(|p| p.folder(path).is_some() || p.card(path).is_some())
    }

    fn persist_expanded(&self) {
        if let Err(e) = self.config.save_expanded_folders(&self.expanded) {
            log::warn!("Could not save expanded folders: {}", e);
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn snapshot(&self) -> &[TreeNode<S::Handle>] {
        &self.snapshot
    }

    /// The panel currently mounted, if the view is open
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    pub fn open_menu(&self) -> Option<&ContextMenu> {
        self.open_menu.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }
}
