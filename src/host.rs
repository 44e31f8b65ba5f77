use serde::{Deserialize, Serialize};

use crate::menu::ContextMenu;
use crate::models::{Point, Size};
use crate::render::Panel;

/// A two-field modal: a label above a text input, with confirm and cancel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub title: String,
    pub label: String,
    pub initial_value: String,
    pub confirm_label: String,
}

impl PromptRequest {
    pub fn new(title: impl Into<String>, label: impl Into<String>, initial_value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            initial_value: initial_value.into(),
            confirm_label: "Save".to_string(),
        }
    }

    pub fn confirm_with(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }
}

/// The host application's widget toolkit and workspace.
///
/// The explorer draws nothing itself: it hands rendered panels, menus and
/// dialogs to the host and receives the user's answers back.
pub trait Host {
    /// Replaces the view's content with `panel`.
    fn mount(&mut self, panel: &Panel);

    /// Removes all content from the view.
    fn clear(&mut self);

    /// Visible area of the host window
    fn viewport(&self) -> Size;

    /// Size `menu` will take once shown
    fn menu_size(&self, menu: &ContextMenu) -> Size;

    fn show_context_menu(&mut self, menu: &ContextMenu, position: Point);

    /// Shows a text prompt. Returns `None` when the user cancels.
    fn prompt(&mut self, request: &PromptRequest) -> Option<String>;

    /// Asks for confirmation of a destructive action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Shows a transient notice.
    fn notice(&mut self, message: &str);

    /// Displays a vault file, in a new tab when `new_tab` is set.
    fn open_in_viewer(&mut self, path: &str, new_tab: bool);
}

/// Registration surface offered to the plugin when it loads
pub trait PluginHost {
    fn register_view(&mut self, view_type: &str, display_text: &str, icon: &str);

    fn add_ribbon_icon(&mut self, icon: &str, title: &str, view_type: &str);

    /// Opens the view of `view_type` in the side panel and focuses it.
    fn reveal_view(&mut self, view_type: &str);
}
