pub mod actions;
pub mod config;
pub mod error;
pub mod file_types;
pub mod filesystem;
pub mod host;
pub mod menu;
pub mod models;
pub mod render;
pub mod tree;
pub mod view;

pub use error::{ExplorerError, Result};
pub use filesystem::{LocalVault, Storage};
pub use host::{Host, PluginHost, PromptRequest};
pub use view::{CardExplorerView, Gesture};

/// View type the explorer registers under
pub const VIEW_TYPE_CARDS: &str = "card-explorer";
/// Title shown on the view's tab
pub const VIEW_DISPLAY_TEXT: &str = "Card Explorer";
/// Icon used for the view and its ribbon button
pub const VIEW_ICON: &str = "layout-grid";

/// Installs the `env_logger` backend for the `log` facade.
///
/// Defaults to `info`; `RUST_LOG` overrides it. Calling this more than once
/// is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Entry point the host loads.
///
/// Registers the card view and a ribbon button that opens it.
#[derive(Debug, Default)]
pub struct CardExplorerPlugin;

impl CardExplorerPlugin {
    pub fn on_load<P: PluginHost>(&self, host: &mut P) {
        init_logging();
        host.register_view(VIEW_TYPE_CARDS, VIEW_DISPLAY_TEXT, VIEW_ICON);
        host.add_ribbon_icon(VIEW_ICON, "Open Card Explorer", VIEW_TYPE_CARDS);
        log::info!("Card explorer loaded");
    }

    /// Opens the explorer in the side panel and focuses it.
    pub fn activate_view<P: PluginHost>(&self, host: &mut P) {
        host.reveal_view(VIEW_TYPE_CARDS);
    }
}
