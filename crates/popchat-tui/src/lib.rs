//! Terminal front end for popchat.
//!
//! The chat lives in a bordered popup drawn over an otherwise empty screen.
//! It starts closed as a small launcher in the bottom-right corner and opens
//! with `Ctrl+O` or a click on the launcher.  With mouse capture enabled the
//! popup can be dragged by its header row and resized from its border.
//!
//! Network calls run on spawned tokio tasks and report back to the UI loop
//! over an mpsc channel, so the terminal stays responsive while requests
//! are in flight.

pub mod app;
pub mod error;
pub mod plain;
mod run;
pub mod ui;

use popchat_client::Size;
use serde::{Deserialize, Serialize};

pub use app::{AppAction, AppEvent, TuiApp};
pub use error::{Result, TuiError};
pub use plain::message_text;
pub use run::run_tui;

/// Terminal UI configuration, read from the `[tui]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Whether to enable mouse support (drag and resize).
    pub mouse: bool,
    /// Whether to use alternate screen mode.
    pub alternate_screen: bool,
    /// Initial popup width in cells.
    pub popup_width: u16,
    /// Initial popup height in cells.
    pub popup_height: u16,
    /// Resizing never goes to or below this width.
    pub min_width: u16,
    /// Resizing never goes to or below this height.
    pub min_height: u16,
    /// Gap between the anchored popup and the screen edges.
    pub margin: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            alternate_screen: true,
            popup_width: 60,
            popup_height: 24,
            min_width: 30,
            min_height: 12,
            margin: 1,
        }
    }
}

impl TuiConfig {
    pub fn popup_size(&self) -> Size {
        Size::new(i32::from(self.popup_width), i32::from(self.popup_height))
    }

    pub fn min_size(&self) -> Size {
        Size::new(i32::from(self.min_width), i32::from(self.min_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_config_defaults() {
        let config = TuiConfig::default();
        assert!(config.mouse);
        assert!(config.alternate_screen);
        assert_eq!(config.popup_size(), Size::new(60, 24));
        assert_eq!(config.min_size(), Size::new(30, 12));
    }

    #[test]
    fn tui_config_partial_toml() {
        let config: TuiConfig = toml::from_str("mouse = false\npopup_width = 80").unwrap();
        assert!(!config.mouse);
        assert_eq!(config.popup_width, 80);
        assert_eq!(config.popup_height, 24);
    }
}
