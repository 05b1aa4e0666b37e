//! UI Widgets

pub mod info_panel;
pub mod progress;
pub mod title_bar;
pub mod usage_panel;

pub use info_panel::InfoPanel;
pub use title_bar::TitleBar;
pub use usage_panel::UsagePanel;
