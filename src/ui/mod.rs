pub mod panel;
mod renderer;
mod state;
pub mod theme;
mod widgets;

pub use panel::{AlertTablePanel, PanelAction};
pub use renderer::render;
pub use state::AppState;
pub use theme::Theme;
