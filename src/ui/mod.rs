//! TUI 层：Ratatui + crossterm，主循环（app）、事件（event）、渲染（render）、视图状态（state）

pub mod app;
pub mod event;
pub mod render;
pub mod state;

pub use app::run_app;
pub use event::{AppEvent, EventHandler};
pub use render::draw;
pub use state::{ContentState, Loadable, PortfolioView};
