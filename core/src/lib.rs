pub mod widget;
pub mod reactive;
mod ui;
mod dispatch;
mod event;
mod geometry;
mod theme;
mod renderer;
mod task;
mod color;
mod draw;
mod error;

pub use ui::*;
pub use dispatch::FocusDispatcher;
pub use event::*;
pub use geometry::*;
pub use theme::*;
pub use renderer::{Renderer, TextEngine};
pub use task::*;
pub use color::*;
pub use draw::*;
pub use error::*;
pub use tokio;
pub use cosmic_text::{Family, Stretch, Style, Weight};
