//! The terminal front end: scene drawing and keyboard input.

mod canvas;
mod scene;
mod terminal;

pub use canvas::{FilledPolygon, Viewport};
pub use scene::{draw_scene, SceneStyle};
pub use terminal::{response_key, TerminalSurface};
