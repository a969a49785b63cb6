//! Canvas 2D rendering
//!
//! Scenes draw through the [`Surface`] trait. The browser build paints a
//! `CanvasRenderingContext2d`; tests and the native demo record commands.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw::{Overlay, draw_result, draw_session, draw_start_menu, draw_toast};
pub use surface::{DrawCommand, RecordingSurface, Surface, TextAlign};
