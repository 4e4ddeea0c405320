//! # RotorKit Visualizer
//!
//! Interactive polar-canvas rendering for RotorKit.
//! Owns the viewport scale/pan state, the nice-number grid generator,
//! and the scene renderer that turns solver output into abstract draw
//! primitives. The concrete rendering backend and the event producer
//! live outside this crate, behind [`RenderTarget`] and [`InputEvent`].

pub mod controls;
pub mod grid;
pub mod scene;
pub mod viewport;

pub use controls::{CanvasController, InputEvent};
pub use grid::GridSpec;
pub use scene::{LegendEntry, RenderTarget, Scene, SceneRenderer, ScreenPoint, Style};
pub use viewport::Viewport;
