//! Normalized input handling for the polar canvas.
//!
//! The event producer (window system, browser shim, test harness) is
//! outside this crate; it delivers [`InputEvent`]s and the controller
//! runs exactly one viewport-state update followed by one redraw per
//! event. Everything here is single-threaded and synchronous.

use tracing::trace;

use rotorkit_core::{IntersectionSolution, PolarVector, TestRun, VectorSumResult};

use crate::scene::{RenderTarget, SceneRenderer};
use crate::viewport::Viewport;

/// A normalized canvas input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Wheel notch; negative means zoom in (wheel up).
    Wheel { delta_sign: i8 },
    Resize { width: f64, height: f64 },
}

/// Owns the viewport and scene renderer and feeds them input events.
///
/// Drag state is transient: pointer-up clears it unconditionally,
/// whether or not a drag was in progress.
#[derive(Debug)]
pub struct CanvasController {
    viewport: Viewport,
    renderer: SceneRenderer,
    is_dragging: bool,
    last_pointer: (f64, f64),
}

impl CanvasController {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            viewport: Viewport::new(canvas_width, canvas_height),
            renderer: SceneRenderer::new(),
            is_dragging: false,
            last_pointer: (0.0, 0.0),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Whether a drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Current pointer position in polar plane coordinates, for the
    /// coordinate readout.
    pub fn pointer_polar(&self, x: f64, y: f64) -> PolarVector {
        self.viewport.screen_to_polar(x, y)
    }

    /// Applies one input event and redraws when the viewport changed.
    pub fn handle_event(&mut self, event: InputEvent, target: &mut dyn RenderTarget) {
        trace!(?event, "Canvas input event");
        match event {
            InputEvent::PointerDown { x, y } => {
                self.is_dragging = true;
                self.last_pointer = (x, y);
            }
            InputEvent::PointerMove { x, y } => {
                if self.is_dragging {
                    let (lx, ly) = self.last_pointer;
                    self.viewport.pan(x - lx, y - ly);
                    self.last_pointer = (x, y);
                    self.renderer.redraw(&self.viewport, target);
                }
            }
            InputEvent::PointerUp => {
                self.is_dragging = false;
            }
            InputEvent::Wheel { delta_sign } => {
                if delta_sign < 0 {
                    self.viewport.zoom_in();
                } else {
                    self.viewport.zoom_out();
                }
                self.renderer.redraw(&self.viewport, target);
            }
            InputEvent::Resize { width, height } => {
                self.viewport.on_resize(width, height);
                self.renderer.redraw(&self.viewport, target);
            }
        }
    }

    /// Solves-and-draws entry point for the trilateration view.
    pub fn show_trilateration(
        &mut self,
        target: &mut dyn RenderTarget,
        v0: f64,
        runs: [TestRun; 3],
        solution: IntersectionSolution,
    ) {
        self.renderer
            .draw_trilateration(&mut self.viewport, target, v0, runs, solution, true);
    }

    /// Solves-and-draws entry point for the vector view.
    pub fn show_vectors(
        &mut self,
        target: &mut dyn RenderTarget,
        runs: [TestRun; 3],
        sums: VectorSumResult,
    ) {
        self.renderer
            .draw_vectors(&mut self.viewport, target, runs, sums, true);
    }

    /// Refits the view around the last drawn dataset and redraws.
    pub fn fit_content(&mut self, target: &mut dyn RenderTarget) {
        if self.renderer.fit_content(&mut self.viewport) {
            self.renderer.redraw(&self.viewport, target);
        }
    }
}
