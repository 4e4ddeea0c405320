//! Scene rendering over an abstract draw-primitive target.
//!
//! Turns solver output into circles, arrows, and labels. All positions
//! go through the viewport forward transform, keeping the drawn scene
//! consistent with the inverse transform used for pointer readout. The
//! renderer caches the last drawn dataset so pan/zoom/resize can redraw
//! without going back through the solver; the cache is a snapshot, not
//! a source of truth.

use serde::Serialize;
use tracing::debug;

use rotorkit_core::{IntersectionSolution, PolarVector, TestRun, VectorSumResult};

use crate::grid::{GridSpec, EXTENT_FACTOR, SPOKE_STEP_DEG};
use crate::viewport::Viewport;

// Palette (slate/tailwind hex values shared with the presentation layer)
const BASE_CIRCLE_COLOR: &str = "#3b82f6";
const SOLUTION_COLOR: &str = "#1e293b";
const RESULTANT_COLOR: &str = "#ef4444";
const OPPOSITE_STROKE: &str = "#475569";
const GRID_RING_COLOR: &str = "#e2e8f0";
const GRID_SPOKE_COLOR: &str = "#f1f5f9";
const GRID_LABEL_COLOR: &str = "#94a3b8";
const CENTER_LABEL_COLOR: &str = "#64748b";

const RUN_MARKER_RADIUS: f64 = 4.0;
const SOLUTION_MARKER_RADIUS: f64 = 5.0;
const LABEL_OFFSET_PX: f64 = 8.0;

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke styling for a draw primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke: String,
    pub width: f64,
    pub dash: Vec<f64>,
    pub opacity: f64,
}

impl Style {
    /// Solid stroke at full opacity.
    pub fn solid(stroke: &str, width: f64) -> Self {
        Self {
            stroke: stroke.to_string(),
            width,
            dash: Vec::new(),
            opacity: 1.0,
        }
    }

    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = dash.to_vec();
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Primitive draw-call sink implemented by the rendering backend
/// (retained-mode canvas, immediate-mode GPU, SVG, ...).
///
/// The scene renderer only ever talks to this trait, so the backend is
/// swappable without touching the solver, viewport, or grid logic.
pub trait RenderTarget {
    fn draw_circle(&mut self, center: ScreenPoint, radius: f64, style: &Style);
    fn draw_line(&mut self, points: &[ScreenPoint], style: &Style);
    fn draw_arrow(&mut self, from: ScreenPoint, to: ScreenPoint, style: &Style);
    fn draw_label(&mut self, position: ScreenPoint, text: &str, style: &Style);
    fn clear_layer(&mut self);
    fn present(&mut self);
}

/// One entry of the data-only legend model; the presentation layer
/// turns these into markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub emphasis: bool,
}

/// The last solved dataset, retained for redraw without recomputation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Trilateration {
        v0: f64,
        runs: [TestRun; 3],
        solution: IntersectionSolution,
    },
    Vectors {
        runs: [TestRun; 3],
        sums: VectorSumResult,
    },
}

/// Renders solver output and the polar grid through a [`RenderTarget`].
#[derive(Debug, Default)]
pub struct SceneRenderer {
    last_scene: Option<Scene>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self { last_scene: None }
    }

    /// The cached dataset, if any scene has been drawn.
    pub fn last_scene(&self) -> Option<&Scene> {
        self.last_scene.as_ref()
    }

    /// Draws the concentric polar grid for the current viewport.
    ///
    /// Rings start at one step and extend to 1.5x the viewport
    /// diagonal, independent of any solved data; spokes every 30
    /// degrees, each labeled.
    pub fn draw_grid(&self, viewport: &Viewport, target: &mut dyn RenderTarget) {
        let scale = viewport.scale();
        let spec = GridSpec::compute(scale);
        let extent_px =
            viewport.canvas_width().hypot(viewport.canvas_height()) * EXTENT_FACTOR;

        let origin = screen_point(viewport, 0.0, 0.0);
        let ring_style = Style::solid(GRID_RING_COLOR, 1.0);
        let label_style = Style::solid(GRID_LABEL_COLOR, 1.0);

        // Rings start at `step`, not zero, so a fine step never floods
        // the origin with tiny circles.
        let mut r = spec.step;
        while r * scale < extent_px {
            let radius_px = r * scale;
            target.draw_circle(origin, radius_px, &ring_style);
            target.draw_label(
                ScreenPoint::new(origin.x + radius_px + 2.0, origin.y + 2.0),
                &format_tick(r),
                &label_style,
            );
            r += spec.step;
        }

        let spoke_style = Style::solid(GRID_SPOKE_COLOR, 1.0);
        let extent_plane = extent_px / scale;
        let mut angle: f64 = 0.0;
        while angle < 360.0 {
            let rad = angle.to_radians();
            let end = screen_point(viewport, extent_plane * rad.cos(), extent_plane * rad.sin());
            target.draw_line(&[origin, end], &spoke_style);
            target.draw_label(
                ScreenPoint::new(
                    origin.x + (end.x - origin.x) * 0.9 + 5.0,
                    origin.y + (end.y - origin.y) * 0.9 - 5.0,
                ),
                &format!("{angle}\u{b0}"),
                &label_style,
            );
            angle += SPOKE_STEP_DEG;
        }
    }

    /// Draws the trilateration view: dashed base circle, one circle per
    /// run, and the solution marker with its reference line.
    ///
    /// With `autofit` the viewport is rescaled so every circle and the
    /// solution point are visible before drawing.
    pub fn draw_trilateration(
        &mut self,
        viewport: &mut Viewport,
        target: &mut dyn RenderTarget,
        v0: f64,
        runs: [TestRun; 3],
        solution: IntersectionSolution,
        autofit: bool,
    ) {
        // Cached without the autofit flag so a manual-zoom redraw never
        // resets the view.
        self.last_scene = Some(Scene::Trilateration { v0, runs, solution });

        if autofit {
            viewport.fit_to_radius(trilateration_extent(v0, &runs, &solution));
        }

        target.clear_layer();
        self.draw_grid(viewport, target);
        self.render_trilateration(viewport, target, v0, &runs, &solution);
        target.present();
    }

    /// Draws the vector view: one arrow per run, the resultant, and the
    /// dashed opposite (correction) arrow.
    pub fn draw_vectors(
        &mut self,
        viewport: &mut Viewport,
        target: &mut dyn RenderTarget,
        runs: [TestRun; 3],
        sums: VectorSumResult,
        autofit: bool,
    ) {
        self.last_scene = Some(Scene::Vectors { runs, sums });

        if autofit {
            viewport.fit_to_radius(vectors_extent(&runs, &sums));
        }

        target.clear_layer();
        self.draw_grid(viewport, target);
        self.render_vectors(viewport, target, &runs, &sums);
        target.present();
    }

    /// Redraws the cached dataset after a pan/zoom/resize, without
    /// recomputation and without refitting. Draws the bare grid when
    /// nothing has been solved yet.
    pub fn redraw(&self, viewport: &Viewport, target: &mut dyn RenderTarget) {
        target.clear_layer();
        self.draw_grid(viewport, target);
        match &self.last_scene {
            Some(Scene::Trilateration { v0, runs, solution }) => {
                self.render_trilateration(viewport, target, *v0, runs, solution);
            }
            Some(Scene::Vectors { runs, sums }) => {
                self.render_vectors(viewport, target, runs, sums);
            }
            None => {}
        }
        target.present();
    }

    /// Refits the viewport around the cached dataset. Returns false
    /// when there is nothing to fit.
    pub fn fit_content(&self, viewport: &mut Viewport) -> bool {
        match &self.last_scene {
            Some(Scene::Trilateration { v0, runs, solution }) => {
                viewport.fit_to_radius(trilateration_extent(*v0, runs, solution));
                true
            }
            Some(Scene::Vectors { runs, sums }) => {
                viewport.fit_to_radius(vectors_extent(runs, sums));
                true
            }
            None => false,
        }
    }

    /// Data-only legend for the cached scene.
    pub fn legend(&self) -> Vec<LegendEntry> {
        match &self.last_scene {
            Some(Scene::Trilateration { v0, runs, solution }) => {
                let mut entries = vec![LegendEntry {
                    label: format!("Base: {v0:.2}"),
                    color: BASE_CIRCLE_COLOR.to_string(),
                    emphasis: false,
                }];
                for run in runs {
                    entries.push(LegendEntry {
                        label: format!(
                            "{} ({}\u{b0}): r={:.2}",
                            run.color.circle_label(),
                            run.phase_deg,
                            run.amplitude
                        ),
                        color: run.color.hex().to_string(),
                        emphasis: false,
                    });
                }
                entries.push(LegendEntry {
                    label: format!(
                        "P*: r={:.3}, \u{3b8}={:.1}\u{b0}",
                        solution.r, solution.theta_deg
                    ),
                    color: SOLUTION_COLOR.to_string(),
                    emphasis: true,
                });
                entries
            }
            Some(Scene::Vectors { runs, sums }) => {
                let mut entries = Vec::with_capacity(5);
                for run in runs {
                    entries.push(LegendEntry {
                        label: format!(
                            "{} ({}\u{b0}): r={:.2}",
                            run.color.vector_label(),
                            run.phase_deg,
                            run.amplitude
                        ),
                        color: run.color.hex().to_string(),
                        emphasis: false,
                    });
                }
                entries.push(LegendEntry {
                    label: format!(
                        "Res: r={:.2}, \u{3b8}={:.1}\u{b0}",
                        sums.resultant.r, sums.resultant.theta_deg
                    ),
                    color: RESULTANT_COLOR.to_string(),
                    emphasis: true,
                });
                entries.push(LegendEntry {
                    label: format!(
                        "Opposite: r={:.2}, \u{3b8}={:.1}\u{b0}",
                        sums.opposite.r, sums.opposite.theta_deg
                    ),
                    color: OPPOSITE_STROKE.to_string(),
                    emphasis: true,
                });
                entries
            }
            None => Vec::new(),
        }
    }

    fn render_trilateration(
        &self,
        viewport: &Viewport,
        target: &mut dyn RenderTarget,
        v0: f64,
        runs: &[TestRun; 3],
        solution: &IntersectionSolution,
    ) {
        let scale = viewport.scale();
        let origin = screen_point(viewport, 0.0, 0.0);

        // Base circle: centered on the origin, radius v0, dashed.
        let base_style = Style::solid(BASE_CIRCLE_COLOR, 2.0)
            .with_dash(&[10.0, 5.0])
            .with_opacity(0.5);
        target.draw_circle(origin, v0 * scale, &base_style);
        target.draw_label(
            ScreenPoint::new(origin.x + v0 * scale + 5.0, origin.y + 5.0),
            &format!("Base r={v0}"),
            &Style::solid(BASE_CIRCLE_COLOR, 1.0),
        );

        // One circle per run, centered at polar(v0, phase).
        let center_label_style = Style::solid(CENTER_LABEL_COLOR, 1.0);
        for run in runs {
            let rad = run.phase_deg.to_radians();
            let center = screen_point(viewport, v0 * rad.cos(), v0 * rad.sin());
            let style = Style::solid(run.color.hex(), 2.0).with_opacity(0.8);

            target.draw_circle(center, run.amplitude * scale, &style);
            target.draw_circle(center, RUN_MARKER_RADIUS, &Style::solid(run.color.hex(), 1.0));
            target.draw_label(
                ScreenPoint::new(center.x + LABEL_OFFSET_PX, center.y - LABEL_OFFSET_PX),
                &format!("{} ({v0}, {}\u{b0})", run.color.circle_label(), run.phase_deg),
                &center_label_style,
            );
        }

        // Solution marker with a dashed reference line from the origin.
        let p = screen_point(viewport, solution.x, solution.y);
        target.draw_line(
            &[origin, p],
            &Style::solid(SOLUTION_COLOR, 1.0).with_dash(&[4.0, 4.0]),
        );
        target.draw_circle(p, SOLUTION_MARKER_RADIUS, &Style::solid(SOLUTION_COLOR, 2.0));
        target.draw_label(
            ScreenPoint::new(p.x + LABEL_OFFSET_PX, p.y - LABEL_OFFSET_PX),
            &format!("P* r={:.3}", solution.r),
            &Style::solid(SOLUTION_COLOR, 1.0),
        );

        debug!(v0, solution_r = solution.r, "Trilateration scene drawn");
    }

    fn render_vectors(
        &self,
        viewport: &Viewport,
        target: &mut dyn RenderTarget,
        runs: &[TestRun; 3],
        sums: &VectorSumResult,
    ) {
        for run in runs {
            let vector = PolarVector::new(run.amplitude, run.phase_deg);
            self.draw_vector_arrow(
                viewport,
                target,
                &vector,
                Style::solid(run.color.hex(), 2.0),
                run.color.vector_label(),
            );
        }

        self.draw_vector_arrow(
            viewport,
            target,
            &sums.resultant,
            Style::solid(RESULTANT_COLOR, 3.0),
            "Res",
        );

        // Correction vector: dashed and muted so it reads as derived.
        self.draw_vector_arrow(
            viewport,
            target,
            &sums.opposite,
            Style::solid(OPPOSITE_STROKE, 2.0).with_dash(&[5.0, 2.0]),
            "Opposite",
        );

        debug!(resultant_r = sums.resultant.r, "Vector scene drawn");
    }

    fn draw_vector_arrow(
        &self,
        viewport: &Viewport,
        target: &mut dyn RenderTarget,
        vector: &PolarVector,
        style: Style,
        prefix: &str,
    ) {
        let (x, y) = vector.to_cartesian();
        let origin = screen_point(viewport, 0.0, 0.0);
        let tip = screen_point(viewport, x, y);

        target.draw_arrow(origin, tip, &style);
        target.draw_label(
            tip,
            &format!("{prefix} ({:.2}, {:.1}\u{b0})", vector.r, vector.theta_deg),
            &style,
        );
    }
}

/// Largest radius the trilateration scene can reach: each circle
/// extends to `v0 + amplitude` from the origin, and the solution point
/// may lie beyond all of them.
fn trilateration_extent(v0: f64, runs: &[TestRun; 3], solution: &IntersectionSolution) -> f64 {
    let mut max_r: f64 = v0;
    for run in runs {
        max_r = max_r.max(v0 + run.amplitude);
    }
    max_r.max(solution.r)
}

/// Largest arrow magnitude in the vector scene.
fn vectors_extent(runs: &[TestRun; 3], sums: &VectorSumResult) -> f64 {
    let mut max_r: f64 = 0.0;
    for run in runs {
        max_r = max_r.max(run.amplitude);
    }
    max_r.max(sums.resultant.r).max(sums.opposite.r)
}

fn screen_point(viewport: &Viewport, plane_x: f64, plane_y: f64) -> ScreenPoint {
    let (x, y) = viewport.plane_to_screen(plane_x, plane_y);
    ScreenPoint::new(x, y)
}

/// Formats a ring tick value, trimming accumulated float noise
/// (0.30000000000000004 prints as 0.3).
fn format_tick(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tick_trims_float_noise() {
        assert_eq!(format_tick(0.1 + 0.2), "0.3");
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(12000.0), "12000");
    }

    #[test]
    fn test_legend_entry_serializes_for_presentation_layer() {
        let entry = LegendEntry {
            label: "Base: 7.00".to_string(),
            color: "#3b82f6".to_string(),
            emphasis: false,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["label"], "Base: 7.00");
        assert_eq!(json["color"], "#3b82f6");
        assert_eq!(json["emphasis"], false);
    }

    #[test]
    fn test_extents() {
        let runs = [
            TestRun::new(4.0, 0.0, rotorkit_core::RunColor::One),
            TestRun::new(3.5, 120.0, rotorkit_core::RunColor::Two),
            TestRun::new(5.0, 240.0, rotorkit_core::RunColor::Three),
        ];
        let solution = IntersectionSolution {
            x: 0.0,
            y: 0.0,
            r: 0.54,
            theta_deg: 76.6,
            rms_error: 2.85,
            degenerate: false,
        };
        // Largest circle reach: 7 + 5
        assert_eq!(trilateration_extent(7.0, &runs, &solution), 12.0);

        let sums = rotorkit_core::calculate_vectors(&runs);
        assert_eq!(vectors_extent(&runs, &sums), 5.0);
    }
}
