//! Viewport and coordinate transformation for the polar canvas.
//!
//! Handles conversion between pixel coordinates (screen space, Y down)
//! and plane coordinates (polar plane, Y up). Manages zoom and pan with
//! the plane origin as the zoom anchor: zooming changes only the scale,
//! so the origin stays put on screen wherever the pan last placed it.

use std::fmt;

use rotorkit_core::{normalize_angle, PolarVector};

/// Smallest allowed scale (pixels per plane unit).
pub const MIN_SCALE: f64 = 0.005;
/// Largest allowed scale (pixels per plane unit).
pub const MAX_SCALE: f64 = 1000.0;
/// Multiplicative step applied per zoom event.
pub const ZOOM_STEP: f64 = 1.1;
/// Initial scale: 50 pixels per unit of radius.
pub const DEFAULT_SCALE: f64 = 50.0;
/// Fraction of the smaller canvas dimension a fitted radius occupies.
const FIT_FILL_FACTOR: f64 = 0.45;

/// The viewport transformation state (scale and pan).
///
/// `pan_x`/`pan_y` are the screen position of the plane origin, in raw
/// pixels. Scale is always inside `[MIN_SCALE, MAX_SCALE]`; requests
/// outside the range are silently clamped, never reported.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a viewport with the plane origin centered on the canvas.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            scale: DEFAULT_SCALE,
            pan_x: canvas_width / 2.0,
            pan_y: canvas_height / 2.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Gets the canvas width.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Gets the canvas height.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Gets the current scale (pixels per plane unit).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Gets the pan offset (X coordinate of the origin on screen).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y coordinate of the origin on screen).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Sets the scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Zooms in by one step. Pan is untouched: the zoom is anchored at
    /// the plane origin, never at the pointer.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * ZOOM_STEP);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / ZOOM_STEP);
    }

    /// Pans by raw screen-pixel deltas. No scale correction: the drag
    /// distance is measured on screen, not in plane units.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Places the plane origin back at the canvas center.
    pub fn center(&mut self) {
        self.pan_x = self.canvas_width / 2.0;
        self.pan_y = self.canvas_height / 2.0;
    }

    /// Converts plane coordinates (Y up) to screen pixels (Y down).
    ///
    /// ```text
    /// screen_x = plane_x * scale + pan_x
    /// screen_y = -plane_y * scale + pan_y
    /// ```
    pub fn plane_to_screen(&self, plane_x: f64, plane_y: f64) -> (f64, f64) {
        (
            plane_x * self.scale + self.pan_x,
            -plane_y * self.scale + self.pan_y,
        )
    }

    /// Converts a pointer position to polar plane coordinates.
    ///
    /// Subtracts the pan offset, flips the Y axis, divides by the
    /// scale, and converts to `(r, theta)` with theta in `[0, 360)`.
    /// Exact inverse of [`Viewport::plane_to_screen`].
    pub fn screen_to_polar(&self, pointer_x: f64, pointer_y: f64) -> PolarVector {
        let plane_x = (pointer_x - self.pan_x) / self.scale;
        let plane_y = -(pointer_y - self.pan_y) / self.scale;

        let r = plane_x.hypot(plane_y);
        let theta_deg = normalize_angle(plane_y.atan2(plane_x).to_degrees());
        PolarVector::new(r, theta_deg)
    }

    /// Rescales so `max_radius` plane units fill 45% of the smaller
    /// canvas dimension, and recenters the origin. No-op when
    /// `max_radius` is zero, negative, or not finite.
    pub fn fit_to_radius(&mut self, max_radius: f64) {
        if !max_radius.is_finite() || max_radius <= 0.0 {
            return;
        }

        let min_dimension = self.canvas_width.min(self.canvas_height);
        self.set_scale(min_dimension * FIT_FILL_FACTOR / max_radius);
        self.center();
    }

    /// Adopts a new canvas size and recenters the origin. Scale is
    /// unchanged.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
        self.center();
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scale: {:.3} px/unit | Pan: ({:.1}, {:.1})",
            self.scale, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_centers_origin() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.pan_x(), 400.0);
        assert_eq!(vp.pan_y(), 300.0);
        assert_eq!(vp.scale(), DEFAULT_SCALE);
    }

    #[test]
    fn test_zoom_clamps_to_bounds() {
        let mut vp = Viewport::new(800.0, 600.0);
        for _ in 0..200 {
            vp.zoom_in();
        }
        assert_eq!(vp.scale(), MAX_SCALE);
        for _ in 0..400 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale(), MIN_SCALE);
    }

    #[test]
    fn test_zoom_leaves_pan_untouched() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(37.0, -12.0);
        let (px, py) = (vp.pan_x(), vp.pan_y());
        vp.zoom_in();
        vp.zoom_out();
        assert_eq!(vp.pan_x(), px);
        assert_eq!(vp.pan_y(), py);
    }

    #[test]
    fn test_pan_accumulates_raw_pixels() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.zoom_in(); // pan deltas must not depend on zoom level
        vp.pan(10.0, 20.0);
        vp.pan(10.0, 20.0);
        assert_eq!(vp.pan_x(), 420.0);
        assert_eq!(vp.pan_y(), 340.0);
    }

    #[test]
    fn test_fit_to_radius_exact_scale() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.fit_to_radius(5.0);
        assert_eq!(vp.scale(), 0.45 * 600.0 / 5.0);
        assert_eq!(vp.pan_x(), 400.0);
        assert_eq!(vp.pan_y(), 300.0);
    }

    #[test]
    fn test_fit_to_radius_ignores_non_positive() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(50.0, 50.0);
        let before = vp.scale();
        vp.fit_to_radius(0.0);
        vp.fit_to_radius(-5.0);
        vp.fit_to_radius(f64::NAN);
        assert_eq!(vp.scale(), before);
        assert_eq!(vp.pan_x(), 450.0);
    }

    #[test]
    fn test_resize_keeps_scale_recenters_pan() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.zoom_in();
        let scale = vp.scale();
        vp.on_resize(1024.0, 768.0);
        assert_eq!(vp.scale(), scale);
        assert_eq!(vp.pan_x(), 512.0);
        assert_eq!(vp.pan_y(), 384.0);
    }

    #[test]
    fn test_screen_to_polar_at_center_is_origin() {
        let vp = Viewport::new(800.0, 600.0);
        let p = vp.screen_to_polar(400.0, 300.0);
        assert_eq!(p.r, 0.0);
    }

    #[test]
    fn test_screen_to_polar_flips_y() {
        let vp = Viewport::new(800.0, 600.0);
        // 50 px above center = +1 plane unit straight up = 90 degrees
        let p = vp.screen_to_polar(400.0, 250.0);
        assert!((p.r - 1.0).abs() < 1e-12);
        assert!((p.theta_deg - 90.0).abs() < 1e-12);
    }
}
