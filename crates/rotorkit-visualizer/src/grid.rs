//! Nice-number grid spacing for the concentric polar grid.
//!
//! Ring spacing must stay at least [`MIN_PIXEL_SPACING`] pixels on
//! screen at any zoom level, so the plane-unit step is derived from the
//! current scale and snapped up to a visually clean 1/2/5 value. The
//! step therefore changes discretely as the scale crosses thresholds,
//! not continuously.

/// Minimum on-screen distance between adjacent grid rings.
pub const MIN_PIXEL_SPACING: f64 = 60.0;
/// Angular spacing of the labeled grid spokes.
pub const SPOKE_STEP_DEG: f64 = 30.0;
/// Rings extend to this multiple of the viewport diagonal so panning
/// never reveals bare canvas.
pub const EXTENT_FACTOR: f64 = 1.5;

/// A snapped grid spacing: `step` is `{1,2,5,10} x magnitude` where
/// `magnitude` is a power of ten.
///
/// Recomputed whenever the scale changes; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub step: f64,
    pub magnitude: f64,
}

impl GridSpec {
    /// Computes the spacing for a scale using the default pixel floor.
    pub fn compute(scale: f64) -> Self {
        Self::compute_with_spacing(scale, MIN_PIXEL_SPACING)
    }

    /// Computes the smallest nice step whose on-screen size is at least
    /// `min_pixel_spacing` pixels.
    pub fn compute_with_spacing(scale: f64, min_pixel_spacing: f64) -> Self {
        // Minimum plane-unit step satisfying the pixel constraint.
        let raw_step = min_pixel_spacing / scale;

        let magnitude = 10f64.powf(raw_step.log10().floor());
        // Guaranteed in [1, 10).
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        Self {
            step: nice * magnitude,
            magnitude,
        }
    }
}
