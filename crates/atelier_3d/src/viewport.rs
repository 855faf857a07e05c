//! Viewport sizing and resize handling

/// Viewport dimensions in logical pixels plus the device pixel ratio
///
/// Degenerate sizes are clamped to 1×1 so the aspect ratio is always
/// finite; the pixel ratio is capped to limit render cost on
/// high-density displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f32,
}

impl Viewport {
    /// Upper bound for the device pixel ratio
    pub const MAX_PIXEL_RATIO: f32 = 2.0;

    /// Create a viewport, clamping degenerate input
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio.min(Self::MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio,
        }
    }

    /// Logical width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Capped device pixel ratio
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Width / height, used for the camera projection
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Output buffer size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width as f32 * self.pixel_ratio) as u32;
        let h = (self.height as f32 * self.pixel_ratio) as u32;
        (w.max(1), h.max(1))
    }
}

/// Maps window sizes to viewport sizes
///
/// The viewport occupies a fixed fraction of the window width (the
/// rest belongs to the control panel) and the full window height.
#[derive(Clone, Copy, Debug)]
pub struct ResizeController {
    width_fraction: f32,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl ResizeController {
    /// Create a controller with the given width fraction, clamped to
    /// a sane range
    pub fn new(width_fraction: f32) -> Self {
        let width_fraction = if width_fraction.is_finite() {
            width_fraction.clamp(0.05, 1.0)
        } else {
            0.5
        };
        Self { width_fraction }
    }

    /// Fraction of the window width the viewport occupies
    pub fn width_fraction(&self) -> f32 {
        self.width_fraction
    }

    /// Compute the viewport for a window size
    pub fn viewport_for_window(&self, width: u32, height: u32, pixel_ratio: f32) -> Viewport {
        let viewport_width = (width as f32 * self.width_fraction) as u32;
        Viewport::new(viewport_width, height, pixel_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_width_window_split() {
        let controller = ResizeController::new(0.5);
        let viewport = controller.viewport_for_window(800, 600, 1.0);
        assert_eq!(viewport.width(), 400);
        assert_eq!(viewport.height(), 600);
        assert!((viewport.aspect() - 0.667).abs() < 1e-3);
    }

    #[test]
    fn degenerate_sizes_clamp_to_one() {
        let viewport = Viewport::new(0, 0, 1.0);
        assert_eq!((viewport.width(), viewport.height()), (1, 1));
        assert!(viewport.aspect().is_finite());

        let controller = ResizeController::new(0.5);
        let viewport = controller.viewport_for_window(0, 0, 1.0);
        assert_eq!((viewport.width(), viewport.height()), (1, 1));
    }

    #[test]
    fn pixel_ratio_caps_at_two() {
        let viewport = Viewport::new(100, 100, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.physical_size(), (200, 200));

        let viewport = Viewport::new(100, 100, 1.5);
        assert_eq!(viewport.pixel_ratio(), 1.5);
        assert_eq!(viewport.physical_size(), (150, 150));
    }

    #[test]
    fn aspect_matches_width_over_height() {
        let viewport = Viewport::new(400, 600, 1.0);
        assert!((viewport.aspect() - 400.0 / 600.0).abs() < 1e-6);
    }
}
