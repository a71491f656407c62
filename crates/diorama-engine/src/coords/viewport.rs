/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Logical viewport of a `width` x `height` physical-pixel surface.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new((width as f64 / scale) as f32, (height as f64 / scale) as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_is_divided_by_scale() {
        assert_eq!(Viewport::from_physical(1280, 960, 2.0), Viewport::new(640.0, 480.0));
        assert_eq!(Viewport::from_physical(100, 50, 0.0), Viewport::new(100.0, 50.0));
    }

    #[test]
    fn zero_area_is_invalid() {
        assert!(!Viewport::from_physical(0, 10, 1.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
