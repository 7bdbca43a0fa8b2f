//! Closed interval along one axis

/// Legal range of a coordinate
///
/// `min` wins when the range is inverted (an element larger than the
/// viewport), so clamping never panics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Horizontal travel range: past each edge by `overflow`
    #[inline]
    pub fn horizontal(viewport_width: f32, element_width: f32, overflow: f32) -> Self {
        Self::new(-overflow, viewport_width - element_width + overflow)
    }

    /// Vertical travel range: fully inside the viewport
    #[inline]
    pub fn vertical(viewport_height: f32, element_height: f32) -> Self {
        Self::new(0.0, viewport_height - element_height)
    }

    #[inline]
    pub fn clamp(self, v: f32) -> f32 {
        v.min(self.max).max(self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_horizontal() {
        let span = Span::horizontal(1000.0, 456.0, 65.0);
        assert!((span.min + 65.0).abs() < 0.001);
        assert!((span.max - 609.0).abs() < 0.001);
    }

    #[test]
    fn test_span_clamp() {
        let span = Span::new(0.0, 100.0);
        assert!((span.clamp(-5.0) - 0.0).abs() < 0.001);
        assert!((span.clamp(50.0) - 50.0).abs() < 0.001);
        assert!((span.clamp(150.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_span_inverted_prefers_min() {
        // Element taller than the viewport
        let span = Span::vertical(200.0, 344.0);
        assert!((span.clamp(30.0) - 0.0).abs() < 0.001);
    }
}
