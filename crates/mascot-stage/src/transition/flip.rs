//! Mirror-scale flip for direction reversals

use super::ease_in_out_quad;

/// Flip animation state
///
/// Interpolates the horizontal mirror scale from the value it had when the
/// turn started to the target (`+1` facing right, `-1` facing left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flip {
    /// Scale at flip start
    from: f32,
    /// Target scale
    to: f32,
    /// Start time (ms timestamp)
    start_ms: f64,
    /// Duration in milliseconds
    duration_ms: f32,
}

impl Flip {
    /// Create a new flip
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1) as f32,
        }
    }

    /// Get the progress (0.0 to 1.0)
    pub fn progress(&self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.start_ms) as f32;
        (elapsed / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Check if the flip is complete
    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Mirror scale at the given time
    pub fn scale_at(&self, now_ms: f64) -> f32 {
        if self.is_complete(now_ms) {
            return self.to;
        }
        let t = ease_in_out_quad(self.progress(now_ms));
        self.from + (self.to - self.from) * t
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }
}
