//! Travel directions

use serde::Serialize;

/// Horizontal travel direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    /// Sign applied to the horizontal speed
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Horizontal::Left => -1.0,
            Horizontal::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Horizontal::Left => Horizontal::Right,
            Horizontal::Right => Horizontal::Left,
        }
    }

    /// Mirror scale of a mascot facing this way
    #[inline]
    pub fn facing_scale(self) -> f32 {
        self.sign()
    }
}

/// Vertical travel direction (screen coordinates, down is positive)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Vertical::Up => -1.0,
            Vertical::Down => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Vertical::Up => Vertical::Down,
            Vertical::Down => Vertical::Up,
        }
    }
}
