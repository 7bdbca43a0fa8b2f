//! Captured and reported motion state

use serde::Serialize;

use super::{Horizontal, Vertical};
use crate::math::Vec2;

/// Coarse motion state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPhase {
    Idle,
    Playing,
    Flipping,
    Restarting,
}

/// Placement recorded at start, restored by a restart cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialCapture {
    pub position: Vec2,
    pub direction: Horizontal,
    pub scale_x: f32,
}

/// Read-only view of the mover for diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSnapshot {
    pub phase: MotionPhase,
    pub x: f32,
    pub y: f32,
    pub direction: Horizontal,
    pub vertical: Vertical,
    pub scale_x: f32,
    pub paused: bool,
    pub movement_started: bool,
}
