//! Mascot motion state machine
//!
//! The mover owns position, travel direction, mirror scale and the flip and
//! restart sub-states of one mascot. It is advanced once per display frame
//! with the frame timestamp and never touches the page itself; the stage
//! reads its transform after every step.
//!
//! States: `Idle -> Playing <-> Flipping`, with `Restarting` reachable from
//! either moving state. Only [`Mover::resume`] leaves `Restarting`.

mod direction;
mod edges;
mod snapshot;

pub use direction::{Horizontal, Vertical};
pub use snapshot::{InitialCapture, MotionPhase, MotionSnapshot};

use mascot_hal::{Transform, ViewportSize};

use crate::config::{HorizontalStart, Speeds, StageConfig, VerticalPolicy};
use crate::math::{Size, Vec2};
use crate::transition::Flip;

/// Motion-related settings copied out of the stage configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoverSettings {
    pub start: HorizontalStart,
    pub edge_overflow: f32,
    pub bounce_at_edges: bool,
    pub restart_on_bottom: bool,
    pub bottom_threshold: f32,
    pub flip_animation: bool,
    pub flip_duration: u32,
    pub flip_cooldown: u32,
    pub vertical_policy: VerticalPolicy,
    /// Distance from the bottom at which the hand fires (trigger policy only)
    pub hand_trigger_distance: Option<f32>,
}

impl MoverSettings {
    pub fn from_config(config: &StageConfig) -> Self {
        let movement = &config.movement;
        Self {
            start: movement.start_position.x,
            edge_overflow: movement.edge_overflow,
            bounce_at_edges: movement.bounce_at_edges,
            restart_on_bottom: movement.restart_on_bottom,
            bottom_threshold: movement.bottom_threshold,
            flip_animation: movement.flip_animation,
            flip_duration: movement.flip_duration,
            flip_cooldown: movement.flip_cooldown,
            vertical_policy: movement.vertical_policy,
            hand_trigger_distance: config.hand.as_ref().map(|h| h.trigger_distance),
        }
    }
}

/// What happened during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Position changed this frame
    pub moved: bool,
    /// First frame with movement since placement or reset
    pub started_moving: bool,
    pub flip_started: bool,
    /// Hand layer should fire (once per cycle)
    pub hand_triggered: bool,
    /// Bottom reached; the mover is now restarting
    pub reached_bottom: bool,
}

/// Motion state of one mascot
#[derive(Clone, Debug)]
pub struct Mover {
    settings: MoverSettings,
    size: Size,
    speeds: Speeds,
    position: Vec2,
    direction: Horizontal,
    vertical: Vertical,
    scale_x: f32,
    flip: Option<Flip>,
    last_flip_ms: Option<f64>,
    last_timestamp: Option<f64>,
    paused: bool,
    movement_started: bool,
    restarting: bool,
    hand_fired: bool,
    initial: Option<InitialCapture>,
    flip_count: u32,
}

impl Mover {
    /// Create an idle mover at the origin
    pub fn new(settings: MoverSettings, size: Size, speeds: Speeds) -> Self {
        Self {
            settings,
            size,
            speeds,
            position: Vec2::ZERO,
            direction: Horizontal::Right,
            vertical: Vertical::Down,
            scale_x: 1.0,
            flip: None,
            last_flip_ms: None,
            last_timestamp: None,
            paused: false,
            movement_started: false,
            restarting: false,
            hand_fired: false,
            initial: None,
            flip_count: 0,
        }
    }

    /// Put the mascot at its start corner and remember that placement
    pub fn place(&mut self, viewport: ViewportSize) {
        let (x, direction) = match self.settings.start {
            HorizontalStart::Left => (0.0, Horizontal::Right),
            HorizontalStart::Right => (viewport.width - self.size.width, Horizontal::Left),
        };
        self.position = Vec2::new(x, 0.0);
        self.direction = direction;
        self.scale_x = direction.facing_scale();
        self.vertical = Vertical::Down;
        self.flip = None;
        self.last_timestamp = None;
        self.movement_started = false;
        self.restarting = false;
        self.hand_fired = false;
        self.initial = Some(InitialCapture {
            position: self.position,
            direction: self.direction,
            scale_x: self.scale_x,
        });
    }

    /// Advance one frame
    ///
    /// The first frame after placement, reset, resize or un-pause only
    /// records the timestamp.
    pub fn step(&mut self, timestamp: f64, viewport: ViewportSize) -> FrameReport {
        let mut report = FrameReport::default();
        if self.paused || self.restarting {
            return report;
        }

        self.update_flip(timestamp);

        let Some(last) = self.last_timestamp.replace(timestamp) else {
            return report;
        };
        let dt = ((timestamp - last).max(0.0) / 1000.0) as f32;

        let velocity = Vec2::new(
            self.direction.sign() * self.speeds.horizontal,
            self.vertical.sign() * self.speeds.vertical,
        );
        self.position += velocity * dt;
        report.moved = dt > 0.0 && velocity != Vec2::ZERO;

        if report.moved && !self.movement_started {
            self.movement_started = true;
            report.started_moving = true;
        }

        if self.should_fire_hand(viewport) {
            self.hand_fired = true;
            report.hand_triggered = true;
        }

        if self.should_restart(viewport) {
            self.clamp_to(viewport);
            self.begin_restart();
            report.reached_bottom = true;
            return report;
        }

        if self.should_turn(viewport) && self.flip.is_none() && self.cooldown_elapsed(timestamp) {
            self.begin_flip(timestamp);
            report.flip_started = true;
        }

        if self.should_bounce_vertical(viewport) {
            self.vertical = self.vertical.reversed();
        }

        self.clamp_to(viewport);
        report
    }

    /// Enter the restart state; position updates stop until [`Mover::resume`]
    pub fn begin_restart(&mut self) {
        self.restarting = true;
    }

    /// Restore the placement captured by [`Mover::place`]
    ///
    /// The restart flag is left untouched.
    pub fn reset_to_initial(&mut self) {
        if let Some(initial) = self.initial {
            self.position = initial.position;
            self.direction = initial.direction;
            self.scale_x = initial.scale_x;
        }
        self.vertical = Vertical::Down;
        self.flip = None;
        self.last_timestamp = None;
        self.movement_started = false;
        self.hand_fired = false;
    }

    /// Leave the restart state and move again from the next frame
    pub fn resume(&mut self) {
        self.restarting = false;
        self.last_timestamp = None;
    }

    /// Adopt new dimensions and speeds after a viewport width change
    ///
    /// Position, direction and any running flip are kept.
    pub fn apply_resize(&mut self, size: Size, speeds: Speeds) {
        self.size = size;
        self.speeds = speeds;
        self.last_timestamp = None;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // Time spent paused must not turn into one huge step
            self.last_timestamp = None;
        }
        self.paused = paused;
    }

    // === Accessors ===

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Horizontal {
        self.direction
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn speeds(&self) -> Speeds {
        self.speeds
    }

    pub fn is_flipping(&self) -> bool {
        self.flip.is_some()
    }

    pub fn flip(&self) -> Option<&Flip> {
        self.flip.as_ref()
    }

    pub fn flip_count(&self) -> u32 {
        self.flip_count
    }

    pub fn is_restarting(&self) -> bool {
        self.restarting
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn movement_started(&self) -> bool {
        self.movement_started
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    pub fn phase(&self) -> MotionPhase {
        if self.restarting {
            MotionPhase::Restarting
        } else if self.flip.is_some() {
            MotionPhase::Flipping
        } else if self.movement_started {
            MotionPhase::Playing
        } else {
            MotionPhase::Idle
        }
    }

    /// Transform of the mascot layer
    pub fn transform(&self) -> Transform {
        Transform::new(self.position.x, self.position.y, self.scale_x)
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            phase: self.phase(),
            x: self.position.x,
            y: self.position.y,
            direction: self.direction,
            vertical: self.vertical,
            scale_x: self.scale_x,
            paused: self.paused,
            movement_started: self.movement_started,
        }
    }

    fn update_flip(&mut self, timestamp: f64) {
        if let Some(flip) = self.flip {
            self.scale_x = flip.scale_at(timestamp);
            if flip.is_complete(timestamp) {
                self.flip = None;
            }
        }
    }

    fn begin_flip(&mut self, timestamp: f64) {
        self.direction = self.direction.reversed();
        let target = self.direction.facing_scale();
        if self.settings.flip_animation {
            self.flip = Some(Flip::new(
                self.scale_x,
                target,
                timestamp,
                self.settings.flip_duration,
            ));
        } else {
            self.scale_x = target;
        }
        self.last_flip_ms = Some(timestamp);
        self.flip_count += 1;
    }

    fn cooldown_elapsed(&self, timestamp: f64) -> bool {
        self.last_flip_ms
            .map_or(true, |last| timestamp - last > f64::from(self.settings.flip_cooldown))
    }
}
