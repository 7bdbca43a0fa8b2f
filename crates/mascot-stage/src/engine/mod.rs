//! Stage engine coordinating layers, players, motion and the trail
//!
//! This module is split into focused submodules:
//! - `events`: Stage events, phases and library state
//! - `dispatch`: The transition table
//! - `sequence`: Appearance sequence up to the start of motion
//! - `running`: Frame loop, snow trail, hand layer and pausing
//! - `restart`: Bottom restart, resize and teardown

mod dispatch;
mod events;
mod restart;
mod running;
mod sequence;

pub use events::{LibraryState, Phase, StageEvent};

use mascot_hal::{AnimationRequest, Layer, StageHal, Transform};
use serde::Serialize;

use crate::config::StageConfig;
use crate::device::{self, DeviceClass, Profile};
use crate::motion::{MotionSnapshot, Mover, MoverSettings};
use crate::trail::{SnowTrail, TrailState};

/// Players bound to the layers
#[derive(Clone, Debug)]
pub(crate) struct Players<P> {
    pub main: Option<P>,
    pub snow: Option<P>,
    pub hand: Option<P>,
}

impl<P> Players<P> {
    fn empty() -> Self {
        Self {
            main: None,
            snow: None,
            hand: None,
        }
    }

    fn get(&self, layer: Layer) -> Option<&P> {
        match layer {
            Layer::Main => self.main.as_ref(),
            Layer::Snow => self.snow.as_ref(),
            Layer::Hand => self.hand.as_ref(),
        }
    }

    /// Players that travel with the mascot (main and snow)
    fn travelling(&self) -> impl Iterator<Item = &P> {
        self.main.iter().chain(self.snow.iter())
    }

    fn all(&self) -> impl Iterator<Item = &P> {
        self.travelling().chain(self.hand.iter())
    }
}

/// Serializable view of the whole stage
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    pub phase: Phase,
    pub device: DeviceClass,
    pub library: LibraryState,
    pub motion: MotionSnapshot,
    pub trail: TrailState,
    pub hovered: bool,
    pub held: bool,
}

/// Stage engine
///
/// Owns the host capability provider and drives it from [`StageEvent`]s.
/// All state changes go through [`StageEngine::dispatch`].
pub struct StageEngine<H: StageHal> {
    pub(crate) hal: H,
    pub(crate) config: StageConfig,
    pub(crate) phase: Phase,
    pub(crate) library: LibraryState,
    pub(crate) profile: Profile,
    /// Width used for the last resolve; height-only resizes are ignored
    pub(crate) viewport_width: f32,
    pub(crate) mover: Mover,
    pub(crate) trail: SnowTrail,
    pub(crate) players: Players<H::Player>,
    pub(crate) movement_scheduled: bool,
    pub(crate) hand_visible: bool,
    /// Pointer is over the mascot (only tracked with hover pausing)
    pub(crate) hovered: bool,
    /// Paused by the host
    pub(crate) held: bool,
    /// Players were paused by a restart fade-out and wait for the reset
    pub(crate) players_parked: bool,
    pub(crate) destroyed: bool,
}

impl<H: StageHal> StageEngine<H> {
    /// Create an engine for the current viewport
    ///
    /// Nothing is put on the page until [`StageEvent::Start`].
    pub fn new(hal: H, config: StageConfig) -> Self {
        let viewport = hal.viewport();
        let profile = device::resolve(&config, viewport.width);
        let mover = Mover::new(
            MoverSettings::from_config(&config),
            profile.size,
            profile.speeds,
        );
        Self {
            hal,
            config,
            phase: Phase::Created,
            library: LibraryState::NotRequested,
            profile,
            viewport_width: viewport.width,
            mover,
            trail: SnowTrail::new(),
            players: Players::empty(),
            movement_scheduled: false,
            hand_visible: false,
            hovered: false,
            held: false,
            players_parked: false,
            destroyed: false,
        }
    }

    // === Accessors ===

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn library(&self) -> LibraryState {
        self.library
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn mover(&self) -> &Mover {
        &self.mover
    }

    pub fn trail(&self) -> &SnowTrail {
        &self.trail
    }

    /// Whether a player is bound to a layer
    pub fn has_player(&self, layer: Layer) -> bool {
        self.players.get(layer).is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.mover.is_paused()
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            phase: self.phase,
            device: self.profile.class,
            library: self.library,
            motion: self.mover.snapshot(),
            trail: self.trail.state(),
            hovered: self.hovered,
            held: self.held,
        }
    }

    // === Helpers shared by the submodules ===

    /// Layers this configuration uses, in insertion order
    pub(crate) fn layers(&self) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(3);
        if self.config.snow_trails.enabled {
            layers.push(Layer::Snow);
        }
        if self.config.hand.is_some() {
            layers.push(Layer::Hand);
        }
        layers.push(Layer::Main);
        layers
    }

    /// Transform of the snow layer for the current mascot transform
    pub(crate) fn trail_transform(&self) -> Transform {
        let t = self.mover.transform();
        if self.config.snow_trails.reflect_with_main {
            t
        } else {
            Transform::new(t.x, t.y, 1.0)
        }
    }

    pub(crate) fn animation_request(&self, layer: Layer) -> Option<AnimationRequest> {
        let (path, looping, autoplay) = match layer {
            Layer::Main => (self.config.animation_path.clone(), false, true),
            Layer::Snow if self.config.snow_trails.enabled => {
                (self.config.snow_trails.lottie_path.clone(), true, true)
            }
            Layer::Snow => return None,
            Layer::Hand => (self.config.hand.as_ref()?.lottie_path.clone(), false, false),
        };
        Some(AnimationRequest {
            layer,
            path,
            renderer: self.config.library.renderer.clone(),
            looping,
            autoplay,
        })
    }

    pub(crate) fn log(&self, msg: &str) {
        self.hal.debug_write(&format!("[stage] {}", msg));
    }

    /// Give up on rendering: stop every callback and leave layers invisible
    pub(crate) fn fail(&mut self, reason: &str) {
        self.log(&format!("not rendering: {}", reason));
        self.hal.cancel_frame();
        for kind in mascot_hal::TimerKind::ALL {
            self.hal.cancel_timer(kind);
        }
        self.phase = Phase::Failed;
    }
}
