//! Host Abstraction Layer for the mascot stage
//!
//! This crate defines the `StageHal` trait that lets the stage logic run
//! against different hosts (a browser page, a headless test harness) by
//! abstracting every side effect the stage performs.
//!
//! # Host Implementations
//!
//! - **Web**: DOM elements for layers, lottie-web for players,
//!   `requestAnimationFrame` for frames, `setTimeout` for timers
//! - **Mock**: recorded calls and a manually driven clock for tests

#![no_std]
#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Visual layer of a mascot instance
///
/// Every mascot owns at most one element per layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// The mascot itself
    Main,
    /// Snow trail drawn underneath the mascot
    Snow,
    /// One-shot secondary "hand" animation
    Hand,
}

impl Layer {
    /// Short label used in log lines
    pub fn label(self) -> &'static str {
        match self {
            Layer::Main => "main",
            Layer::Snow => "snow",
            Layer::Hand => "hand",
        }
    }
}

/// Named one-shot timers the stage schedules
///
/// Scheduling a kind that is already pending replaces the pending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Layers are inserted into the page
    ContainerAppearance,
    /// Players are created
    AnimationStart,
    /// The frame loop begins
    MovementStart,
    /// Snow trail fades in after the trail delay
    TrailReveal,
    /// Snow trail fade-out has finished
    TrailSettle,
    /// Restart cycle restores the mascot
    RestartResume,
    /// Restart cycle resumes motion
    RestartMove,
}

impl TimerKind {
    /// Every timer kind, in scheduling order
    pub const ALL: [TimerKind; 7] = [
        TimerKind::ContainerAppearance,
        TimerKind::AnimationStart,
        TimerKind::MovementStart,
        TimerKind::TrailReveal,
        TimerKind::TrailSettle,
        TimerKind::RestartResume,
        TimerKind::RestartMove,
    ];
}

/// Availability of the animation rendering library
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Library present, players can be created now
    Ready,
    /// Library is being fetched; the host reports the outcome later
    Pending,
    /// Library cannot be made available
    Failed,
}

/// Viewport dimensions in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    /// Create a new viewport size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Position and horizontal mirror of a layer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
}

impl Transform {
    pub const fn new(x: f32, y: f32, scale_x: f32) -> Self {
        Self { x, y, scale_x }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({}px, {}px) scaleX({})",
            self.x, self.y, self.scale_x
        )
    }
}

/// Timing curve of an opacity transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeCurve {
    EaseIn,
    EaseOut,
}

/// Opacity transition applied together with an opacity change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fade {
    pub duration_ms: u32,
    pub curve: FadeCurve,
}

impl Fade {
    pub const fn ease_in(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            curve: FadeCurve::EaseIn,
        }
    }

    pub const fn ease_out(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            curve: FadeCurve::EaseOut,
        }
    }
}

impl fmt::Display for Fade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = match self.curve {
            FadeCurve::EaseIn => "ease-in",
            FadeCurve::EaseOut => "ease-out",
        };
        write!(f, "opacity {}ms {}", self.duration_ms, curve)
    }
}

/// Description of a layer element to create
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub layer: Layer,
    /// CSS class applied to the element
    pub class_name: &'static str,
    /// Inline style declarations as (property, value) pairs
    pub declarations: Vec<(&'static str, String)>,
}

/// Request to bind an animation player to a layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    pub layer: Layer,
    /// URL of the animation asset
    pub path: String,
    /// Renderer name understood by the library (e.g. "svg")
    pub renderer: String,
    pub looping: bool,
    pub autoplay: bool,
}

/// Host Abstraction Layer trait
///
/// Implementations provide host-specific functionality for:
/// - Layer elements (create, mount, style, remove)
/// - The animation library (readiness, players)
/// - Scheduling (one-shot timers, per-frame callbacks)
/// - Viewport measurement
/// - Debug output
///
/// Asynchronous outcomes (timer expiry, frame callbacks, library load,
/// first rendered frame, pointer and resize events) are delivered back
/// to the stage as events by the host; this trait only starts them.
pub trait StageHal: 'static {
    /// Handle to an animation player (a lottie instance on the web)
    type Player: Clone + fmt::Debug;

    // === Layers ===

    /// Install the shared stylesheet fragment (idempotent)
    fn install_stylesheet(&self, css: &str);

    /// Create a detached layer element, initially invisible
    ///
    /// # Returns
    /// * `Ok(())` - Element created
    /// * `Err(HalError::MountNotFound)` - No mount target to attach to later
    /// * `Err(HalError::DomFailure)` - Element could not be created
    fn create_layer(&self, spec: &LayerSpec) -> Result<(), HalError>;

    /// Insert a previously created layer into the mount target
    fn mount_layer(&self, layer: Layer) -> Result<(), HalError>;

    /// Pin a layer relative to the viewport at the given offset
    fn pin_to_viewport(&self, layer: Layer, left: f32, top: f32);

    /// Apply position and mirror scale
    fn set_transform(&self, layer: Layer, transform: Transform);

    /// Change opacity, optionally through a transition
    fn set_opacity(&self, layer: Layer, opacity: f32, fade: Option<Fade>);

    /// Change layer dimensions
    fn set_size(&self, layer: Layer, width: f32, height: f32);

    /// Remove every layer element from the page
    fn remove_layers(&self);

    // === Animation Library ===

    /// Make sure the rendering library is available
    ///
    /// A `Pending` result is followed by exactly one host notification of
    /// success or failure.
    fn ensure_ready(&self) -> Readiness;

    /// Create a player bound to a layer and start fetching its asset
    ///
    /// # Returns
    /// * `Ok(Player)` - Player created (asset may still be loading)
    /// * `Err(HalError::LibraryUnavailable)` - Library not loaded
    /// * `Err(HalError::LayerMissing)` - Layer was never created
    fn load_animation(&self, request: &AnimationRequest) -> Result<Self::Player, HalError>;

    fn play(&self, player: &Self::Player);

    fn pause(&self, player: &Self::Player);

    /// Seek to a frame and play from there
    fn go_to_and_play(&self, player: &Self::Player, frame: u32);

    // === Environment ===

    /// Current viewport dimensions
    fn viewport(&self) -> ViewportSize;

    // === Scheduling ===

    /// Schedule a one-shot timer, replacing a pending one of the same kind
    fn schedule(&self, timer: TimerKind, delay_ms: u32);

    /// Cancel a pending timer (no-op when not pending)
    fn cancel_timer(&self, timer: TimerKind);

    /// Request one frame callback
    fn request_frame(&self);

    /// Cancel the outstanding frame callback, if any
    fn cancel_frame(&self);

    // === Debug ===

    /// Write a debug message to the host's console/log
    fn debug_write(&self, msg: &str);
}

/// HAL errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalError {
    /// The configured mount target does not exist
    MountNotFound,
    /// Operation on a layer that was never created
    LayerMissing,
    /// Rendering library is not loaded
    LibraryUnavailable,
    /// Player could not be created for the asset
    AnimationLoadFailed,
    /// Host DOM rejected an operation
    DomFailure,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HalError::MountNotFound => "mount target not found",
            HalError::LayerMissing => "layer was never created",
            HalError::LibraryUnavailable => "animation library unavailable",
            HalError::AnimationLoadFailed => "animation could not be loaded",
            HalError::DomFailure => "DOM operation failed",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}
