//! Stage events and lifecycle phases

use mascot_hal::{Layer, TimerKind};
use serde::Serialize;

/// Everything that can happen to a stage
///
/// Hosts translate timers, frame callbacks, library notifications and page
/// events into these and feed them to [`super::StageEngine::dispatch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageEvent {
    /// Begin the appearance sequence
    Start,
    /// A scheduled timer expired
    Timer(TimerKind),
    /// The rendering library finished loading
    LibraryReady,
    /// The rendering library could not be loaded
    LibraryFailed,
    /// A player rendered its first frame
    ContentLoaded(Layer),
    /// An opacity transition on a layer finished
    TransitionEnd(Layer),
    /// Display frame with its timestamp in milliseconds
    Frame(f64),
    /// Viewport was resized
    Resize { width: f32, height: f32 },
    /// Pointer entered the mascot
    PointerEnter,
    /// Pointer left the mascot
    PointerLeave,
    /// Host asked to freeze motion
    Pause,
    /// Host asked to continue motion
    Resume,
    /// Tear everything down
    Destroy,
}

/// Lifecycle phase of a stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Constructed, nothing on the page
    Created,
    /// Layers created, waiting to be inserted
    Appearing,
    /// Layers on the page, waiting to create players
    Mounted,
    /// Waiting for the rendering library
    Loading,
    /// Players created, waiting for motion to start
    Waiting,
    /// Frame loop running
    Running,
    /// Faded out at the bottom, waiting to come back
    Restarting,
    /// Stopped for good (one-time cycle finished or destroyed)
    Halted,
    /// Could not render; nothing is shown
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Halted | Phase::Failed)
    }
}

/// Availability of the rendering library as seen by the stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryState {
    NotRequested,
    Pending,
    Ready,
    Failed,
}
