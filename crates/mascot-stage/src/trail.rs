//! Snow trail visibility
//!
//! The trail fades in a short delay after the mascot starts moving and fades
//! out while hovering or restarting. The state here only decides *what*
//! should happen; the stage performs the layer and timer operations.

use serde::Serialize;

/// Trail visibility state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrailState {
    /// Not shown
    #[default]
    Hidden,
    /// Reveal scheduled after the trail delay
    Revealing,
    /// Fully faded in
    Visible,
    /// Fade-out in progress
    FadingOut,
}

/// Action the stage must take after a trail transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailAction {
    None,
    /// Schedule the reveal timer
    ScheduleReveal,
    /// Cancel a pending reveal
    CancelReveal,
    /// Fade in now
    FadeIn,
    /// Fade out now and schedule the settle timer
    FadeOut,
}

/// Snow trail sub-machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnowTrail {
    state: TrailState,
}

impl SnowTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrailState {
        self.state
    }

    /// A reveal has been requested and not undone
    pub fn is_shown(&self) -> bool {
        matches!(self.state, TrailState::Revealing | TrailState::Visible)
    }

    /// Request the trail; repeated requests are ignored
    pub fn show(&mut self) -> TrailAction {
        match self.state {
            TrailState::Hidden | TrailState::FadingOut => {
                self.state = TrailState::Revealing;
                TrailAction::ScheduleReveal
            }
            TrailState::Revealing | TrailState::Visible => TrailAction::None,
        }
    }

    /// Reveal timer fired
    ///
    /// `allowed` is false when the mascot is no longer moving.
    pub fn reveal(&mut self, allowed: bool) -> TrailAction {
        if self.state != TrailState::Revealing {
            return TrailAction::None;
        }
        if allowed {
            self.state = TrailState::Visible;
            TrailAction::FadeIn
        } else {
            self.state = TrailState::Hidden;
            TrailAction::None
        }
    }

    pub fn hide(&mut self) -> TrailAction {
        match self.state {
            TrailState::Visible => {
                self.state = TrailState::FadingOut;
                TrailAction::FadeOut
            }
            TrailState::Revealing => {
                self.state = TrailState::Hidden;
                TrailAction::CancelReveal
            }
            TrailState::Hidden | TrailState::FadingOut => TrailAction::None,
        }
    }

    /// Fade-out finished
    pub fn settle(&mut self) {
        if self.state == TrailState::FadingOut {
            self.state = TrailState::Hidden;
        }
    }

    pub fn reset(&mut self) {
        self.state = TrailState::Hidden;
    }
}
