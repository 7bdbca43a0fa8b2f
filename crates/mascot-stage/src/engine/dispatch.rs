//! Transition table

use mascot_hal::{Layer, StageHal, TimerKind};

use super::{Phase, StageEngine, StageEvent};

impl<H: StageHal> StageEngine<H> {
    /// Feed one event to the stage
    ///
    /// Events that make no sense in the current phase are dropped, so stale
    /// timers and frame callbacks are harmless. Once halted or failed only
    /// `Destroy` has an effect.
    pub fn dispatch(&mut self, event: StageEvent) {
        use StageEvent as E;

        if event == E::Destroy {
            self.destroy();
            return;
        }
        if self.phase.is_terminal() {
            return;
        }

        let hover_pause = self.config.movement.pause_on_hover;
        match (self.phase, event) {
            (Phase::Created, E::Start) => self.on_start(),
            (Phase::Appearing, E::Timer(TimerKind::ContainerAppearance)) => self.on_appear(),
            (Phase::Mounted, E::Timer(TimerKind::AnimationStart)) => self.on_animation_start(),

            (_, E::LibraryReady) => self.on_library_ready(),
            (_, E::LibraryFailed) => self.on_library_failed(),
            (_, E::ContentLoaded(layer)) => self.on_content_loaded(layer),
            (Phase::Loading | Phase::Waiting, E::TransitionEnd(Layer::Main)) => {
                self.on_fade_in_finished()
            }
            (_, E::TransitionEnd(_)) => {}
            (Phase::Loading | Phase::Waiting, E::Timer(TimerKind::MovementStart)) => {
                self.on_movement_start()
            }

            (Phase::Running, E::Frame(timestamp)) => self.on_frame(timestamp),
            (_, E::Timer(TimerKind::TrailReveal)) => self.on_trail_reveal(),
            (_, E::Timer(TimerKind::TrailSettle)) => self.trail.settle(),

            (Phase::Restarting, E::Timer(TimerKind::RestartResume)) => self.on_restart_resume(),
            (Phase::Restarting, E::Timer(TimerKind::RestartMove)) => self.on_restart_move(),

            (_, E::Resize { width, height }) => self.on_resize(width, height),
            (_, E::PointerEnter) if hover_pause => self.set_hovered(true),
            (_, E::PointerLeave) if hover_pause => self.set_hovered(false),
            (_, E::Pause) => self.set_held(true),
            (_, E::Resume) => self.set_held(false),

            (phase, event) => {
                self.log(&format!("ignored {:?} in {:?}", event, phase));
            }
        }
    }
}
