//! Frame loop, snow trail, hand layer and pausing

use mascot_hal::{Fade, Layer, StageHal, TimerKind};

use super::{Phase, StageEngine};
use crate::trail::TrailAction;

/// Extra wait after a trail fade-out before it counts as settled
const TRAIL_SETTLE_SLACK_MS: u32 = 100;

impl<H: StageHal> StageEngine<H> {
    /// One display frame while running
    pub(super) fn on_frame(&mut self, timestamp: f64) {
        let viewport = self.hal.viewport();
        let report = self.mover.step(timestamp, viewport);

        if report.started_moving {
            self.show_trail();
        }
        if report.hand_triggered {
            self.fire_hand();
        }
        if report.reached_bottom {
            self.render();
            self.begin_restart();
            return;
        }

        self.render();
        self.hal.request_frame();
    }

    /// Push the current transform to every visible layer
    pub(super) fn render(&self) {
        let transform = self.mover.transform();
        self.hal.set_transform(Layer::Main, transform);
        if self.trail.is_shown() {
            self.hal.set_transform(Layer::Snow, self.trail_transform());
        }
        if self.hand_visible {
            self.hal.set_transform(Layer::Hand, transform);
        }
    }

    // === Snow trail ===

    /// Request the trail once the mascot moves
    pub(super) fn show_trail(&mut self) {
        let trail = &self.config.snow_trails;
        if !trail.enabled || !trail.show_on_movement {
            return;
        }
        let action = self.trail.show();
        self.apply_trail(action);
    }

    pub(super) fn hide_trail(&mut self) {
        let action = self.trail.hide();
        self.apply_trail(action);
    }

    pub(super) fn on_trail_reveal(&mut self) {
        let allowed = self.phase == Phase::Running && !self.mover.is_paused();
        let action = self.trail.reveal(allowed);
        self.apply_trail(action);
    }

    fn apply_trail(&mut self, action: TrailAction) {
        let trail = &self.config.snow_trails;
        match action {
            TrailAction::None => {}
            TrailAction::ScheduleReveal => {
                self.hal.cancel_timer(TimerKind::TrailSettle);
                self.hal.set_transform(Layer::Snow, self.trail_transform());
                self.hal.schedule(TimerKind::TrailReveal, trail.trail_delay);
            }
            TrailAction::CancelReveal => self.hal.cancel_timer(TimerKind::TrailReveal),
            TrailAction::FadeIn => {
                self.hal.set_transform(Layer::Snow, self.trail_transform());
                self.hal.set_opacity(
                    Layer::Snow,
                    trail.opacity,
                    Some(Fade::ease_in(trail.fade_in_duration)),
                );
            }
            TrailAction::FadeOut => {
                self.hal.set_opacity(
                    Layer::Snow,
                    0.0,
                    Some(Fade::ease_out(trail.fade_out_duration)),
                );
                self.hal.schedule(
                    TimerKind::TrailSettle,
                    trail.fade_out_duration + TRAIL_SETTLE_SLACK_MS,
                );
            }
        }
    }

    // === Hand layer ===

    fn fire_hand(&mut self) {
        let Some(player) = self.players.hand.as_ref() else {
            self.log("hand trigger skipped: no player");
            return;
        };
        self.hal.set_transform(Layer::Hand, self.mover.transform());
        self.hal.set_opacity(Layer::Hand, 1.0, None);
        self.hal.go_to_and_play(player, 0);
        self.hand_visible = true;
        self.log("hand fired");
    }

    // === Pausing ===

    pub(super) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        self.refresh_pause();
    }

    /// Host pause also freezes the players
    ///
    /// Players parked by a restart or a finished stage are left paused.
    pub(super) fn set_held(&mut self, held: bool) {
        if self.held == held {
            return;
        }
        self.held = held;
        if !self.players_parked && !self.phase.is_terminal() {
            for player in self.players.travelling() {
                if held {
                    self.hal.pause(player);
                } else {
                    self.hal.play(player);
                }
            }
        }
        self.refresh_pause();
    }

    fn refresh_pause(&mut self) {
        let paused = self.hovered || self.held;
        if paused == self.mover.is_paused() {
            return;
        }
        self.mover.set_paused(paused);
        if self.phase != Phase::Running {
            return;
        }
        if paused {
            self.hide_trail();
        } else if self.mover.movement_started() {
            self.show_trail();
        }
    }
}
