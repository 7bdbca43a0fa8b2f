//! Bottom restart, resize and teardown

use mascot_hal::{Fade, Layer, StageHal, TimerKind};

use super::{Phase, StageEngine};
use crate::device;

impl<H: StageHal> StageEngine<H> {
    /// Mascot reached the bottom: fade out and wait
    pub(super) fn begin_restart(&mut self) {
        self.phase = Phase::Restarting;
        self.hal.cancel_frame();
        self.hide_trail();

        let movement = &self.config.movement;
        let fade_out = Fade::ease_out(movement.restart_fade_out);
        self.hal.set_opacity(Layer::Main, 0.0, Some(fade_out));
        if self.hand_visible {
            self.hal.set_opacity(Layer::Hand, 0.0, Some(fade_out));
            self.hand_visible = false;
        }
        for player in self.players.all() {
            self.hal.pause(player);
        }
        self.players_parked = true;

        if movement.one_time {
            self.phase = Phase::Halted;
            self.log("bottom reached, halted");
            return;
        }
        self.hal
            .schedule(TimerKind::RestartResume, movement.restart_delay);
        self.log("bottom reached, restarting");
    }

    /// Put the mascot back at its start corner and fade it in
    pub(super) fn on_restart_resume(&mut self) {
        self.mover.reset_to_initial();
        self.trail.reset();
        self.hal.cancel_timer(TimerKind::TrailSettle);

        self.hal.set_transform(Layer::Main, self.mover.transform());
        self.hal.set_opacity(
            Layer::Main,
            1.0,
            Some(Fade::ease_in(self.config.movement.restart_fade_in)),
        );
        for player in self.players.travelling() {
            self.hal.go_to_and_play(player, 0);
            if self.held {
                self.hal.pause(player);
            }
        }
        self.players_parked = false;
        self.hal
            .schedule(TimerKind::RestartMove, self.config.movement_delay());
    }

    pub(super) fn on_restart_move(&mut self) {
        self.mover.resume();
        self.phase = Phase::Running;
        self.hal.request_frame();
        self.log("restart complete");
    }

    /// Re-resolve sizes and speeds when the viewport width changes
    ///
    /// A restart in progress is left alone; the new sizes apply once it
    /// resumes.
    pub(super) fn on_resize(&mut self, width: f32, height: f32) {
        if (width - self.viewport_width).abs() < f32::EPSILON {
            return;
        }
        self.viewport_width = width;
        self.profile = device::resolve(&self.config, width);
        self.mover
            .apply_resize(self.profile.size, self.profile.speeds);

        if self.phase != Phase::Created {
            let size = self.profile.size;
            self.hal.set_size(Layer::Main, size.width, size.height);
            if self.config.snow_trails.enabled {
                let snow = self.profile.snow_size;
                self.hal.set_size(Layer::Snow, snow.width, snow.height);
            }
            if let Some(hand) = self.profile.hand_size {
                self.hal.set_size(Layer::Hand, hand.width, hand.height);
            }
        }

        if self.phase == Phase::Running {
            self.hal.cancel_frame();
            self.hal.request_frame();
        }
        self.log(&format!(
            "resized to {}x{} ({:?})",
            width, height, self.profile.class
        ));
    }

    /// Stop everything and remove the layers
    pub(super) fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.hal.cancel_frame();
        for kind in TimerKind::ALL {
            self.hal.cancel_timer(kind);
        }
        for player in self.players.all() {
            self.hal.pause(player);
        }
        self.players.main = None;
        self.players.snow = None;
        self.players.hand = None;
        self.hal.remove_layers();
        self.destroyed = true;
        self.phase = Phase::Halted;
        self.log("destroyed");
    }
}
