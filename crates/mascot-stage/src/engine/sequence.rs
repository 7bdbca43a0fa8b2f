//! Appearance sequence: layers, library, players and the start of motion

use mascot_hal::{Fade, Layer, Readiness, StageHal, TimerKind};

use super::{LibraryState, Phase, StageEngine};
use crate::config::Sequencing;
use crate::style::{self, PIN_LEFT_PX, PIN_TOP_PX};

impl<H: StageHal> StageEngine<H> {
    /// Install the stylesheet and create the (invisible) layers
    pub(super) fn on_start(&mut self) {
        self.hal.install_stylesheet(&style::stylesheet(&self.config));

        for layer in self.layers() {
            let spec = style::layer_spec(layer, &self.config, &self.profile);
            if let Err(e) = self.hal.create_layer(&spec) {
                self.fail(&format!("cannot create {} layer: {}", layer.label(), e));
                return;
            }
        }

        self.phase = Phase::Appearing;
        self.hal.schedule(
            TimerKind::ContainerAppearance,
            self.config.delays.container_appearance,
        );
        self.log(&format!("started ({:?})", self.profile.class));
    }

    /// Insert the layers into the page and pin them to the viewport
    pub(super) fn on_appear(&mut self) {
        for layer in self.layers() {
            if let Err(e) = self.hal.mount_layer(layer) {
                self.fail(&format!("cannot mount {} layer: {}", layer.label(), e));
                return;
            }
            if self.config.movement.move_in_viewport {
                self.hal.pin_to_viewport(layer, PIN_LEFT_PX, PIN_TOP_PX);
            }
        }

        self.phase = Phase::Mounted;
        self.hal
            .schedule(TimerKind::AnimationStart, self.config.delays.animation_start);
    }

    /// Make sure the library is there and create the players
    pub(super) fn on_animation_start(&mut self) {
        match self.hal.ensure_ready() {
            Readiness::Ready => {
                self.library = LibraryState::Ready;
                self.bind_players();
                self.phase = Phase::Waiting;
            }
            Readiness::Pending => {
                self.library = LibraryState::Pending;
                self.phase = Phase::Loading;
                self.log("waiting for animation library");
            }
            Readiness::Failed => {
                self.library = LibraryState::Failed;
                self.fail("animation library unavailable");
                return;
            }
        }

        if self.config.sequencing == Sequencing::Timed {
            self.schedule_movement();
        }
    }

    pub(super) fn on_library_ready(&mut self) {
        if self.library != LibraryState::Pending {
            return;
        }
        self.library = LibraryState::Ready;
        self.log("animation library loaded");
        self.bind_players();
        if self.phase == Phase::Loading {
            self.phase = Phase::Waiting;
        }
    }

    pub(super) fn on_library_failed(&mut self) {
        if self.library != LibraryState::Pending {
            return;
        }
        self.library = LibraryState::Failed;
        self.fail("animation library failed to load");
    }

    /// First frame of a player rendered
    pub(super) fn on_content_loaded(&mut self, layer: Layer) {
        if layer != Layer::Main || self.phase == Phase::Restarting {
            return;
        }
        self.hal.set_opacity(
            Layer::Main,
            1.0,
            Some(Fade::ease_in(self.config.container_fade_in)),
        );
    }

    /// Main layer finished fading in
    pub(super) fn on_fade_in_finished(&mut self) {
        if self.config.sequencing == Sequencing::FadeDriven {
            self.schedule_movement();
        }
    }

    /// Place the mascot and start the frame loop
    pub(super) fn on_movement_start(&mut self) {
        let viewport = self.hal.viewport();
        self.mover.place(viewport);
        self.hal.set_transform(Layer::Main, self.mover.transform());
        if self.hand_layer_in_use() {
            self.hal.set_transform(Layer::Hand, self.mover.transform());
        }
        self.phase = Phase::Running;
        self.hal.request_frame();
        self.log("movement started");
    }

    fn schedule_movement(&mut self) {
        if !self.config.movement.enabled || self.movement_scheduled {
            return;
        }
        self.movement_scheduled = true;
        self.hal
            .schedule(TimerKind::MovementStart, self.config.movement_delay());
    }

    fn bind_players(&mut self) {
        for layer in self.layers() {
            let Some(request) = self.animation_request(layer) else {
                continue;
            };
            let player = match self.hal.load_animation(&request) {
                Ok(player) => player,
                Err(e) => {
                    self.log(&format!("{} animation not loaded: {}", layer.label(), e));
                    continue;
                }
            };
            match layer {
                Layer::Main => self.players.main = Some(player),
                Layer::Snow => self.players.snow = Some(player),
                Layer::Hand => self.players.hand = Some(player),
            }
        }
    }

    fn hand_layer_in_use(&self) -> bool {
        self.config.hand.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use crate::engine::StageEvent;
    use mascot_hal_mock::MockHal;

    fn fire(engine: &mut StageEngine<MockHal>, kind: TimerKind) {
        assert!(engine.hal().take_timer(kind).is_some(), "{:?} not pending", kind);
        engine.dispatch(StageEvent::Timer(kind));
    }

    #[test]
    fn test_appearance_creates_and_pins_layers() {
        let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
        engine.dispatch(StageEvent::Start);

        let css = engine.hal().stylesheet().unwrap();
        assert!(css.contains(style::MAIN_CLASS));
        assert_eq!(engine.hal().pending_timer(TimerKind::ContainerAppearance), Some(500));
        assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));

        fire(&mut engine, TimerKind::ContainerAppearance);
        assert_eq!(engine.hal().mount_order(), vec![Layer::Snow, Layer::Main]);
        let main = engine.hal().layer(Layer::Main).unwrap();
        assert_eq!(main.pinned, Some((0.0, 70.0)));
        assert_eq!(engine.hal().pending_timer(TimerKind::AnimationStart), Some(500));
    }

    #[test]
    fn test_no_pin_when_not_moving_in_viewport() {
        let mut config = StageConfig::default();
        config.movement.move_in_viewport = false;
        let mut engine = StageEngine::new(MockHal::new(), config);
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        assert_eq!(engine.hal().layer(Layer::Main).unwrap().pinned, None);
    }

    #[test]
    fn test_missing_mount_fails_quietly() {
        let hal = MockHal::new();
        hal.set_mount_missing(true);
        let mut engine = StageEngine::new(hal, StageConfig::default());
        engine.dispatch(StageEvent::Start);
        assert_eq!(engine.phase(), Phase::Failed);
        assert!(engine.hal().pending_timers().is_empty());
        assert!(engine.hal().has_log_containing("cannot create"));
    }

    #[test]
    fn test_players_bound_when_library_ready() {
        let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);

        assert_eq!(engine.phase(), Phase::Waiting);
        assert!(engine.has_player(Layer::Main));
        assert!(engine.has_player(Layer::Snow));
        assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), Some(2300));

        let requests = engine.hal().animation_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.autoplay));
        assert!(requests.iter().all(|r| r.looping == (r.layer == Layer::Snow)));
    }

    #[test]
    fn test_content_loaded_reveals_main() {
        let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);

        engine.dispatch(StageEvent::ContentLoaded(Layer::Snow));
        assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));

        engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
        let main = engine.hal().layer(Layer::Main).unwrap();
        assert_eq!(main.opacity, 1.0);
        assert_eq!(main.last_fade, Some(Fade::ease_in(500)));
    }

    #[test]
    fn test_fade_driven_waits_for_transition_end() {
        let mut config = StageConfig::default();
        config.sequencing = Sequencing::FadeDriven;
        let mut engine = StageEngine::new(MockHal::new(), config);
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);
        assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), None);

        engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
        engine.dispatch(StageEvent::TransitionEnd(Layer::Main));
        assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), Some(2300));

        // A second transition end does not reschedule
        engine.hal().take_timer(TimerKind::MovementStart);
        engine.dispatch(StageEvent::TransitionEnd(Layer::Main));
        assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), None);
    }

    #[test]
    fn test_movement_disabled_never_schedules() {
        let mut config = StageConfig::default();
        config.movement.enabled = false;
        let mut engine = StageEngine::new(MockHal::new(), config);
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);
        assert!(engine.hal().pending_timers().is_empty());
        assert_eq!(engine.phase(), Phase::Waiting);
    }

    #[test]
    fn test_library_failure_after_pending() {
        let hal = MockHal::new();
        hal.set_readiness(Readiness::Pending);
        let mut engine = StageEngine::new(hal, StageConfig::default());
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);
        assert_eq!(engine.phase(), Phase::Loading);
        assert_eq!(engine.library(), LibraryState::Pending);

        engine.dispatch(StageEvent::LibraryFailed);
        assert_eq!(engine.phase(), Phase::Failed);
        assert!(engine.hal().pending_timers().is_empty());
        assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));
    }

    #[test]
    fn test_failed_load_leaves_layer_without_player() {
        let hal = MockHal::new();
        hal.set_fail_loads(true);
        let mut engine = StageEngine::new(hal, StageConfig::default());
        engine.dispatch(StageEvent::Start);
        fire(&mut engine, TimerKind::ContainerAppearance);
        fire(&mut engine, TimerKind::AnimationStart);
        assert!(!engine.has_player(Layer::Main));
        assert!(engine.hal().has_log_containing("main animation not loaded"));
    }
}
