//! Mock HAL implementation for testing the mascot stage
//!
//! This provides a recorded implementation of the `StageHal` trait so the
//! stage can be driven frame by frame without a browser. Timers and frame
//! requests are only recorded; the test decides when they "fire" and feeds
//! the corresponding event back into the stage.

#![no_std]
extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use mascot_hal::{
    AnimationRequest, Fade, HalError, Layer, LayerSpec, Readiness, StageHal, TimerKind,
    Transform, ViewportSize,
};

/// Player handle handed out by the mock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockPlayer {
    pub id: u32,
    pub layer: Layer,
}

/// Recorded call on a player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCall {
    Play,
    Pause,
    GoToAndPlay(u32),
}

/// Simulated layer element
#[derive(Clone, Debug, PartialEq)]
pub struct MockLayer {
    pub spec: LayerSpec,
    pub mounted: bool,
    pub pinned: Option<(f32, f32)>,
    pub transform: Option<Transform>,
    pub opacity: f32,
    pub last_fade: Option<Fade>,
    pub size: Option<(f32, f32)>,
}

/// Mock HAL for unit testing
pub struct MockHal {
    viewport: Cell<ViewportSize>,
    readiness: Cell<Readiness>,
    /// Make every `load_animation` fail
    fail_loads: Cell<bool>,
    /// Pretend the mount target is absent
    mount_missing: Cell<bool>,
    stylesheet: RefCell<Option<String>>,
    layers: RefCell<BTreeMap<Layer, MockLayer>>,
    mount_order: RefCell<Vec<Layer>>,
    /// Pending timers (kind -> delay in ms)
    timers: RefCell<BTreeMap<TimerKind, u32>>,
    frame_pending: Cell<bool>,
    frame_requests: Cell<u32>,
    frame_cancels: Cell<u32>,
    next_player: Cell<u32>,
    requests: RefCell<Vec<AnimationRequest>>,
    player_calls: RefCell<Vec<(Layer, PlayerCall)>>,
    removed: Cell<bool>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
}

impl MockHal {
    /// Create a mock with a 1920x1080 desktop viewport and a loaded library
    pub fn new() -> Self {
        Self::with_viewport(1920.0, 1080.0)
    }

    /// Create a mock with the given viewport
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Cell::new(ViewportSize::new(width, height)),
            readiness: Cell::new(Readiness::Ready),
            fail_loads: Cell::new(false),
            mount_missing: Cell::new(false),
            stylesheet: RefCell::new(None),
            layers: RefCell::new(BTreeMap::new()),
            mount_order: RefCell::new(Vec::new()),
            timers: RefCell::new(BTreeMap::new()),
            frame_pending: Cell::new(false),
            frame_requests: Cell::new(0),
            frame_cancels: Cell::new(0),
            next_player: Cell::new(1),
            requests: RefCell::new(Vec::new()),
            player_calls: RefCell::new(Vec::new()),
            removed: Cell::new(false),
            debug_log: RefCell::new(Vec::new()),
        }
    }

    // === Scenario setup ===

    pub fn set_viewport(&self, width: f32, height: f32) {
        self.viewport.set(ViewportSize::new(width, height));
    }

    /// Set what `ensure_ready` reports
    pub fn set_readiness(&self, readiness: Readiness) {
        self.readiness.set(readiness);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    pub fn set_mount_missing(&self, missing: bool) {
        self.mount_missing.set(missing);
    }

    // === Timers and frames ===

    /// Delay of a pending timer
    pub fn pending_timer(&self, kind: TimerKind) -> Option<u32> {
        self.timers.borrow().get(&kind).copied()
    }

    /// Remove a pending timer, returning its delay (the test then delivers the event)
    pub fn take_timer(&self, kind: TimerKind) -> Option<u32> {
        self.timers.borrow_mut().remove(&kind)
    }

    /// All pending timer kinds
    pub fn pending_timers(&self) -> Vec<TimerKind> {
        self.timers.borrow().keys().copied().collect()
    }

    /// Whether a frame callback is outstanding
    pub fn frame_pending(&self) -> bool {
        self.frame_pending.get()
    }

    /// Consume the outstanding frame request
    pub fn take_frame_request(&self) -> bool {
        self.frame_pending.replace(false)
    }

    pub fn frame_request_count(&self) -> u32 {
        self.frame_requests.get()
    }

    pub fn frame_cancel_count(&self) -> u32 {
        self.frame_cancels.get()
    }

    // === Layers ===

    pub fn layer(&self, layer: Layer) -> Option<MockLayer> {
        self.layers.borrow().get(&layer).cloned()
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.borrow().contains_key(&layer)
    }

    pub fn transform(&self, layer: Layer) -> Option<Transform> {
        self.layers.borrow().get(&layer).and_then(|l| l.transform)
    }

    pub fn opacity(&self, layer: Layer) -> Option<f32> {
        self.layers.borrow().get(&layer).map(|l| l.opacity)
    }

    /// Layers in the order they were inserted into the page
    pub fn mount_order(&self) -> Vec<Layer> {
        self.mount_order.borrow().clone()
    }

    pub fn stylesheet(&self) -> Option<String> {
        self.stylesheet.borrow().clone()
    }

    pub fn layers_removed(&self) -> bool {
        self.removed.get()
    }

    // === Players ===

    /// Animation requests in the order they were made
    pub fn animation_requests(&self) -> Vec<AnimationRequest> {
        self.requests.borrow().clone()
    }

    /// Calls made on the player of a layer
    pub fn player_calls(&self, layer: Layer) -> Vec<PlayerCall> {
        self.player_calls
            .borrow()
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, call)| *call)
            .collect()
    }

    // === Debug log ===

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }

    fn with_layer(&self, layer: Layer, f: impl FnOnce(&mut MockLayer)) {
        if let Some(l) = self.layers.borrow_mut().get_mut(&layer) {
            f(l);
        }
    }

    fn record(&self, player: &MockPlayer, call: PlayerCall) {
        self.player_calls.borrow_mut().push((player.layer, call));
    }
}

impl Default for MockHal {
    fn default() -> Self {
        Self::new()
    }
}

impl StageHal for MockHal {
    type Player = MockPlayer;

    fn install_stylesheet(&self, css: &str) {
        let mut sheet = self.stylesheet.borrow_mut();
        if sheet.is_none() {
            *sheet = Some(String::from(css));
        }
    }

    fn create_layer(&self, spec: &LayerSpec) -> Result<(), HalError> {
        if self.mount_missing.get() {
            return Err(HalError::MountNotFound);
        }
        self.layers.borrow_mut().insert(
            spec.layer,
            MockLayer {
                spec: spec.clone(),
                mounted: false,
                pinned: None,
                transform: None,
                opacity: 0.0,
                last_fade: None,
                size: None,
            },
        );
        Ok(())
    }

    fn mount_layer(&self, layer: Layer) -> Result<(), HalError> {
        let mut layers = self.layers.borrow_mut();
        let entry = layers.get_mut(&layer).ok_or(HalError::LayerMissing)?;
        entry.mounted = true;
        self.mount_order.borrow_mut().push(layer);
        Ok(())
    }

    fn pin_to_viewport(&self, layer: Layer, left: f32, top: f32) {
        self.with_layer(layer, |l| l.pinned = Some((left, top)));
    }

    fn set_transform(&self, layer: Layer, transform: Transform) {
        self.with_layer(layer, |l| l.transform = Some(transform));
    }

    fn set_opacity(&self, layer: Layer, opacity: f32, fade: Option<Fade>) {
        self.with_layer(layer, |l| {
            l.opacity = opacity;
            l.last_fade = fade;
        });
    }

    fn set_size(&self, layer: Layer, width: f32, height: f32) {
        self.with_layer(layer, |l| l.size = Some((width, height)));
    }

    fn remove_layers(&self) {
        self.layers.borrow_mut().clear();
        self.removed.set(true);
    }

    fn ensure_ready(&self) -> Readiness {
        self.readiness.get()
    }

    fn load_animation(&self, request: &AnimationRequest) -> Result<MockPlayer, HalError> {
        if self.readiness.get() != Readiness::Ready {
            return Err(HalError::LibraryUnavailable);
        }
        if !self.has_layer(request.layer) {
            return Err(HalError::LayerMissing);
        }
        if self.fail_loads.get() {
            return Err(HalError::AnimationLoadFailed);
        }
        self.requests.borrow_mut().push(request.clone());
        let id = self.next_player.get();
        self.next_player.set(id + 1);
        Ok(MockPlayer {
            id,
            layer: request.layer,
        })
    }

    fn play(&self, player: &MockPlayer) {
        self.record(player, PlayerCall::Play);
    }

    fn pause(&self, player: &MockPlayer) {
        self.record(player, PlayerCall::Pause);
    }

    fn go_to_and_play(&self, player: &MockPlayer, frame: u32) {
        self.record(player, PlayerCall::GoToAndPlay(frame));
    }

    fn viewport(&self) -> ViewportSize {
        self.viewport.get()
    }

    fn schedule(&self, timer: TimerKind, delay_ms: u32) {
        self.timers.borrow_mut().insert(timer, delay_ms);
    }

    fn cancel_timer(&self, timer: TimerKind) {
        self.timers.borrow_mut().remove(&timer);
    }

    fn request_frame(&self) {
        self.frame_pending.set(true);
        self.frame_requests.set(self.frame_requests.get() + 1);
    }

    fn cancel_frame(&self) {
        if self.frame_pending.replace(false) {
            self.frame_cancels.set(self.frame_cancels.get() + 1);
        }
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(String::from(msg));
    }
}
