//! Browser HAL implementation
//!
//! Layers are plain `div`s appended to the wrapper element, players come from
//! lottie-web, timers are `setTimeout` handles keyed by [`TimerKind`] and the
//! frame loop is a single `requestAnimationFrame` closure. Every callback
//! posts a [`StageEvent`] to the runtime mailbox.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use mascot_hal::{
    AnimationRequest, Fade, HalError, Layer, LayerSpec, Readiness, StageHal, TimerKind,
    Transform, ViewportSize,
};
use mascot_stage::{StageConfig, StageEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::lottie::{self, LottiePlayer};
use crate::runtime::Mailbox;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

/// Attribute marking the shared stylesheet
const STYLE_MARKER: &str = "data-mascot";

/// DOM listener kept alive until the layers are removed
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, HalError> {
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|_| HalError::DomFailure)?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// HAL backed by the page DOM
pub struct WebHal {
    window: Window,
    document: Document,
    wrapper_selector: String,
    script_url: String,
    mailbox: Mailbox,
    wrapper: RefCell<Option<Element>>,
    layers: RefCell<BTreeMap<Layer, HtmlElement>>,
    listeners: RefCell<Vec<Listener>>,
    /// `DOMLoaded` callbacks of the players
    player_callbacks: RefCell<Vec<Closure<dyn FnMut()>>>,
    players: RefCell<Vec<LottiePlayer>>,
    script_injected: Cell<bool>,
    timer_handles: Rc<RefCell<BTreeMap<TimerKind, i32>>>,
    timer_callbacks: BTreeMap<TimerKind, Closure<dyn FnMut()>>,
    frame_handle: Rc<Cell<Option<i32>>>,
    frame_callback: Closure<dyn FnMut(f64)>,
    resize_listener: Option<Listener>,
}

impl WebHal {
    /// Create the HAL and start listening for viewport resizes
    pub(crate) fn new(config: &StageConfig, mailbox: Mailbox) -> Result<Self, String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let timer_handles: Rc<RefCell<BTreeMap<TimerKind, i32>>> = Rc::default();
        let timer_callbacks = TimerKind::ALL
            .iter()
            .map(|&kind| {
                let handles = timer_handles.clone();
                let mailbox = mailbox.clone();
                let callback = Closure::wrap(Box::new(move || {
                    handles.borrow_mut().remove(&kind);
                    mailbox.post(StageEvent::Timer(kind));
                }) as Box<dyn FnMut()>);
                (kind, callback)
            })
            .collect();

        let frame_handle: Rc<Cell<Option<i32>>> = Rc::default();
        let frame_callback = {
            let handle = frame_handle.clone();
            let mailbox = mailbox.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                handle.set(None);
                mailbox.post(StageEvent::Frame(timestamp));
            }) as Box<dyn FnMut(f64)>)
        };

        let resize_listener = {
            let mailbox = mailbox.clone();
            let win = window.clone();
            let callback = Closure::wrap(Box::new(move |_event: Event| {
                let size = viewport_of(&win);
                mailbox.post(StageEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }) as Box<dyn FnMut(Event)>);
            Listener::attach(&window, "resize", callback)
                .map_err(|e| format!("resize listener: {}", e))?
        };

        Ok(Self {
            window,
            document,
            wrapper_selector: config.wrapper_selector.clone(),
            script_url: config.library.script_url.clone(),
            mailbox,
            wrapper: RefCell::new(None),
            layers: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(Vec::new()),
            player_callbacks: RefCell::new(Vec::new()),
            players: RefCell::new(Vec::new()),
            script_injected: Cell::new(false),
            timer_handles,
            timer_callbacks,
            frame_handle,
            frame_callback,
            resize_listener: Some(resize_listener),
        })
    }

    fn layer_element(&self, layer: Layer) -> Option<HtmlElement> {
        self.layers.borrow().get(&layer).cloned()
    }

    fn set_style(&self, layer: Layer, property: &str, value: &str) {
        if let Some(element) = self.layer_element(layer) {
            if element.style().set_property(property, value).is_err() {
                log(&format!("[mascot-web] cannot set {} on {} layer", property, layer.label()));
            }
        }
    }

    /// Resolve the wrapper once and make it a positioning context
    fn wrapper(&self) -> Result<Element, HalError> {
        if let Some(wrapper) = self.wrapper.borrow().as_ref() {
            return Ok(wrapper.clone());
        }
        let wrapper = self
            .document
            .query_selector(&self.wrapper_selector)
            .ok()
            .flatten()
            .ok_or(HalError::MountNotFound)?;

        let is_static = self
            .window
            .get_computed_style(&wrapper)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("position").ok())
            .map_or(false, |position| position == "static");
        if is_static {
            if let Some(element) = wrapper.dyn_ref::<HtmlElement>() {
                let _ = element.style().set_property("position", "relative");
            }
        }

        *self.wrapper.borrow_mut() = Some(wrapper.clone());
        Ok(wrapper)
    }

    /// Post `event` whenever `kind` fires on the layer
    fn listen(&self, element: &HtmlElement, kind: &'static str, event: StageEvent) -> Result<(), HalError> {
        let mailbox = self.mailbox.clone();
        let callback = Closure::wrap(Box::new(move |_event: Event| {
            mailbox.post(event);
        }) as Box<dyn FnMut(Event)>);
        let listener = Listener::attach(element, kind, callback)?;
        self.listeners.borrow_mut().push(listener);
        Ok(())
    }

    /// Inject the lottie-web script and report its outcome asynchronously
    fn inject_script(&self) -> Readiness {
        let Some(head) = self.document.head() else {
            log("[mascot-web] no <head> to load the animation library into");
            return Readiness::Failed;
        };
        let script = match self
            .document
            .create_element("script")
            .ok()
            .and_then(|e| e.dyn_into::<web_sys::HtmlScriptElement>().ok())
        {
            Some(script) => script,
            None => return Readiness::Failed,
        };
        script.set_src(&self.script_url);

        let loaded = js_sys::Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        if head.append_child(&script).is_err() {
            return Readiness::Failed;
        }
        self.script_injected.set(true);

        let mailbox = self.mailbox.clone();
        let url = self.script_url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(loaded).await {
                Ok(_) => mailbox.post(StageEvent::LibraryReady),
                Err(_) => {
                    log(&format!("[mascot-web] failed to load {}", url));
                    mailbox.post(StageEvent::LibraryFailed);
                }
            }
        });
        Readiness::Pending
    }

    fn clear_timers(&self) {
        let handles = std::mem::take(&mut *self.timer_handles.borrow_mut());
        for handle in handles.into_values() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

impl StageHal for WebHal {
    type Player = LottiePlayer;

    fn install_stylesheet(&self, css: &str) {
        let selector = format!("style[{}]", STYLE_MARKER);
        if let Ok(Some(_)) = self.document.query_selector(&selector) {
            return;
        }
        let (Some(head), Ok(style)) = (self.document.head(), self.document.create_element("style"))
        else {
            log("[mascot-web] cannot install stylesheet");
            return;
        };
        let _ = style.set_attribute(STYLE_MARKER, "");
        style.set_text_content(Some(css));
        if head.append_child(&style).is_err() {
            log("[mascot-web] cannot install stylesheet");
        }
    }

    fn create_layer(&self, spec: &LayerSpec) -> Result<(), HalError> {
        self.wrapper()?;
        let element = self
            .document
            .create_element("div")
            .map_err(|_| HalError::DomFailure)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HalError::DomFailure)?;
        element.set_class_name(spec.class_name);
        let style = element.style();
        for (property, value) in &spec.declarations {
            style
                .set_property(property, value)
                .map_err(|_| HalError::DomFailure)?;
        }

        self.listen(&element, "transitionend", StageEvent::TransitionEnd(spec.layer))?;
        if spec.layer == Layer::Main {
            self.listen(&element, "mouseenter", StageEvent::PointerEnter)?;
            self.listen(&element, "mouseleave", StageEvent::PointerLeave)?;
        }

        self.layers.borrow_mut().insert(spec.layer, element);
        Ok(())
    }

    fn mount_layer(&self, layer: Layer) -> Result<(), HalError> {
        let wrapper = self.wrapper()?;
        let element = self.layer_element(layer).ok_or(HalError::LayerMissing)?;
        wrapper
            .append_child(&element)
            .map(|_| ())
            .map_err(|_| HalError::DomFailure)
    }

    fn pin_to_viewport(&self, layer: Layer, left: f32, top: f32) {
        self.set_style(layer, "position", "fixed");
        self.set_style(layer, "left", &format!("{}px", left));
        self.set_style(layer, "top", &format!("{}px", top));
    }

    fn set_transform(&self, layer: Layer, transform: Transform) {
        self.set_style(layer, "transform", &transform.to_string());
    }

    fn set_opacity(&self, layer: Layer, opacity: f32, fade: Option<Fade>) {
        if let Some(fade) = fade {
            self.set_style(layer, "transition", &fade.to_string());
        }
        self.set_style(layer, "opacity", &opacity.to_string());
    }

    fn set_size(&self, layer: Layer, width: f32, height: f32) {
        self.set_style(layer, "width", &format!("{}px", width));
        self.set_style(layer, "height", &format!("{}px", height));
    }

    fn remove_layers(&self) {
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
        for player in self.players.borrow_mut().drain(..) {
            player.destroy();
        }
        self.player_callbacks.borrow_mut().clear();
        for (_, element) in std::mem::take(&mut *self.layers.borrow_mut()) {
            element.remove();
        }
    }

    fn ensure_ready(&self) -> Readiness {
        if lottie::library(&self.window).is_some() {
            Readiness::Ready
        } else if self.script_injected.get() {
            Readiness::Pending
        } else {
            self.inject_script()
        }
    }

    fn load_animation(&self, request: &AnimationRequest) -> Result<LottiePlayer, HalError> {
        let element = self
            .layer_element(request.layer)
            .ok_or(HalError::LayerMissing)?;
        let player = lottie::load(&self.window, &element, request)?;

        let mailbox = self.mailbox.clone();
        let layer = request.layer;
        let on_loaded = Closure::wrap(Box::new(move || {
            mailbox.post(StageEvent::ContentLoaded(layer));
        }) as Box<dyn FnMut()>);
        player.add_event_listener("DOMLoaded", on_loaded.as_ref().unchecked_ref());
        self.player_callbacks.borrow_mut().push(on_loaded);
        self.players.borrow_mut().push(player.clone());
        Ok(player)
    }

    fn play(&self, player: &LottiePlayer) {
        player.play();
    }

    fn pause(&self, player: &LottiePlayer) {
        player.pause();
    }

    fn go_to_and_play(&self, player: &LottiePlayer, frame: u32) {
        player.go_to_and_play(f64::from(frame), true);
    }

    fn viewport(&self) -> ViewportSize {
        viewport_of(&self.window)
    }

    fn schedule(&self, timer: TimerKind, delay_ms: u32) {
        self.cancel_timer(timer);
        let Some(callback) = self.timer_callbacks.get(&timer) else {
            return;
        };
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(handle) => {
                self.timer_handles.borrow_mut().insert(timer, handle);
            }
            Err(_) => log(&format!("[mascot-web] cannot schedule {:?}", timer)),
        }
    }

    fn cancel_timer(&self, timer: TimerKind) {
        let handle = self.timer_handles.borrow_mut().remove(&timer);
        if let Some(handle) = handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn request_frame(&self) {
        if self.frame_handle.get().is_some() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame_handle.set(Some(handle)),
            Err(_) => log("[mascot-web] requestAnimationFrame failed"),
        }
    }

    fn cancel_frame(&self) {
        if let Some(handle) = self.frame_handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }
}

impl Drop for WebHal {
    fn drop(&mut self) {
        // Callbacks must not fire into freed closures
        self.cancel_frame();
        self.clear_timers();
        if let Some(listener) = self.resize_listener.take() {
            listener.detach();
        }
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
        for player in self.players.borrow_mut().drain(..) {
            player.destroy();
        }
    }
}

fn viewport_of(window: &Window) -> ViewportSize {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    ViewportSize::new(
        read(window.inner_width()) as f32,
        read(window.inner_height()) as f32,
    )
}
