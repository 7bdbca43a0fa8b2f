//! Bindings to the lottie-web global

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use mascot_hal::{AnimationRequest, HalError};

#[wasm_bindgen]
extern "C" {
    /// Animation instance returned by `lottie.loadAnimation`
    #[derive(Clone, Debug)]
    pub type LottiePlayer;

    #[wasm_bindgen(method)]
    pub fn play(this: &LottiePlayer);

    #[wasm_bindgen(method)]
    pub fn pause(this: &LottiePlayer);

    #[wasm_bindgen(method, js_name = goToAndPlay)]
    pub fn go_to_and_play(this: &LottiePlayer, value: f64, is_frame: bool);

    #[wasm_bindgen(method, js_name = addEventListener)]
    pub fn add_event_listener(this: &LottiePlayer, name: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    pub fn destroy(this: &LottiePlayer);
}

/// `window.lottie`, when the library has been evaluated
pub fn library(window: &Window) -> Option<JsValue> {
    js_sys::Reflect::get(window, &"lottie".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Call `lottie.loadAnimation` for a layer element
pub fn load(
    window: &Window,
    container: &HtmlElement,
    request: &AnimationRequest,
) -> Result<LottiePlayer, HalError> {
    let lottie = library(window).ok_or(HalError::LibraryUnavailable)?;
    let load_fn = js_sys::Reflect::get(&lottie, &"loadAnimation".into())
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or(HalError::LibraryUnavailable)?;

    let params = js_sys::Object::new();
    let entries: [(&str, JsValue); 5] = [
        ("container", JsValue::from(container.clone())),
        ("renderer", JsValue::from_str(&request.renderer)),
        ("loop", JsValue::from_bool(request.looping)),
        ("autoplay", JsValue::from_bool(request.autoplay)),
        ("path", JsValue::from_str(&request.path)),
    ];
    for (key, value) in entries.iter() {
        js_sys::Reflect::set(&params, &JsValue::from_str(key), value)
            .map_err(|_| HalError::AnimationLoadFailed)?;
    }

    load_fn
        .call1(&lottie, &params)
        .map(|player| player.unchecked_into::<LottiePlayer>())
        .map_err(|_| HalError::AnimationLoadFailed)
}
