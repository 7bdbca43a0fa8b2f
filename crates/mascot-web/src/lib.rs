//! Browser host for the floating page mascot
//!
//! This crate binds [`mascot_stage::StageEngine`] to a real page.
//!
//! ## Module Structure
//!
//! - `hal` - `StageHal` over web-sys (layers, timers, frames, listeners)
//! - `lottie` - lottie-web bindings
//! - `runtime` - Event mailbox feeding the engine
//!
//! ## Usage
//!
//! ```js
//! import init, { boot } from "./pkg/mascot_web.js";
//! await init();
//! boot(JSON.stringify({ animationPath: "sani.json" }));
//! ```

mod hal;
mod lottie;
mod runtime;

use std::rc::Rc;

use mascot_stage::{StageConfig, StageEvent};
use wasm_bindgen::prelude::*;

use crate::hal::log;
use crate::runtime::Runtime;

/// One mascot on the page
///
/// Nothing is shown until [`MascotController::start`].
#[wasm_bindgen]
pub struct MascotController {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl MascotController {
    /// Create a controller from an optional JSON configuration
    ///
    /// Missing keys take their defaults. Invalid JSON or values are the only
    /// errors reported to the caller.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MascotController, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                StageConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            _ => StageConfig::default(),
        };
        let runtime = Runtime::new(config).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self { runtime })
    }

    /// Begin the appearance sequence
    #[wasm_bindgen]
    pub fn start(&self) {
        self.runtime.post(StageEvent::Start);
    }

    /// Freeze motion and the players
    #[wasm_bindgen]
    pub fn pause(&self) {
        self.runtime.post(StageEvent::Pause);
    }

    #[wasm_bindgen]
    pub fn resume(&self) {
        self.runtime.post(StageEvent::Resume);
    }

    /// Current stage state as JSON
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsValue> {
        self.runtime
            .with_engine(|engine| serde_json::to_string(&engine.snapshot()))
            .ok_or_else(|| JsValue::from_str("stage is busy"))?
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Stop everything and remove the layers from the page
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.runtime.post(StageEvent::Destroy);
    }
}

/// Create and start a mascot, logging instead of throwing on bad input
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Option<MascotController> {
    match MascotController::new(config_json) {
        Ok(controller) => {
            controller.start();
            Some(controller)
        }
        Err(e) => {
            log(&format!("[mascot-web] boot aborted: {:?}", e));
            None
        }
    }
}
