//! Browser smoke tests (run with `wasm-pack test --headless --chrome`)

#![cfg(target_arch = "wasm32")]

use mascot_web::{boot, MascotController};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_rejects_invalid_config() {
    assert!(MascotController::new(Some(String::from("{ not json"))).is_err());
    assert!(boot(Some(String::from(r#"{ "movement": { "flipDuration": 0 } }"#))).is_none());
}

#[wasm_bindgen_test]
fn test_missing_wrapper_fails_quietly() {
    let controller =
        MascotController::new(Some(String::from(r##"{ "wrapperSelector": "#no-such-wrapper" }"##)))
            .unwrap();
    controller.start();
    let state = controller.state_json().unwrap();
    assert!(state.contains("\"phase\":\"failed\""));
    controller.destroy();
}

#[wasm_bindgen_test]
fn test_start_with_wrapper() {
    let document = web_sys::window().unwrap().document().unwrap();
    let wrapper = document.create_element("div").unwrap();
    wrapper.set_class_name("wrapper");
    document.body().unwrap().append_child(&wrapper).unwrap();

    let controller = boot(None).unwrap();
    let state = controller.state_json().unwrap();
    assert!(state.contains("\"phase\":\"appearing\""));
    assert!(document
        .query_selector("style[data-mascot]")
        .unwrap()
        .is_some());

    controller.destroy();
    let state = controller.state_json().unwrap();
    assert!(state.contains("\"phase\":\"halted\""));
    wrapper.remove();
}
