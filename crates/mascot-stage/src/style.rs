//! Stylesheet fragment and initial inline styles for the layers

use std::fmt::Write;

use mascot_hal::{Fade, Layer, LayerSpec};

use crate::config::StageConfig;
use crate::device::{Profile, MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
use crate::math::Size;

pub const MAIN_CLASS: &str = "lottie-mascot-main";
pub const SNOW_CLASS: &str = "snow-trails-container";
pub const HAND_CLASS: &str = "lottie-mascot-hand";

/// Offset of viewport-pinned layers
pub const PIN_LEFT_PX: f32 = 0.0;
pub const PIN_TOP_PX: f32 = 70.0;

pub fn class_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Main => MAIN_CLASS,
        Layer::Snow => SNOW_CLASS,
        Layer::Hand => HAND_CLASS,
    }
}

/// Pointer events of the main layer
///
/// Hover pausing needs the layer to receive pointer events.
fn main_pointer_events(config: &StageConfig) -> String {
    if config.movement.pause_on_hover {
        String::from("auto")
    } else {
        config.animation_styles.pointer_events.clone()
    }
}

/// Shared stylesheet installed once per page
pub fn stylesheet(config: &StageConfig) -> String {
    let styles = &config.animation_styles;
    let mut css = String::new();

    let _ = writeln!(
        css,
        ".{MAIN_CLASS}, .{SNOW_CLASS}, .{HAND_CLASS} {{ position: fixed; transform-origin: {}; will-change: {}; }}",
        styles.transform_origin, styles.will_change
    );
    let _ = writeln!(
        css,
        ".{MAIN_CLASS} {{ z-index: {}; pointer-events: {}; }}",
        styles.z_index,
        main_pointer_events(config)
    );
    let _ = writeln!(
        css,
        ".{SNOW_CLASS} {{ z-index: {}; pointer-events: none; }}",
        config.snow_trails.z_index
    );
    if let Some(hand) = &config.hand {
        let _ = writeln!(
            css,
            ".{HAND_CLASS} {{ z-index: {}; pointer-events: none; }}",
            hand.z_index
        );
    }

    let mobile = config.animation_size.mobile;
    let snow_mobile = config.snow_trails.size.mobile;
    let _ = writeln!(
        css,
        "@media (max-width: {}px) {{ {} {} }}",
        MOBILE_MAX_WIDTH,
        size_rule(MAIN_CLASS, mobile),
        size_rule(SNOW_CLASS, snow_mobile)
    );

    if let Some(tablet) = config.animation_size.tablet {
        let snow_tablet = config.snow_trails.size.tablet.unwrap_or(config.snow_trails.size.desktop);
        let _ = writeln!(
            css,
            "@media (min-width: {}px) and (max-width: {}px) {{ {} {} }}",
            MOBILE_MAX_WIDTH + 1.0,
            TABLET_MAX_WIDTH,
            size_rule(MAIN_CLASS, tablet),
            size_rule(SNOW_CLASS, snow_tablet)
        );
    }

    css
}

fn size_rule(class: &str, size: Size) -> String {
    format!(
        ".{} {{ width: {}px; height: {}px; }}",
        class, size.width, size.height
    )
}

fn px(v: f32) -> String {
    format!("{}px", v)
}

/// Inline style of a freshly created layer (invisible until revealed)
pub fn layer_spec(layer: Layer, config: &StageConfig, profile: &Profile) -> LayerSpec {
    let (size, z_index, pointer_events, fade) = match layer {
        Layer::Main => (
            profile.size,
            config.animation_styles.z_index.clone(),
            main_pointer_events(config),
            Fade::ease_in(config.container_fade_in),
        ),
        Layer::Snow => (
            profile.snow_size,
            config.snow_trails.z_index.clone(),
            String::from("none"),
            Fade::ease_in(config.snow_trails.fade_in_duration),
        ),
        Layer::Hand => (
            profile.hand_size.unwrap_or(profile.size),
            config
                .hand
                .as_ref()
                .map(|h| h.z_index.clone())
                .unwrap_or_else(|| config.animation_styles.z_index.clone()),
            String::from("none"),
            Fade::ease_in(config.container_fade_in),
        ),
    };

    let mut declarations = vec![
        ("position", String::from("fixed")),
        ("width", px(size.width)),
        ("height", px(size.height)),
        ("opacity", String::from("0")),
        ("transition", fade.to_string()),
        ("pointer-events", pointer_events),
        ("z-index", z_index),
        (
            "transform-origin",
            config.animation_styles.transform_origin.clone(),
        ),
    ];
    match layer {
        Layer::Main => declarations.push(("will-change", config.animation_styles.will_change.clone())),
        Layer::Snow | Layer::Hand => declarations.push(("display", String::from("block"))),
    }

    LayerSpec {
        layer,
        class_name: class_name(layer),
        declarations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::resolve;

    fn value<'a>(spec: &'a LayerSpec, prop: &str) -> Option<&'a str> {
        spec.declarations
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_main_layer_spec() {
        let config = StageConfig::default();
        let profile = resolve(&config, 1280.0);
        let spec = layer_spec(Layer::Main, &config, &profile);

        assert_eq!(spec.class_name, MAIN_CLASS);
        assert_eq!(value(&spec, "width"), Some("456px"));
        assert_eq!(value(&spec, "height"), Some("344px"));
        assert_eq!(value(&spec, "opacity"), Some("0"));
        assert_eq!(value(&spec, "transition"), Some("opacity 500ms ease-in"));
        assert_eq!(value(&spec, "position"), Some("fixed"));
        // Hover pausing is on by default
        assert_eq!(value(&spec, "pointer-events"), Some("auto"));
    }

    #[test]
    fn test_pointer_events_without_hover_pause() {
        let mut config = StageConfig::default();
        config.movement.pause_on_hover = false;
        let profile = resolve(&config, 1280.0);
        let spec = layer_spec(Layer::Main, &config, &profile);
        assert_eq!(value(&spec, "pointer-events"), Some("none"));
    }

    #[test]
    fn test_snow_layer_spec_mobile() {
        let config = StageConfig::default();
        let profile = resolve(&config, 375.0);
        let spec = layer_spec(Layer::Snow, &config, &profile);

        assert_eq!(spec.class_name, SNOW_CLASS);
        assert_eq!(value(&spec, "width"), Some("292px"));
        assert_eq!(value(&spec, "display"), Some("block"));
        assert_eq!(value(&spec, "pointer-events"), Some("none"));
    }

    #[test]
    fn test_stylesheet_breakpoints() {
        let mut config = StageConfig::default();
        let css = stylesheet(&config);
        assert!(css.contains("@media (max-width: 768px)"));
        assert!(css.contains(".lottie-mascot-main { width: 292px; height: 208px; }"));
        assert!(!css.contains("min-width: 769px"));

        config.animation_size = config.animation_size.with_tablet(Size::new(380.0, 280.0));
        let css = stylesheet(&config);
        assert!(css.contains("@media (min-width: 769px) and (max-width: 1024px)"));
        assert!(css.contains("width: 380px; height: 280px;"));
    }
}
