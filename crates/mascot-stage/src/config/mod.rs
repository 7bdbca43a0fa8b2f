//! Stage configuration
//!
//! One immutable record of sizes, speeds, delays, feature flags and asset
//! paths. Field names are camelCase on the wire so a host page can hand over
//! the same JSON object it would give a plain script. Every field has a
//! default; a partial document only overrides what it names.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};

use crate::math::Size;

/// Per-device-class values
///
/// `tablet` is optional; a missing tablet entry falls back to `desktop`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceTable<T> {
    pub desktop: T,
    pub mobile: T,
    #[serde(default)]
    pub tablet: Option<T>,
}

impl<T> DeviceTable<T> {
    /// Table without a tablet bucket
    pub fn new(desktop: T, mobile: T) -> Self {
        Self {
            desktop,
            mobile,
            tablet: None,
        }
    }

    /// Add a tablet bucket
    pub fn with_tablet(mut self, tablet: T) -> Self {
        self.tablet = Some(tablet);
        self
    }
}

/// Movement speeds in pixels per second
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Speeds {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Speeds {
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Horizontal start corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalStart {
    #[default]
    Left,
    Right,
}

/// Vertical start edge (the mascot always starts at the top)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalStart {
    #[default]
    Top,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartPosition {
    pub x: HorizontalStart,
    pub y: VerticalStart,
}

/// What happens at the top and bottom of the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalPolicy {
    /// Reverse at the top and bottom, or restart at the bottom when
    /// `restartOnBottom` is set
    #[default]
    Bounce,
    /// Fire the hand layer near the bottom, restart when the bottom is crossed
    Trigger,
}

/// How the stage gets from "players created" to "moving"
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sequencing {
    /// Fixed delay after the players are requested
    #[default]
    Timed,
    /// Wait for the main layer's fade-in transition to end, then the delay
    FadeDriven,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnowTrailConfig {
    pub enabled: bool,
    pub lottie_path: String,
    pub size: DeviceTable<Size>,
    pub opacity: f32,
    pub z_index: String,
    pub show_on_movement: bool,
    pub fade_in_duration: u32,
    pub fade_out_duration: u32,
    pub trail_delay: u32,
    /// Mirror the trail together with the mascot
    pub reflect_with_main: bool,
}

impl Default for SnowTrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lottie_path: String::from(
                "https://storage.yandexcloud.net/external-assets/tantum/animations/lottie/snow.json",
            ),
            size: default_sizes(),
            opacity: 1.0,
            z_index: String::from("1001"),
            show_on_movement: true,
            fade_in_duration: 500,
            fade_out_duration: 1000,
            trail_delay: 300,
            reflect_with_main: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementConfig {
    pub enabled: bool,
    pub speeds: DeviceTable<Speeds>,
    pub move_in_viewport: bool,
    pub start_delay: u32,
    pub start_position: StartPosition,
    pub bounce_at_edges: bool,
    /// Accepted for compatibility; motion uses `edge_overflow`
    pub edge_margin: f32,
    /// How far past the left/right edge the mascot travels before turning
    pub edge_overflow: f32,
    pub flip_animation: bool,
    pub flip_duration: u32,
    pub flip_cooldown: u32,
    pub pause_on_hover: bool,
    /// Stop for good after the first restart instead of resuming
    pub one_time: bool,
    pub restart_on_bottom: bool,
    pub restart_delay: u32,
    pub restart_fade_out: u32,
    pub restart_fade_in: u32,
    pub bottom_threshold: f32,
    pub vertical_policy: VerticalPolicy,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speeds: DeviceTable::new(Speeds::new(230.0, 50.0), Speeds::new(100.0, 50.0)),
            move_in_viewport: true,
            start_delay: 1000,
            start_position: StartPosition::default(),
            bounce_at_edges: true,
            edge_margin: 0.0,
            edge_overflow: 65.0,
            flip_animation: true,
            flip_duration: 300,
            flip_cooldown: 300,
            pause_on_hover: true,
            one_time: false,
            restart_on_bottom: true,
            restart_delay: 10_000,
            restart_fade_out: 1000,
            restart_fade_in: 800,
            bottom_threshold: 10.0,
            vertical_policy: VerticalPolicy::Bounce,
        }
    }
}

/// Optional one-shot secondary layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandConfig {
    pub lottie_path: String,
    pub size: DeviceTable<Size>,
    /// Distance from the bottom edge (px) at which the hand fires
    pub trigger_distance: f32,
    pub z_index: String,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            lottie_path: String::new(),
            size: default_sizes(),
            trigger_distance: 120.0,
            z_index: String::from("1002"),
        }
    }
}

/// Sequencing delays in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Delays {
    pub container_appearance: u32,
    pub animation_start: u32,
    /// Zero falls back to `movement.startDelay`
    pub movement_start: u32,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            container_appearance: 500,
            animation_start: 500,
            movement_start: 2300,
        }
    }
}

/// Where the rendering library comes from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryConfig {
    pub script_url: String,
    pub renderer: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            script_url: String::from(
                "https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js",
            ),
            renderer: String::from("svg"),
        }
    }
}

/// Extra inline styles for the main layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationStyles {
    pub pointer_events: String,
    pub z_index: String,
    pub transform_origin: String,
    pub will_change: String,
}

impl Default for AnimationStyles {
    fn default() -> Self {
        Self {
            pointer_events: String::from("none"),
            z_index: String::from("1001"),
            transform_origin: String::from("center center"),
            will_change: String::from("transform"),
        }
    }
}

/// Complete stage configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageConfig {
    pub wrapper_selector: String,
    pub animation_path: String,
    pub animation_size: DeviceTable<Size>,
    pub snow_trails: SnowTrailConfig,
    pub movement: MovementConfig,
    pub hand: Option<HandConfig>,
    pub delays: Delays,
    pub sequencing: Sequencing,
    /// Main layer fade-in when its first frame has rendered
    pub container_fade_in: u32,
    pub library: LibraryConfig,
    pub animation_styles: AnimationStyles,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            wrapper_selector: String::from(".wrapper"),
            animation_path: String::from("sani.json"),
            animation_size: default_sizes(),
            snow_trails: SnowTrailConfig::default(),
            movement: MovementConfig::default(),
            hand: None,
            delays: Delays::default(),
            sequencing: Sequencing::Timed,
            container_fade_in: 500,
            library: LibraryConfig::default(),
            animation_styles: AnimationStyles::default(),
        }
    }
}

fn default_sizes() -> DeviceTable<Size> {
    DeviceTable::new(Size::new(456.0, 344.0), Size::new(292.0, 208.0))
}

impl StageConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Delay between the players being requested and motion starting
    pub fn movement_delay(&self) -> u32 {
        if self.delays.movement_start > 0 {
            self.delays.movement_start
        } else {
            self.movement.start_delay
        }
    }

    /// Reject values the stage cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_sizes("animationSize", &self.animation_size)?;
        check_sizes("snowTrails.size", &self.snow_trails.size)?;

        let speeds = &self.movement.speeds;
        for s in [Some(&speeds.desktop), Some(&speeds.mobile), speeds.tablet.as_ref()]
            .into_iter()
            .flatten()
        {
            if !is_non_negative(s.horizontal) || !is_non_negative(s.vertical) {
                return Err(ConfigError::Invalid {
                    field: "movement.speeds",
                    reason: "speeds must be finite and non-negative",
                });
            }
        }

        if self.movement.flip_duration == 0 {
            return Err(ConfigError::Invalid {
                field: "movement.flipDuration",
                reason: "must be greater than zero",
            });
        }
        if !is_non_negative(self.movement.edge_overflow) {
            return Err(ConfigError::Invalid {
                field: "movement.edgeOverflow",
                reason: "must be finite and non-negative",
            });
        }
        if !is_non_negative(self.movement.bottom_threshold) {
            return Err(ConfigError::Invalid {
                field: "movement.bottomThreshold",
                reason: "must be finite and non-negative",
            });
        }
        // A zero-length transition never reports its end
        if self.sequencing == Sequencing::FadeDriven && self.container_fade_in == 0 {
            return Err(ConfigError::Invalid {
                field: "containerFadeIn",
                reason: "fade-driven sequencing needs a non-zero fade",
            });
        }
        if !(0.0..=1.0).contains(&self.snow_trails.opacity) {
            return Err(ConfigError::Invalid {
                field: "snowTrails.opacity",
                reason: "must be between 0 and 1",
            });
        }

        if let Some(hand) = &self.hand {
            if hand.lottie_path.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "hand.lottiePath",
                    reason: "must not be empty",
                });
            }
            if !is_non_negative(hand.trigger_distance) {
                return Err(ConfigError::Invalid {
                    field: "hand.triggerDistance",
                    reason: "must be finite and non-negative",
                });
            }
            check_sizes("hand.size", &hand.size)?;
        }

        Ok(())
    }
}

fn is_non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn check_sizes(field: &'static str, table: &DeviceTable<Size>) -> Result<(), ConfigError> {
    let valid = [Some(&table.desktop), Some(&table.mobile), table.tablet.as_ref()]
        .into_iter()
        .flatten()
        .all(|s| s.width.is_finite() && s.height.is_finite() && !s.is_empty());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "sizes must be finite and positive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wrapper_selector, ".wrapper");
        assert!((config.movement.edge_overflow - 65.0).abs() < 0.001);
        assert_eq!(config.movement_delay(), 2300);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = StageConfig::from_json(
            r#"{ "movement": { "edgeOverflow": 40, "startPosition": { "x": "right" } } }"#,
        )
        .unwrap();

        assert!((config.movement.edge_overflow - 40.0).abs() < 0.001);
        assert_eq!(config.movement.start_position.x, HorizontalStart::Right);
        // Untouched fields keep their defaults
        assert!((config.movement.speeds.desktop.horizontal - 230.0).abs() < 0.001);
        assert_eq!(config.snow_trails.trail_delay, 300);
    }

    #[test]
    fn test_tablet_bucket_from_json() {
        let config = StageConfig::from_json(
            r#"{ "animationSize": {
                    "desktop": { "width": 456, "height": 344 },
                    "mobile": { "width": 292, "height": 208 },
                    "tablet": { "width": 380, "height": 280 } } }"#,
        )
        .unwrap();
        let tablet = config.animation_size.tablet.unwrap();
        assert!((tablet.width - 380.0).abs() < 0.001);
    }

    #[test]
    fn test_policy_and_sequencing_names() {
        let config = StageConfig::from_json(
            r#"{ "sequencing": "fadeDriven", "movement": { "verticalPolicy": "trigger" } }"#,
        )
        .unwrap();
        assert_eq!(config.sequencing, Sequencing::FadeDriven);
        assert_eq!(config.movement.vertical_policy, VerticalPolicy::Trigger);
    }

    #[test]
    fn test_movement_delay_fallback() {
        let config = StageConfig::from_json(r#"{ "delays": { "movementStart": 0 } }"#).unwrap();
        assert_eq!(config.movement_delay(), 1000);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = StageConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = StageConfig::from_json(
            r#"{ "movement": { "speeds": {
                    "desktop": { "horizontal": -1, "vertical": 50 },
                    "mobile": { "horizontal": 100, "vertical": 50 } } } }"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "movement.speeds",
                reason: "speeds must be finite and non-negative",
            }
        );
    }

    #[test]
    fn test_rejects_zero_flip_duration() {
        let err = StageConfig::from_json(r#"{ "movement": { "flipDuration": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("flipDuration"));
    }

    #[test]
    fn test_fade_driven_needs_fade_in() {
        let err = StageConfig::from_json(r#"{ "sequencing": "fadeDriven", "containerFadeIn": 0 }"#)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "containerFadeIn",
                reason: "fade-driven sequencing needs a non-zero fade",
            }
        );

        // Timed sequencing does not wait for the fade
        let config = StageConfig::from_json(r#"{ "containerFadeIn": 0 }"#).unwrap();
        assert_eq!(config.container_fade_in, 0);
    }

    #[test]
    fn test_hand_requires_path() {
        let err = StageConfig::from_json(r#"{ "hand": { "triggerDistance": 80 } }"#).unwrap_err();
        assert!(err.to_string().contains("hand.lottiePath"));

        let config =
            StageConfig::from_json(r#"{ "hand": { "lottiePath": "hand.json" } }"#).unwrap();
        assert_eq!(config.hand.unwrap().z_index, "1002");
    }
}
