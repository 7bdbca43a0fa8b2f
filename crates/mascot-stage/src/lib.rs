//! Floating page mascot: motion, sequencing and styling core
//!
//! This crate decides everything about the mascot without touching a page:
//! - Device classification and per-device sizes and speeds
//! - Edge-to-edge motion with mirror flips and a bottom restart
//! - The snow trail that follows the mascot while it moves
//! - The appearance sequence (layers, library, players, motion)
//! - The stylesheet and inline styles of the layers
//!
//! ## Architecture
//!
//! - [`config`]: Stage configuration and validation
//! - [`device`]: Device buckets and resolved profiles
//! - [`math`]: Geometry types (`Vec2`, `Size`, `Span`)
//! - [`motion`]: The per-frame motion state machine
//! - [`trail`]: Snow trail visibility
//! - [`transition`]: Eased flip transition
//! - [`style`]: Stylesheet and layer specs
//!
//! [`StageEngine`] ties them together. It owns a [`mascot_hal::StageHal`]
//! and is driven entirely by [`StageEvent`]s, so the same engine runs in a
//! browser and under the mock HAL in tests.
//!
//! ## Example
//!
//! ```rust
//! use mascot_hal::TimerKind;
//! use mascot_hal_mock::MockHal;
//! use mascot_stage::{Phase, StageConfig, StageEngine, StageEvent};
//!
//! let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
//! engine.dispatch(StageEvent::Start);
//! assert_eq!(engine.phase(), Phase::Appearing);
//! assert_eq!(engine.hal().pending_timer(TimerKind::ContainerAppearance), Some(500));
//! ```

pub mod config;
pub mod device;
pub mod math;
pub mod motion;
pub mod style;
pub mod trail;
pub mod transition;

mod engine;

// Re-export core types for convenience
pub use config::{ConfigError, StageConfig};
pub use device::{DeviceClass, Profile};
pub use engine::{LibraryState, Phase, StageEngine, StageEvent, StageSnapshot};
pub use math::{Size, Vec2};
pub use motion::{Horizontal, MotionPhase, Mover, Vertical};
pub use trail::{SnowTrail, TrailState};
