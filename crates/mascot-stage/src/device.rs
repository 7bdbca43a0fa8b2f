//! Device classification and per-device parameters

use serde::Serialize;

use crate::config::{DeviceTable, Speeds, StageConfig};
use crate::math::Size;

/// Widest viewport treated as a phone
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

/// Widest viewport treated as a tablet
pub const TABLET_MAX_WIDTH: f32 = 1024.0;

/// Device bucket derived from the viewport width
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classify a viewport width
    pub fn from_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

impl<T: Copy> DeviceTable<T> {
    /// Value for a device class; tablet falls back to desktop when absent
    pub fn pick(&self, class: DeviceClass) -> T {
        match class {
            DeviceClass::Mobile => self.mobile,
            DeviceClass::Tablet => self.tablet.unwrap_or(self.desktop),
            DeviceClass::Desktop => self.desktop,
        }
    }
}

/// Size and speed parameters resolved for the current viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Profile {
    pub class: DeviceClass,
    pub size: Size,
    pub snow_size: Size,
    pub hand_size: Option<Size>,
    pub speeds: Speeds,
}

/// Resolve sizes and speeds for a viewport width
pub fn resolve(config: &StageConfig, viewport_width: f32) -> Profile {
    let class = DeviceClass::from_width(viewport_width);
    Profile {
        class,
        size: config.animation_size.pick(class),
        snow_size: config.snow_trails.size.pick(class),
        hand_size: config.hand.as_ref().map(|h| h.size.pick(class)),
        speeds: config.movement.speeds.pick(class),
    }
}
