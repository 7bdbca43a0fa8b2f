//! Edge detection and clamping

use mascot_hal::ViewportSize;

use super::{Horizontal, Mover, Vertical};
use crate::config::VerticalPolicy;
use crate::math::Span;

impl Mover {
    pub(crate) fn horizontal_span(&self, viewport: ViewportSize) -> Span {
        Span::horizontal(viewport.width, self.size.width, self.settings.edge_overflow)
    }

    pub(crate) fn vertical_span(&self, viewport: ViewportSize) -> Span {
        Span::vertical(viewport.height, self.size.height)
    }

    /// Bottom edge of the mascot is within the threshold of the viewport bottom
    pub(crate) fn is_at_bottom(&self, viewport: ViewportSize) -> bool {
        self.position.y + self.size.height >= viewport.height - self.settings.bottom_threshold
    }

    /// Left or right travel limit reached in the current direction
    pub(super) fn should_turn(&self, viewport: ViewportSize) -> bool {
        if !self.settings.bounce_at_edges {
            return false;
        }
        let span = self.horizontal_span(viewport);
        match self.direction {
            Horizontal::Left => self.position.x <= span.min,
            Horizontal::Right => self.position.x >= span.max,
        }
    }

    pub(super) fn should_bounce_vertical(&self, viewport: ViewportSize) -> bool {
        if !self.settings.bounce_at_edges || self.settings.vertical_policy != VerticalPolicy::Bounce {
            return false;
        }
        let span = self.vertical_span(viewport);
        match self.vertical {
            Vertical::Down if self.position.y >= span.max => !self.settings.restart_on_bottom,
            Vertical::Up => self.position.y <= span.min,
            Vertical::Down => false,
        }
    }

    pub(super) fn should_restart(&self, viewport: ViewportSize) -> bool {
        match self.settings.vertical_policy {
            VerticalPolicy::Bounce => self.settings.restart_on_bottom && self.is_at_bottom(viewport),
            VerticalPolicy::Trigger => self.is_at_bottom(viewport),
        }
    }

    pub(super) fn should_fire_hand(&self, viewport: ViewportSize) -> bool {
        if self.hand_fired || self.settings.vertical_policy != VerticalPolicy::Trigger {
            return false;
        }
        match self.settings.hand_trigger_distance {
            Some(distance) => {
                viewport.height - (self.position.y + self.size.height) <= distance
            }
            None => false,
        }
    }

    pub(super) fn clamp_to(&mut self, viewport: ViewportSize) {
        self.position.x = self.horizontal_span(viewport).clamp(self.position.x);
        self.position.y = self.vertical_span(viewport).clamp(self.position.y);
    }
}
