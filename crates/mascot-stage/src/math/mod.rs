//! Geometry types for mascot placement

mod size;
mod span;
mod vec2;

pub use size::Size;
pub use span::Span;
pub use vec2::Vec2;
