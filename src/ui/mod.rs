//! Menu model and its projection.
//!
//! - `state`: [`UiState`] immutable state machine driven by button and lifecycle events;
//! - `render`: pure projection of the state into a [`Frame`] of [`DrawCommand`]s;
//! - `styles`: [`Styles`] screen geometry and palette.

mod render;
mod state;
mod styles;

pub use render::{DrawCommand, Frame, render};
pub use state::{ProcessHealth, UiState};
pub use styles::{Rgb, Styles};
