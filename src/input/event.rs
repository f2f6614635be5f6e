use serde::{Deserialize, Serialize};

use crate::marker::MarkerId;

/// Platform-agnostic input events, already reduced to what the site engine
/// acts on.
///
/// Hosts translate raw window events into these; the engine feeds them to
/// the orbit controls or the marker set.
///
/// # Example
///
/// ```ignore
/// engine.handle_input(InputEvent::Drag { dx: 12.0, dy: -3.0, pan: false })?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Click or tap at a position in normalized device coordinates.
    Activate {
        /// Horizontal NDC in `[-1, 1]`, +1 at the right edge.
        x: f32,
        /// Vertical NDC in `[-1, 1]`, +1 at the top edge.
        y: f32,
    },
    /// Pointer drag in pixels.
    Drag {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
        /// Pan instead of orbit.
        pan: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount in wheel steps.
        delta: f32,
    },
    /// Activate a marker directly, e.g. from a list UI.
    ActivateMarker {
        /// Marker to toggle.
        id: MarkerId,
    },
}
