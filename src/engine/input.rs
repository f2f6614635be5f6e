//! Input dispatch for [`Engine`].

use glam::Vec2;

use super::Engine;
use crate::error::SitewalkError;
use crate::input::InputEvent;
use crate::marker::MarkerId;

impl Engine {
    /// Process a platform-agnostic input event.
    ///
    /// Drags and scrolls drive the orbit controls; activations toggle the
    /// marker under the pointer (or the named marker). Returns `true` when
    /// a marker's reveal state changed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 })?;
    /// ```
    pub fn handle_input(
        &mut self,
        event: InputEvent,
    ) -> Result<bool, SitewalkError> {
        match event {
            InputEvent::Activate { x, y } => {
                let ray = self.camera.ray_from_ndc(x, y);
                let Some(id) = self.markers.pick(&ray) else {
                    return Ok(false);
                };
                let _ = self.activate_marker(id)?;
                Ok(true)
            }
            InputEvent::Drag { dx, dy, pan } => {
                let delta = Vec2::new(dx, dy);
                if pan {
                    self.orbit.pan(delta);
                } else {
                    self.orbit.rotate(delta);
                }
                self.orbit.apply(&mut self.camera);
                Ok(false)
            }
            InputEvent::Scroll { delta } => {
                self.orbit.zoom(delta);
                self.orbit.apply(&mut self.camera);
                Ok(false)
            }
            InputEvent::ActivateMarker { id } => {
                let _ = self.activate_marker(id)?;
                Ok(true)
            }
        }
    }

    /// Toggle the reveal flag of marker `id`; returns the new value.
    pub fn activate_marker(
        &mut self,
        id: MarkerId,
    ) -> Result<bool, SitewalkError> {
        self.markers.activate(id)
    }
}
