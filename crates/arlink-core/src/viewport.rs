use parking_lot::Mutex;

use crate::engine::{Geometry, Rotation};

#[derive(Debug, Clone, Copy, Default)]
struct ViewportState {
    width: u32,
    height: u32,
    rotation: Rotation,
    dirty: bool,
}

/// Display geometry shared between the control and render contexts.
///
/// Writers coalesce (last writer wins); the render loop consumes the dirty
/// flag once per pass, so the final geometry is never lost.
#[derive(Debug, Default)]
pub struct Viewport {
    state: Mutex<ViewportState>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_size(&self, width: u32, height: u32) {
        let mut s = self.state.lock();
        s.width = width;
        s.height = height;
        s.dirty = true;
    }

    /// Display change. Also fires for 180° turns, which never resize the surface.
    pub fn set_rotation(&self, rotation: Rotation) {
        let mut s = self.state.lock();
        s.rotation = rotation;
        s.dirty = true;
    }

    /// Take the pending geometry, clearing the dirty flag.
    pub fn take_dirty(&self) -> Option<Geometry> {
        let mut s = self.state.lock();
        if !s.dirty {
            return None;
        }
        s.dirty = false;
        Some(Geometry {
            rotation: s.rotation,
            width: s.width,
            height: s.height,
        })
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }
}
