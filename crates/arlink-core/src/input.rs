use crate::bus::WorkSender;
use crate::render::RenderWork;

/// Gesture kinds classified by the host before they reach the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    LongPress,
}

/// Normalized touch forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub x: f32,
    pub y: f32,
    pub long_press: bool,
}

impl TouchEvent {
    #[inline]
    pub fn new(gesture: Gesture, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            long_press: gesture == Gesture::LongPress,
        }
    }
}

/// Moves gestures off the input-delivery thread onto the render queue.
///
/// Nothing is executed inline; the render loop delivers touches in posting
/// order, between frames.
#[derive(Clone)]
pub struct InputBridge {
    tx: WorkSender<RenderWork>,
}

impl InputBridge {
    pub fn new(tx: WorkSender<RenderWork>) -> Self {
        Self { tx }
    }

    #[inline]
    pub fn on_tap(&self, x: f32, y: f32) -> bool {
        self.forward(Gesture::Tap, x, y)
    }

    #[inline]
    pub fn on_long_press(&self, x: f32, y: f32) -> bool {
        self.forward(Gesture::LongPress, x, y)
    }

    /// Post a gesture. Returns `false` if the render side is gone, which is
    /// not an error: the engine is torn down and the touch is dropped.
    pub fn forward(&self, gesture: Gesture, x: f32, y: f32) -> bool {
        let posted = self.tx.post(RenderWork::Touch(TouchEvent::new(gesture, x, y)));
        if !posted {
            log::trace!("render queue closed, dropping {gesture:?} at ({x}, {y})");
        }
        posted
    }
}
