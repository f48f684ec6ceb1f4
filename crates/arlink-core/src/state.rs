use crate::engine::NativeEngine;
use crate::handle::EngineHandle;
use crate::viewport::Viewport;

/// State shared by the lifecycle controller and the render loop.
///
/// Owned by the controller; the render bridge holds a reference.
pub struct ShellState<N: NativeEngine> {
    pub handle: EngineHandle<N>,
    pub viewport: Viewport,
}

impl<N: NativeEngine> ShellState<N> {
    pub fn new(handle: EngineHandle<N>) -> Self {
        Self {
            handle,
            viewport: Viewport::new(),
        }
    }
}
