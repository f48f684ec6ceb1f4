use crate::error::NativeError;

/// Display rotation as reported by the host, in quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Host rotation code (0..=3).
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    pub fn from_degrees(deg: u32) -> Option<Self> {
        match deg % 360 {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }
}

/// Geometry pushed into the engine before a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub rotation: Rotation,
    pub width: u32,
    pub height: u32,
}

/// The native AR/streaming engine as seen from the shell.
///
/// Implementations wrap the real native instance. Every method may be called
/// from either the control or the render context, so the engine must be
/// internally synchronized. The shell guarantees `destroy` is called exactly
/// once and that nothing reaches the engine afterwards.
pub trait NativeEngine: Send + Sync + 'static {
    /// Opaque host context handed over on resume.
    type Context: Send + 'static;

    fn destroy(&self);

    fn on_resume(&self, ctx: &Self::Context);
    fn on_pause(&self);

    fn on_surface_created(&self);
    fn on_geometry_changed(&self, geometry: Geometry);
    fn on_draw_frame(&self);

    fn on_touch(&self, x: f32, y: f32, long_press: bool);

    /// Readiness predicate: initial scan has progressed far enough to hide
    /// the loading notice.
    fn has_reached_ready_state(&self) -> Result<bool, NativeError>;

    /// Server address the engine already knows about, empty if none.
    fn configured_address(&self) -> String;

    fn set_launch_args(&self, args: &str);
    fn apply_startup_options(&self, raw_args: &str);
}
