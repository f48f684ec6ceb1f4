pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod input;
pub mod launch;
pub mod lifecycle;
pub mod options;
pub mod platform;
pub mod poller;
pub mod prefs;
pub mod render;
pub mod sched;
pub mod shutdown;
pub mod state;
pub mod viewport;

pub use crate::config::ShellConfig;
pub use crate::engine::{Geometry, NativeEngine, Rotation};
pub use crate::error::{NativeError, ShellError, ShellResult};
pub use crate::input::{Gesture, InputBridge, TouchEvent};
pub use crate::launch::{LaunchConfig, LaunchDefaults, Role};
pub use crate::lifecycle::{LifecycleController, LifecycleState};
pub use crate::options::LaunchOptions;
pub use crate::platform::{NoticeId, Platform};
pub use crate::poller::PollerState;
pub use crate::prefs::{FilePreferences, MemoryPreferences, Preferences};
pub use crate::render::{
    surface_switch, FrameOutcome, RenderBridge, RenderThread, RenderWork, SurfaceControl, SurfaceSwitch,
};
pub use crate::shutdown::ShutdownToken;
