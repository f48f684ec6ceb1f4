use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arlink_core::{Geometry, LaunchOptions, NativeEngine, NativeError};
use parking_lot::Mutex;

/// Host context handed to the engine on resume.
#[derive(Debug, Clone)]
pub struct SimContext {
    pub app_name: String,
}

/// Stand-in for the native AR streaming engine.
///
/// Tracks options the way the real one does and reports readiness once it
/// has drawn enough frames since the last resume.
pub struct SimulatedEngine {
    options: Mutex<LaunchOptions>,
    resumed: AtomicBool,
    frames_since_resume: AtomicU64,
    ready_after_frames: u64,
}

impl SimulatedEngine {
    pub fn new(ready_after_frames: u64) -> Result<Self, NativeError> {
        log::debug!("sim: engine constructed (ready after {ready_after_frames} frames)");
        Ok(Self {
            options: Mutex::new(LaunchOptions::default()),
            resumed: AtomicBool::new(false),
            frames_since_resume: AtomicU64::new(0),
            ready_after_frames,
        })
    }
}

impl NativeEngine for SimulatedEngine {
    type Context = SimContext;

    fn destroy(&self) {
        log::info!(
            "sim: destroyed after {} frames in the last session",
            self.frames_since_resume.load(Ordering::Relaxed)
        );
    }

    fn on_resume(&self, ctx: &SimContext) {
        let opts = self.options.lock().clone();
        log::info!(
            "sim: resume for {} -> server {} session {:?} (verbose={}, remap={})",
            ctx.app_name,
            opts.server_address,
            opts.session,
            opts.verbose,
            opts.button_remap
        );
        self.frames_since_resume.store(0, Ordering::Relaxed);
        self.resumed.store(true, Ordering::Release);
    }

    fn on_pause(&self) {
        self.resumed.store(false, Ordering::Release);
        log::info!("sim: pause");
    }

    fn on_surface_created(&self) {
        log::info!("sim: surface created");
    }

    fn on_geometry_changed(&self, g: Geometry) {
        log::info!(
            "sim: geometry rotation={} {}x{}",
            g.rotation.code(),
            g.width,
            g.height
        );
    }

    fn on_draw_frame(&self) {
        self.frames_since_resume.fetch_add(1, Ordering::Relaxed);
    }

    fn on_touch(&self, x: f32, y: f32, long_press: bool) {
        let kind = if long_press { "long press" } else { "tap" };
        log::info!("sim: {kind} at ({x:.1}, {y:.1})");
    }

    fn has_reached_ready_state(&self) -> Result<bool, NativeError> {
        if !self.resumed.load(Ordering::Acquire) {
            return Err(NativeError::new("session not running"));
        }
        Ok(self.frames_since_resume.load(Ordering::Relaxed) >= self.ready_after_frames)
    }

    fn configured_address(&self) -> String {
        self.options.lock().server_address.clone()
    }

    fn set_launch_args(&self, args: &str) {
        self.options.lock().apply(args);
    }

    fn apply_startup_options(&self, raw_args: &str) {
        if raw_args.trim().is_empty() {
            return;
        }
        log::debug!("sim: startup options {raw_args:?}");
        self.options.lock().apply(raw_args);
    }
}
