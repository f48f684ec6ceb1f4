//! Shared test doubles: a scripted engine and a recording host platform.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use arlink_core::{
    Geometry, LaunchDefaults, LaunchOptions, LifecycleController, MemoryPreferences, NativeEngine,
    NativeError, NoticeId, Platform, Preferences, RenderBridge, ShellConfig, SurfaceControl,
    SurfaceSwitch,
};
use parking_lot::Mutex;

pub const TICK: Duration = Duration::from_millis(1000);

/* =============================================================================================
   Engine
   ============================================================================================= */

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Destroy,
    Resume,
    Pause,
    SurfaceCreated,
    Geometry(Geometry),
    Draw,
    Touch(f32, f32, bool),
    Ready(bool),
    ReadyFault,
    SetArgs(String),
    StartupOptions(String),
}

#[derive(Default)]
struct EngineLog {
    calls: Vec<Call>,
    ready_script: VecDeque<Result<bool, NativeError>>,
    ready_default: bool,
}

/// Handle the test keeps after the engine moves into the controller.
#[derive(Clone, Default)]
pub struct EngineProbe {
    inner: Arc<Mutex<EngineLog>>,
}

impl EngineProbe {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Answers for upcoming readiness queries; afterwards `ready_default`.
    pub fn script_ready(&self, answers: Vec<Result<bool, NativeError>>) {
        self.inner.lock().ready_script = answers.into();
    }

    pub fn set_ready(&self, ready: bool) {
        let mut g = self.inner.lock();
        g.ready_script.clear();
        g.ready_default = ready;
    }

    pub fn clear(&self) {
        self.inner.lock().calls.clear();
    }

    fn record(&self, call: Call) {
        self.inner.lock().calls.push(call);
    }
}

pub struct MockEngine {
    probe: EngineProbe,
    options: Mutex<LaunchOptions>,
}

impl MockEngine {
    pub fn new(probe: EngineProbe) -> Self {
        Self {
            probe,
            options: Mutex::new(LaunchOptions::default()),
        }
    }
}

impl NativeEngine for MockEngine {
    type Context = ();

    fn destroy(&self) {
        self.probe.record(Call::Destroy);
    }

    fn on_resume(&self, _ctx: &()) {
        self.probe.record(Call::Resume);
    }

    fn on_pause(&self) {
        self.probe.record(Call::Pause);
    }

    fn on_surface_created(&self) {
        self.probe.record(Call::SurfaceCreated);
    }

    fn on_geometry_changed(&self, geometry: Geometry) {
        self.probe.record(Call::Geometry(geometry));
    }

    fn on_draw_frame(&self) {
        self.probe.record(Call::Draw);
    }

    fn on_touch(&self, x: f32, y: f32, long_press: bool) {
        self.probe.record(Call::Touch(x, y, long_press));
    }

    fn has_reached_ready_state(&self) -> Result<bool, NativeError> {
        let mut g = self.probe.inner.lock();
        let answer = match g.ready_script.pop_front() {
            Some(a) => a,
            None => Ok(g.ready_default),
        };
        g.calls.push(match &answer {
            Ok(r) => Call::Ready(*r),
            Err(_) => Call::ReadyFault,
        });
        answer
    }

    fn configured_address(&self) -> String {
        self.options.lock().server_address.clone()
    }

    fn set_launch_args(&self, args: &str) {
        self.probe.record(Call::SetArgs(args.to_string()));
        self.options.lock().apply(args);
    }

    fn apply_startup_options(&self, raw_args: &str) {
        self.probe.record(Call::StartupOptions(raw_args.to_string()));
        self.options.lock().apply(raw_args);
    }
}

/* =============================================================================================
   Platform
   ============================================================================================= */

#[derive(Debug, Clone, PartialEq)]
pub enum Ui {
    RequestPermissions,
    OpenSettings,
    Finish,
    Terminate,
    Message(String),
    Prompt(LaunchDefaults),
    ShowNotice(NoticeId),
    DismissNotice(NoticeId),
    RegisterDisplay,
    UnregisterDisplay,
    ResumeSurface,
    PauseSurface,
}

struct UiLog {
    events: Vec<Ui>,
    has_permissions: bool,
    rationale: bool,
    next_notice: u64,
}

#[derive(Clone)]
pub struct UiProbe {
    inner: Arc<Mutex<UiLog>>,
}

impl Default for UiProbe {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(UiLog {
                events: Vec::new(),
                has_permissions: true,
                rationale: true,
                next_notice: 1,
            })),
        }
    }
}

impl UiProbe {
    pub fn events(&self) -> Vec<Ui> {
        self.inner.lock().events.clone()
    }

    pub fn count(&self, pred: impl Fn(&Ui) -> bool) -> usize {
        self.inner.lock().events.iter().filter(|e| pred(e)).count()
    }

    pub fn prompts(&self) -> Vec<LaunchDefaults> {
        self.inner
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                Ui::Prompt(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_permissions(&self, granted: bool) {
        self.inner.lock().has_permissions = granted;
    }

    pub fn set_rationale(&self, rationale: bool) {
        self.inner.lock().rationale = rationale;
    }

    fn push(&self, ev: Ui) {
        self.inner.lock().events.push(ev);
    }
}

pub struct RecordingPlatform {
    probe: UiProbe,
    surface: Option<SurfaceSwitch>,
}

impl RecordingPlatform {
    /// Drives a real render thread through `surface`, like the host's render view.
    pub fn with_surface(probe: UiProbe, surface: SurfaceSwitch) -> Self {
        Self {
            probe,
            surface: Some(surface),
        }
    }
}

impl From<UiProbe> for RecordingPlatform {
    fn from(probe: UiProbe) -> Self {
        Self {
            probe,
            surface: None,
        }
    }
}

impl Platform for RecordingPlatform {
    fn has_permissions(&self) -> bool {
        self.probe.inner.lock().has_permissions
    }

    fn request_permissions(&mut self) {
        self.probe.push(Ui::RequestPermissions);
    }

    fn should_show_permission_rationale(&self) -> bool {
        self.probe.inner.lock().rationale
    }

    fn open_permission_settings(&mut self) {
        self.probe.push(Ui::OpenSettings);
    }

    fn finish(&mut self) {
        self.probe.push(Ui::Finish);
    }

    fn terminate(&mut self) {
        self.probe.push(Ui::Terminate);
    }

    fn show_message(&mut self, text: &str) {
        self.probe.push(Ui::Message(text.to_string()));
    }

    fn show_launch_prompt(&mut self, defaults: &LaunchDefaults) {
        self.probe.push(Ui::Prompt(defaults.clone()));
    }

    fn show_notice(&mut self, _text: &str) -> NoticeId {
        let mut g = self.probe.inner.lock();
        let id = NoticeId(g.next_notice);
        g.next_notice += 1;
        g.events.push(Ui::ShowNotice(id));
        id
    }

    fn dismiss_notice(&mut self, id: NoticeId) {
        self.probe.push(Ui::DismissNotice(id));
    }

    fn register_display_listener(&mut self) {
        self.probe.push(Ui::RegisterDisplay);
    }

    fn unregister_display_listener(&mut self) {
        self.probe.push(Ui::UnregisterDisplay);
    }

    fn resume_surface(&mut self) {
        self.probe.push(Ui::ResumeSurface);
        if let Some(s) = &self.surface {
            s.resume();
        }
    }

    fn pause_surface(&mut self) {
        if let Some(s) = &self.surface {
            s.pause();
        }
        self.probe.push(Ui::PauseSurface);
    }
}

/* =============================================================================================
   Harness
   ============================================================================================= */

pub struct Harness {
    pub ctl: LifecycleController<MockEngine>,
    pub bridge: RenderBridge<MockEngine>,
    pub engine: EngineProbe,
    pub ui: UiProbe,
}

pub fn harness_with(cfg: ShellConfig, prefs: Box<dyn Preferences>) -> Harness {
    build_harness(cfg, prefs, None)
}

/// Configured harness whose platform pauses and resumes a real render
/// thread. Spawn it with `RenderThread::spawn_with` on the returned halves.
pub fn surface_harness() -> (Harness, SurfaceSwitch, SurfaceControl) {
    let (switch, control) = arlink_core::surface_switch();
    let cfg = ShellConfig {
        startup_args: "-s 127.0.0.1".to_string(),
        ..ShellConfig::default()
    };
    let h = build_harness(cfg, Box::new(MemoryPreferences::new()), Some(switch.clone()));
    (h, switch, control)
}

fn build_harness(
    cfg: ShellConfig,
    prefs: Box<dyn Preferences>,
    surface: Option<SurfaceSwitch>,
) -> Harness {
    arlink_modules_logging::init_for_tests();

    let engine = EngineProbe::default();
    let ui = UiProbe::default();
    let probe = engine.clone();

    let platform = Box::new(match surface {
        Some(s) => RecordingPlatform::with_surface(ui.clone(), s),
        None => RecordingPlatform::from(ui.clone()),
    });
    let (ctl, bridge) =
        match LifecycleController::create(move || Ok(MockEngine::new(probe)), (), platform, prefs, &cfg) {
            Ok(v) => v,
            Err(e) => panic!("controller create failed: {e}"),
        };

    Harness {
        ctl,
        bridge,
        engine,
        ui,
    }
}

/// Engine with no address configured: resume goes through the prompt.
pub fn harness() -> Harness {
    harness_with(ShellConfig::default(), Box::new(MemoryPreferences::new()))
}

/// Engine already targeted by startup options: resume skips the prompt.
pub fn configured_harness() -> Harness {
    let cfg = ShellConfig {
        startup_args: "-s 127.0.0.1".to_string(),
        ..ShellConfig::default()
    };
    harness_with(cfg, Box::new(MemoryPreferences::new()))
}
