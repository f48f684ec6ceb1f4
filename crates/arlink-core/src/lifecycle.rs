use std::sync::Arc;
use std::time::Duration;

use crate::bus::work_queue;
use crate::config::ShellConfig;
use crate::engine::{NativeEngine, Rotation};
use crate::error::{NativeError, ShellError, ShellResult};
use crate::handle::EngineHandle;
use crate::input::InputBridge;
use crate::launch::{LaunchConfig, LaunchNegotiator, Negotiation, Role};
use crate::platform::Platform;
use crate::poller::{ControlTask, PollOutcome, PollerState, StatusPoller};
use crate::prefs::Preferences;
use crate::render::RenderBridge;
use crate::sched::Scheduler;
use crate::state::ShellState;

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Camera and internet permissions needed to run this application";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Resumed,
    Paused,
    Destroyed,
}

/// Owns the engine handle and turns host lifecycle events into an ordered
/// sequence of engine calls.
///
/// Lives on the control context. The render context only sees the shared
/// state through the `RenderBridge` returned by `create`.
pub struct LifecycleController<N: NativeEngine> {
    state: LifecycleState,
    shared: Arc<ShellState<N>>,
    context: N::Context,

    platform: Box<dyn Platform>,
    negotiator: LaunchNegotiator,

    sched: Scheduler<ControlTask>,
    poller: StatusPoller,
    notice_text: String,

    input: InputBridge,

    awaiting_permission: bool,
    permission_denials: u32,
}

impl<N: NativeEngine> LifecycleController<N> {
    /// Host `onCreate`: construct the engine and wire both contexts.
    ///
    /// Engine construction failure is returned as `ShellError::EngineCreate`
    /// and the host must abort startup.
    pub fn create<F>(
        factory: F,
        context: N::Context,
        platform: Box<dyn Platform>,
        prefs: Box<dyn Preferences>,
        cfg: &ShellConfig,
    ) -> ShellResult<(Self, RenderBridge<N>)>
    where
        F: FnOnce() -> Result<N, NativeError>,
    {
        let handle = EngineHandle::create(factory)?;
        let shared = Arc::new(ShellState::new(handle));

        let (tx, queue) = work_queue();
        let bridge = RenderBridge::new(Arc::clone(&shared), queue);

        let controller = Self {
            state: LifecycleState::Created,
            shared,
            context,
            platform,
            negotiator: LaunchNegotiator::new(prefs, cfg.startup_args.clone()),
            sched: Scheduler::new(),
            poller: StatusPoller::new(cfg.poll_interval()),
            notice_text: cfg.notice_text.clone(),
            input: InputBridge::new(tx),
            awaiting_permission: false,
            permission_denials: 0,
        };

        log::info!("lifecycle: created");
        Ok((controller, bridge))
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    #[inline]
    pub fn notice_visible(&self) -> bool {
        self.poller.notice_visible()
    }

    #[inline]
    pub fn committed_config(&self) -> Option<&LaunchConfig> {
        self.negotiator.committed()
    }

    #[inline]
    pub fn is_prompting(&self) -> bool {
        self.negotiator.is_prompting()
    }

    #[inline]
    pub fn is_engine_live(&self) -> bool {
        self.shared.handle.is_live()
    }

    /// Input bridge for the host's input-delivery thread.
    #[inline]
    pub fn input(&self) -> InputBridge {
        self.input.clone()
    }

    /* ---------------------------------------------------------------------
       Lifecycle
       --------------------------------------------------------------------- */

    pub fn on_resume_request(&mut self) {
        match self.state {
            LifecycleState::Resumed | LifecycleState::Destroyed => return,
            LifecycleState::Created | LifecycleState::Paused => {}
        }
        if self.awaiting_permission {
            return;
        }

        if !self.platform.has_permissions() {
            log::info!("lifecycle: requesting permissions");
            self.awaiting_permission = true;
            self.platform.request_permissions();
            return;
        }

        self.check_launch_options();
    }

    pub fn on_pause_request(&mut self) {
        if self.state != LifecycleState::Resumed {
            log::debug!("lifecycle: pause ignored in {:?}", self.state);
            return;
        }

        self.platform.pause_surface();
        if let Some(engine) = self.shared.handle.live() {
            engine.on_pause();
        }
        self.poller.cancel(&mut self.sched, self.platform.as_mut());
        self.platform.unregister_display_listener();

        self.state = LifecycleState::Paused;
        log::info!("lifecycle: paused");
    }

    /// Terminal. Blocks until no render call is in flight.
    pub fn on_destroy_request(&mut self) {
        if self.state == LifecycleState::Destroyed {
            return;
        }
        if self.state == LifecycleState::Resumed {
            self.on_pause_request();
        }

        self.poller.cancel(&mut self.sched, self.platform.as_mut());
        self.negotiator.abandon();
        self.shared.handle.destroy();

        self.state = LifecycleState::Destroyed;
        log::info!("lifecycle: destroyed");
    }

    pub fn on_permission_result(&mut self, granted: bool) {
        self.awaiting_permission = false;
        if self.state == LifecycleState::Destroyed {
            return;
        }

        if granted {
            self.permission_denials = 0;
            self.check_launch_options();
            return;
        }

        self.permission_denials += 1;
        self.platform.show_message(PERMISSION_DENIED_MESSAGE);

        let rationale = self.platform.should_show_permission_rationale();
        if rationale && self.permission_denials == 1 {
            log::info!("lifecycle: permissions denied, asking once more");
            self.awaiting_permission = true;
            self.platform.request_permissions();
            return;
        }

        if !rationale {
            // "Don't ask again": only the settings page can fix it now.
            self.platform.open_permission_settings();
        }
        log::warn!("lifecycle: permissions denied, finishing");
        self.platform.finish();
    }

    /* ---------------------------------------------------------------------
       Display and input
       --------------------------------------------------------------------- */

    pub fn on_display_rotation_changed(&self, rotation: Rotation) {
        self.shared.viewport.set_rotation(rotation);
    }

    pub fn on_surface_size_changed(&self, width: u32, height: u32) {
        self.shared.viewport.set_size(width, height);
    }

    #[inline]
    pub fn on_tap_gesture(&self, x: f32, y: f32) -> bool {
        self.input.on_tap(x, y)
    }

    #[inline]
    pub fn on_long_press_gesture(&self, x: f32, y: f32) -> bool {
        self.input.on_long_press(x, y)
    }

    /* ---------------------------------------------------------------------
       Launch config
       --------------------------------------------------------------------- */

    /// Answer to the launch prompt. Invalid input re-prompts and returns the
    /// validation error; valid input is committed and the session resumes.
    pub fn submit_launch_config(
        &mut self,
        server_address: &str,
        session_id: &str,
        role: Role,
    ) -> ShellResult<()> {
        let engine = self.shared.handle.live().ok_or(ShellError::NoPromptPending)?;
        self.negotiator.submit(
            &*engine,
            server_address,
            session_id,
            role,
            self.platform.as_mut(),
        )?;
        self.do_resume();
        Ok(())
    }

    /// "Exit" chosen at the launch prompt.
    pub fn exit_requested(&mut self) {
        log::info!("lifecycle: exit chosen at launch prompt");
        self.negotiator.abandon();
        self.platform.terminate();
    }

    /* ---------------------------------------------------------------------
       Control-context timers
       --------------------------------------------------------------------- */

    /// Advance control-context time and run whatever came due.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let due = self.sched.tick(elapsed);
        let n = due.len();

        for (id, task) in due {
            match task {
                ControlTask::PollReadiness => {
                    let engine = self.shared.handle.live();
                    let outcome = self.poller.on_fire(
                        id,
                        || match &engine {
                            Some(e) => e.has_reached_ready_state(),
                            None => Ok(false),
                        },
                        &mut self.sched,
                        self.platform.as_mut(),
                    );
                    if outcome == PollOutcome::Stale {
                        log::trace!("stale readiness tick ignored");
                    }
                }
            }
        }
        n
    }

    #[inline]
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.sched.next_due_in()
    }

    fn check_launch_options(&mut self) {
        let Some(engine) = self.shared.handle.live() else {
            return;
        };
        match self.negotiator.begin(&*engine, self.platform.as_mut()) {
            Negotiation::AlreadyConfigured => self.do_resume(),
            Negotiation::Prompted => log::info!("lifecycle: waiting for launch config"),
            Negotiation::Pending => {}
        }
    }

    /// Reachable only after permissions and launch config are settled.
    fn do_resume(&mut self) {
        if !matches!(self.state, LifecycleState::Created | LifecycleState::Paused) {
            return;
        }
        let Some(engine) = self.shared.handle.live() else {
            return;
        };

        engine.on_resume(&self.context);
        self.platform.resume_surface();
        self.poller
            .start(&mut self.sched, self.platform.as_mut(), &self.notice_text);
        // 180° turns change neither config nor size; only the display listener sees them.
        self.platform.register_display_listener();

        self.state = LifecycleState::Resumed;
        log::info!("lifecycle: resumed");
    }
}
