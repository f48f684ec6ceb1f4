use crossbeam_channel::Sender;

use arlink_core::{LaunchDefaults, NoticeId, Platform, ShutdownToken, SurfaceSwitch};

use crate::ControlEvent;

/// Desktop stand-in for the host UI: dialogs become console prompts and
/// the render view switch drives the render thread directly.
pub struct ConsolePlatform {
    events: Sender<ControlEvent>,
    surface: SurfaceSwitch,
    shutdown: ShutdownToken,
    permissions_granted: bool,
    next_notice: u64,
}

impl ConsolePlatform {
    pub fn new(events: Sender<ControlEvent>, surface: SurfaceSwitch, shutdown: ShutdownToken) -> Self {
        Self {
            events,
            surface,
            shutdown,
            permissions_granted: false,
            next_notice: 1,
        }
    }

    #[inline]
    fn post(&self, ev: ControlEvent) {
        let _ = self.events.send(ev);
    }
}

impl Platform for ConsolePlatform {
    fn has_permissions(&self) -> bool {
        self.permissions_granted
    }

    fn request_permissions(&mut self) {
        // No permission model on the desktop; the user always says yes.
        println!("[permissions] camera, internet, storage: granted");
        self.permissions_granted = true;
        self.post(ControlEvent::PermissionResult(true));
    }

    fn should_show_permission_rationale(&self) -> bool {
        true
    }

    fn open_permission_settings(&mut self) {
        println!("[permissions] open system settings to grant access");
    }

    fn finish(&mut self) {
        self.shutdown.request();
    }

    fn terminate(&mut self) {
        log::info!("terminating");
        std::process::exit(0);
    }

    fn show_message(&mut self, text: &str) {
        println!("[message] {text}");
    }

    fn show_launch_prompt(&mut self, defaults: &LaunchDefaults) {
        self.post(ControlEvent::PromptRequested(defaults.clone()));
    }

    fn show_notice(&mut self, text: &str) -> NoticeId {
        let id = NoticeId(self.next_notice);
        self.next_notice += 1;
        println!("[notice #{}] {text}", id.0);
        id
    }

    fn dismiss_notice(&mut self, id: NoticeId) {
        println!("[notice #{}] dismissed", id.0);
    }

    fn register_display_listener(&mut self) {
        log::debug!("display listener registered");
    }

    fn unregister_display_listener(&mut self) {
        log::debug!("display listener unregistered");
    }

    fn resume_surface(&mut self) {
        self.surface.resume();
    }

    /// Returns once the render thread has parked.
    fn pause_surface(&mut self) {
        if !self.surface.pause() {
            log::debug!("render thread already gone");
        }
    }
}
