use crate::launch::LaunchDefaults;

/// Token for an on-screen notice shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// Host UI glue the controller drives.
///
/// Everything here runs on the control context. Implementations are thin:
/// dialogs, toasts, permission prompts and the render view's own
/// pause/resume switch.
pub trait Platform: Send {
    fn has_permissions(&self) -> bool;
    fn request_permissions(&mut self);
    /// `false` once the user ticked "don't ask again".
    fn should_show_permission_rationale(&self) -> bool;
    fn open_permission_settings(&mut self);

    /// Close the application screen (normal flow end).
    fn finish(&mut self);
    /// Kill the process without confirmation.
    fn terminate(&mut self);

    fn show_message(&mut self, text: &str);

    /// Present the launch dialog. The answer comes back through
    /// `LifecycleController::submit_launch_config` or `exit_requested`.
    fn show_launch_prompt(&mut self, defaults: &LaunchDefaults);

    fn show_notice(&mut self, text: &str) -> NoticeId;
    fn dismiss_notice(&mut self, id: NoticeId);

    fn register_display_listener(&mut self);
    fn unregister_display_listener(&mut self);

    fn resume_surface(&mut self);
    fn pause_surface(&mut self);
}
