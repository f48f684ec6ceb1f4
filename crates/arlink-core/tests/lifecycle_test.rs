mod common;

use arlink_core::lifecycle::PERMISSION_DENIED_MESSAGE;
use arlink_core::{
    FrameOutcome, LifecycleController, LifecycleState, MemoryPreferences, NativeError,
    PollerState, ShellConfig, ShellError,
};
use common::{configured_harness, harness, Call, RecordingPlatform, Ui, UiProbe, TICK};

#[test]
fn configured_engine_resumes_without_prompt() {
    let mut h = configured_harness();
    assert_eq!(h.ctl.state(), LifecycleState::Created);

    h.ctl.on_resume_request();

    assert_eq!(h.ctl.state(), LifecycleState::Resumed);
    assert_eq!(h.ctl.poller_state(), PollerState::Scheduled);
    assert!(h.ctl.notice_visible());
    assert!(h.ui.prompts().is_empty());

    let calls = h.engine.calls();
    assert_eq!(calls[0], Call::StartupOptions("-s 127.0.0.1".into()));
    assert_eq!(calls[1], Call::Resume);

    let ui = h.ui.events();
    assert!(ui.contains(&Ui::ResumeSurface));
    assert!(ui.contains(&Ui::RegisterDisplay));
}

#[test]
fn missing_permissions_are_requested_before_anything_else() {
    let mut h = configured_harness();
    h.ui.set_permissions(false);

    h.ctl.on_resume_request();
    h.ctl.on_resume_request();

    assert_eq!(h.ctl.state(), LifecycleState::Created);
    assert_eq!(h.ui.count(|e| *e == Ui::RequestPermissions), 1);
    assert!(h.engine.calls().is_empty());

    h.ui.set_permissions(true);
    h.ctl.on_permission_result(true);
    assert_eq!(h.ctl.state(), LifecycleState::Resumed);
}

#[test]
fn first_denial_reprompts_second_finishes() {
    let mut h = configured_harness();
    h.ui.set_permissions(false);
    h.ctl.on_resume_request();

    h.ctl.on_permission_result(false);
    assert_eq!(h.ui.count(|e| *e == Ui::RequestPermissions), 2);
    assert_eq!(h.ui.count(|e| *e == Ui::Finish), 0);
    assert!(h
        .ui
        .events()
        .contains(&Ui::Message(PERMISSION_DENIED_MESSAGE.to_string())));

    h.ctl.on_permission_result(false);
    assert_eq!(h.ui.count(|e| *e == Ui::RequestPermissions), 2);
    assert_eq!(h.ui.count(|e| *e == Ui::OpenSettings), 0);
    assert_eq!(h.ui.count(|e| *e == Ui::Finish), 1);
    assert_eq!(h.ctl.state(), LifecycleState::Created);
}

#[test]
fn dont_ask_again_redirects_to_settings() {
    let mut h = configured_harness();
    h.ui.set_permissions(false);
    h.ui.set_rationale(false);
    h.ctl.on_resume_request();

    h.ctl.on_permission_result(false);

    let ui = h.ui.events();
    let settings = ui.iter().position(|e| *e == Ui::OpenSettings);
    let finish = ui.iter().position(|e| *e == Ui::Finish);
    assert!(settings.is_some() && finish.is_some());
    assert!(settings < finish);
}

#[test]
fn pause_twice_is_a_noop() {
    let mut h = configured_harness();
    h.ctl.on_resume_request();

    h.ctl.on_pause_request();
    h.ctl.on_pause_request();

    assert_eq!(h.ctl.state(), LifecycleState::Paused);
    assert_eq!(h.ctl.poller_state(), PollerState::Cancelled);
    assert_eq!(h.engine.count(|c| *c == Call::Pause), 1);
    assert_eq!(h.ui.count(|e| *e == Ui::UnregisterDisplay), 1);
    assert_eq!(h.ui.count(|e| *e == Ui::PauseSurface), 1);
    assert_eq!(h.ui.count(|e| matches!(e, Ui::DismissNotice(_))), 1);
}

#[test]
fn pause_before_resume_does_nothing() {
    let mut h = harness();
    h.ctl.on_pause_request();
    assert_eq!(h.ctl.state(), LifecycleState::Created);
    assert!(h.ui.events().is_empty());
}

#[test]
fn resume_after_pause_shows_a_fresh_notice() {
    let mut h = configured_harness();
    h.ctl.on_resume_request();
    h.ctl.on_pause_request();
    h.ctl.on_resume_request();

    assert_eq!(h.ctl.state(), LifecycleState::Resumed);
    assert_eq!(h.ctl.poller_state(), PollerState::Scheduled);

    let shown: Vec<_> = h
        .ui
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Ui::ShowNotice(id) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(shown.len(), 2);
    assert_ne!(shown[0], shown[1]);
    assert_eq!(h.engine.count(|c| *c == Call::Resume), 2);
}

#[test]
fn destroy_is_terminal_and_idempotent() {
    let mut h = configured_harness();
    h.ctl.on_resume_request();

    h.ctl.on_destroy_request();
    h.ctl.on_destroy_request();

    assert_eq!(h.ctl.state(), LifecycleState::Destroyed);
    assert!(!h.ctl.is_engine_live());
    assert_eq!(h.engine.count(|c| *c == Call::Destroy), 1);

    // Android pauses before destroy; a resumed controller does it itself.
    let calls = h.engine.calls();
    let pause = calls.iter().position(|c| *c == Call::Pause);
    let destroy = calls.iter().position(|c| *c == Call::Destroy);
    assert!(pause.is_some() && destroy.is_some());
    assert!(pause < destroy);

    h.engine.clear();
    h.ctl.on_resume_request();
    h.ctl.on_pause_request();
    h.ctl.on_permission_result(true);
    assert_eq!(h.ctl.tick(TICK * 5), 0);
    assert!(h.engine.calls().is_empty());
    assert_eq!(h.ctl.state(), LifecycleState::Destroyed);
}

#[test]
fn nothing_reaches_the_engine_after_destroy() {
    let mut h = configured_harness();
    h.ctl.on_resume_request();
    h.ctl.on_destroy_request();
    h.engine.clear();

    h.ctl.on_surface_size_changed(800, 600);
    h.ctl.on_tap_gesture(1.0, 2.0);
    h.ctl.on_long_press_gesture(3.0, 4.0);

    assert_eq!(h.bridge.pump(), FrameOutcome::EngineGone);
    assert!(!h.bridge.surface_created());
    assert!(h.engine.calls().is_empty());
}

#[test]
fn engine_construction_failure_is_fatal() {
    let ui = UiProbe::default();
    let platform = Box::new(RecordingPlatform::from(ui));
    let res = LifecycleController::<common::MockEngine>::create(
        || Err(NativeError::new("no GL context")),
        (),
        platform,
        Box::new(MemoryPreferences::new()),
        &ShellConfig::default(),
    );
    assert!(matches!(res, Err(ShellError::EngineCreate(_))));
}
