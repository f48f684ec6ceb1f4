mod console;
mod platform;
mod sim_engine;

use std::io::BufRead;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use arlink_core::{
    surface_switch, FilePreferences, LaunchDefaults, LifecycleController, RenderThread, ShellConfig,
    ShutdownToken,
};

use crate::console::{Console, LaunchPrompt, PromptStep, Reply};
use crate::platform::ConsolePlatform;
use crate::sim_engine::{SimContext, SimulatedEngine};

/// Frames the simulated engine draws before it reports a running session.
const SIM_READY_AFTER_FRAMES: u64 = 120;

const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Everything the control loop reacts to, whichever thread it came from.
#[derive(Debug)]
pub enum ControlEvent {
    Line(String),
    StdinClosed,
    PromptRequested(LaunchDefaults),
    PermissionResult(bool),
}

fn main() -> anyhow::Result<()> {
    let cfg_path = std::env::var("ARLINK_CONFIG").unwrap_or_else(|_| "arlink.toml".to_string());
    let mut cfg = ShellConfig::load_or_default(&cfg_path)
        .with_context(|| format!("loading config {cfg_path}"))?;

    arlink_modules_logging::init(&cfg.log_filter);

    let cli: Vec<String> = std::env::args().skip(1).collect();
    if !cli.is_empty() {
        cfg.startup_args = format!("{} {}", cfg.startup_args, cli.join(" "))
            .trim()
            .to_string();
    }

    let prefs = FilePreferences::open(&cfg.prefs_path)
        .with_context(|| format!("opening preferences {}", cfg.prefs_path))?;

    let (tx, rx) = unbounded::<ControlEvent>();

    let shutdown = ShutdownToken::new();
    install_ctrlc(&shutdown)?;
    spawn_stdin_reader(tx.clone())?;

    let (switch, surface) = surface_switch();

    let context = SimContext {
        app_name: env!("CARGO_PKG_NAME").to_string(),
    };
    let (mut shell, bridge) = LifecycleController::create(
        || SimulatedEngine::new(SIM_READY_AFTER_FRAMES),
        context,
        Box::new(ConsolePlatform::new(tx, switch.clone(), shutdown.clone())),
        Box::new(prefs),
        &cfg,
    )
    .context("engine creation failed")?;

    let render = RenderThread::spawn_with(bridge, cfg.frame_interval(), switch, surface)
        .context("spawning render thread")?;

    log::info!("arlink-shell: type `help` for commands");
    shell.on_surface_size_changed(1280, 720);
    shell.on_resume_request();

    run(&mut shell, &rx, &shutdown);

    // Pausing parks the render thread before the engine hears about it.
    shell.on_pause_request();
    shell.on_destroy_request();
    render.stop();

    log::info!("arlink-shell: bye");
    Ok(())
}

fn install_ctrlc(shutdown: &ShutdownToken) -> anyhow::Result<()> {
    let token = shutdown.clone();
    ctrlc::set_handler(move || token.request()).context("installing Ctrl-C handler")?;
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<ControlEvent>) -> anyhow::Result<()> {
    std::thread::Builder::new()
        .name("arlink-stdin".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(ControlEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(ControlEvent::StdinClosed);
        })
        .context("spawning stdin reader")?;
    Ok(())
}

fn run(
    shell: &mut LifecycleController<SimulatedEngine>,
    rx: &Receiver<ControlEvent>,
    shutdown: &ShutdownToken,
) {
    let console = Console::new();
    let mut prompt: Option<LaunchPrompt> = None;
    let mut last = Instant::now();

    while !shutdown.is_requested() {
        let wait = shell.next_timer_in().unwrap_or(IDLE_WAIT);
        let ev = match rx.recv_timeout(wait) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let now = Instant::now();
        shell.tick(now - last);
        last = now;

        let Some(ev) = ev else { continue };
        match ev {
            ControlEvent::StdinClosed => break,
            ControlEvent::PermissionResult(granted) => shell.on_permission_result(granted),
            ControlEvent::PromptRequested(defaults) => prompt = Some(LaunchPrompt::new(defaults)),
            ControlEvent::Line(line) => {
                if let Some(p) = prompt.as_mut() {
                    match p.feed(&line) {
                        PromptStep::Continue => {}
                        PromptStep::Exit => {
                            prompt = None;
                            shell.exit_requested();
                        }
                        PromptStep::Done {
                            address,
                            session_id,
                            role,
                        } => {
                            prompt = None;
                            // On rejection the platform has already queued a fresh prompt.
                            if let Err(e) = shell.submit_launch_config(&address, &session_id, role) {
                                log::warn!("launch config rejected: {e}");
                            }
                        }
                    }
                    continue;
                }

                match console.exec(shell, &line) {
                    Ok(Reply::Quit) => break,
                    Ok(Reply::Text(t)) if t.is_empty() => {}
                    Ok(Reply::Text(t)) => println!("{t}"),
                    Err(e) => println!("error: {e}"),
                }
            }
        }
    }
}
