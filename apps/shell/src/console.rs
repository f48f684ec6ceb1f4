use std::collections::BTreeMap;

use arlink_core::{LaunchDefaults, LifecycleController, Role, Rotation};

use crate::sim_engine::SimulatedEngine;

type Shell = LifecycleController<SimulatedEngine>;

pub enum Reply {
    Text(String),
    Quit,
}

type CmdFn = fn(&mut Shell, &[&str]) -> Result<Reply, String>;

struct Cmd {
    help: &'static str,
    usage: &'static str,
    f: CmdFn,
}

/// Line commands standing in for gestures and host lifecycle events.
pub struct Console {
    cmds: BTreeMap<&'static str, Cmd>,
}

impl Console {
    pub fn new() -> Self {
        let mut cmds = BTreeMap::new();

        cmds.insert(
            "tap",
            Cmd {
                help: "Single tap on the surface",
                usage: "tap <x> <y>",
                f: |shell, args| {
                    let (x, y) = point(args)?;
                    shell.on_tap_gesture(x, y);
                    Ok(Reply::Text(format!("tap ({x}, {y}) queued")))
                },
            },
        );

        cmds.insert(
            "hold",
            Cmd {
                help: "Long press on the surface",
                usage: "hold <x> <y>",
                f: |shell, args| {
                    let (x, y) = point(args)?;
                    shell.on_long_press_gesture(x, y);
                    Ok(Reply::Text(format!("long press ({x}, {y}) queued")))
                },
            },
        );

        cmds.insert(
            "resize",
            Cmd {
                help: "Surface size changed",
                usage: "resize <width> <height>",
                f: |shell, args| {
                    let [w, h] = args else {
                        return Err("expected two sizes".into());
                    };
                    let w: u32 = w.parse().map_err(|_| format!("bad width {w:?}"))?;
                    let h: u32 = h.parse().map_err(|_| format!("bad height {h:?}"))?;
                    shell.on_surface_size_changed(w, h);
                    Ok(Reply::Text(format!("surface {w}x{h}")))
                },
            },
        );

        cmds.insert(
            "rotate",
            Cmd {
                help: "Display rotation changed",
                usage: "rotate <0|90|180|270>",
                f: |shell, args| {
                    let deg = args
                        .first()
                        .and_then(|d| d.parse::<u32>().ok())
                        .ok_or("expected degrees")?;
                    let rot = Rotation::from_degrees(deg).ok_or("rotation must be a quarter turn")?;
                    shell.on_display_rotation_changed(rot);
                    Ok(Reply::Text(format!("rotation {deg}")))
                },
            },
        );

        cmds.insert(
            "pause",
            Cmd {
                help: "Host pause",
                usage: "pause",
                f: |shell, _| {
                    shell.on_pause_request();
                    Ok(Reply::Text(format!("{:?}", shell.state())))
                },
            },
        );

        cmds.insert(
            "resume",
            Cmd {
                help: "Host resume",
                usage: "resume",
                f: |shell, _| {
                    shell.on_resume_request();
                    Ok(Reply::Text(format!("{:?}", shell.state())))
                },
            },
        );

        cmds.insert(
            "status",
            Cmd {
                help: "Lifecycle snapshot",
                usage: "status",
                f: |shell, _| {
                    let target = shell
                        .committed_config()
                        .map(|c| c.to_args())
                        .unwrap_or_else(|| "-".into());
                    Ok(Reply::Text(format!(
                        "state={:?} poller={:?} notice={} launch={}",
                        shell.state(),
                        shell.poller_state(),
                        shell.notice_visible(),
                        target
                    )))
                },
            },
        );

        cmds.insert(
            "quit",
            Cmd {
                help: "Destroy the engine and exit",
                usage: "quit",
                f: |_, _| Ok(Reply::Quit),
            },
        );

        Self { cmds }
    }

    pub fn exec(&self, shell: &mut Shell, line: &str) -> Result<Reply, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Reply::Text(String::new()));
        }

        let mut it = line.split_whitespace();
        let head = it.next().unwrap_or("");
        let args: Vec<&str> = it.collect();

        if head == "help" {
            return Ok(Reply::Text(self.help_text()));
        }

        match self.cmds.get(head) {
            Some(c) => (c.f)(shell, &args).map_err(|e| format!("{e}\nusage: {}", c.usage)),
            None => Err(format!("unknown command {head:?}, try help")),
        }
    }

    fn help_text(&self) -> String {
        let mut out = String::new();
        for (name, c) in &self.cmds {
            out.push_str(&format!("  {name:<8} {:<24} {}\n", c.usage, c.help));
        }
        out.trim_end().to_string()
    }
}

fn point(args: &[&str]) -> Result<(f32, f32), String> {
    let [x, y] = args else {
        return Err("expected x and y".into());
    };
    let x = x.parse().map_err(|_| format!("bad x {x:?}"))?;
    let y = y.parse().map_err(|_| format!("bad y {y:?}"))?;
    Ok((x, y))
}

/* =============================================================================================
   Launch prompt
   ============================================================================================= */

enum Stage {
    Address,
    Session,
    Host,
}

pub enum PromptStep {
    Continue,
    Exit,
    Done {
        address: String,
        session_id: String,
        role: Role,
    },
}

/// Console rendition of the launch dialog: address, session id, host flag.
/// Empty answers take the saved defaults; `exit` quits on the spot.
pub struct LaunchPrompt {
    defaults: LaunchDefaults,
    stage: Stage,
    address: String,
    session_id: String,
}

impl LaunchPrompt {
    pub fn new(defaults: LaunchDefaults) -> Self {
        let p = Self {
            defaults,
            stage: Stage::Address,
            address: String::new(),
            session_id: String::new(),
        };
        p.ask();
        p
    }

    fn ask(&self) {
        match self.stage {
            Stage::Address => {
                let hint = if self.defaults.server_address.is_empty() {
                    "127.0.0.1"
                } else {
                    self.defaults.server_address.as_str()
                };
                println!("Launch options (type exit to quit)");
                println!("  server address [{hint}]:");
            }
            Stage::Session => println!("  session id [{}]:", self.defaults.session_id),
            Stage::Host => println!("  host a new session? [y/N]:"),
        }
    }

    /// Answers go through as typed; the negotiator rejects bad ones.
    pub fn feed(&mut self, line: &str) -> PromptStep {
        let answer = line.trim_end_matches(['\r', '\n']);
        if answer.trim().eq_ignore_ascii_case("exit") {
            return PromptStep::Exit;
        }

        match self.stage {
            Stage::Address => {
                self.address = or_default(answer, &self.defaults.server_address);
                self.stage = Stage::Session;
            }
            Stage::Session => {
                self.session_id = or_default(answer, &self.defaults.session_id);
                self.stage = Stage::Host;
            }
            Stage::Host => {
                let host = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                return PromptStep::Done {
                    address: std::mem::take(&mut self.address),
                    session_id: std::mem::take(&mut self.session_id),
                    role: if host { Role::Host } else { Role::Join },
                };
            }
        }

        self.ask();
        PromptStep::Continue
    }
}

fn or_default(answer: &str, default: &str) -> String {
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_takes_defaults_on_empty_answers() {
        let mut p = LaunchPrompt::new(LaunchDefaults {
            server_address: "10.0.0.2".into(),
            session_id: "lobby".into(),
        });
        assert!(matches!(p.feed(""), PromptStep::Continue));
        assert!(matches!(p.feed(""), PromptStep::Continue));
        match p.feed("") {
            PromptStep::Done { address, session_id, role } => {
                assert_eq!(address, "10.0.0.2");
                assert_eq!(session_id, "lobby");
                assert_eq!(role, Role::Join);
            }
            _ => panic!("prompt should be complete"),
        }
    }

    #[test]
    fn address_is_passed_through_untouched() {
        let mut p = LaunchPrompt::new(LaunchDefaults::default());
        p.feed(" 10.0.0.2");
        p.feed("");
        match p.feed("n") {
            PromptStep::Done { address, .. } => assert_eq!(address, " 10.0.0.2"),
            _ => panic!("prompt should be complete"),
        }
    }

    #[test]
    fn exit_wins_at_any_stage() {
        let mut p = LaunchPrompt::new(LaunchDefaults::default());
        assert!(matches!(p.feed("192.168.0.3"), PromptStep::Continue));
        assert!(matches!(p.feed("EXIT"), PromptStep::Exit));
    }

    #[test]
    fn host_answer_selects_role() {
        let mut p = LaunchPrompt::new(LaunchDefaults::default());
        p.feed("192.168.0.3");
        p.feed("ignored");
        assert!(matches!(p.feed("yes"), PromptStep::Done { role: Role::Host, .. }));
    }
}
