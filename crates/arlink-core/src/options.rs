use crate::launch::Role;

/// Engine startup options, in the engine's own command-line syntax.
///
/// Parsing is additive: each `apply` overrides only what it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub server_address: String,
    /// Session to join, or the literal `host`.
    pub session: Option<String>,
    pub verbose: bool,
    pub windowed: bool,
    pub button_remap: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            server_address: String::new(),
            session: None,
            verbose: false,
            windowed: false,
            button_remap: true,
        }
    }
}

const HOST_TOKEN: &str = "host";

impl LaunchOptions {
    pub fn parse(args: &str) -> Self {
        let mut opts = Self::default();
        opts.apply(args);
        opts
    }

    pub fn apply(&mut self, args: &str) {
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "-s" | "-server" => match tokens.next() {
                    Some(addr) => self.server_address = addr.to_string(),
                    None => log::warn!("option {tok} needs a value"),
                },
                "-c" | "-cloudanchor" => match tokens.next() {
                    Some(id) => self.session = Some(id.to_string()),
                    None => log::warn!("option {tok} needs a value"),
                },
                "-v" | "-verbose" => self.verbose = true,
                "-w" | "-windowed" => self.windowed = true,
                "-n" | "-noBtnRemap" => self.button_remap = false,
                other => log::debug!("ignoring unknown option {other:?}"),
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_deref().map(|s| {
            if s == HOST_TOKEN {
                Role::Host
            } else {
                Role::Join
            }
        })
    }
}

pub(crate) fn host_token() -> &'static str {
    HOST_TOKEN
}
