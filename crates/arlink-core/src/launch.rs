use std::net::IpAddr;

use crate::engine::NativeEngine;
use crate::error::{ShellError, ShellResult};
use crate::options::host_token;
use crate::platform::Platform;
use crate::prefs::{Preferences, KEY_LAST_ADDRESS, KEY_LAST_SESSION};

pub const INVALID_ADDRESS_MESSAGE: &str = "Invalid IP address. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Join,
    Host,
}

/// Connection parameters for one streaming session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    server_address: String,
    session_id: String,
    role: Role,
}

impl LaunchConfig {
    /// Validates that `server_address` is an IP literal (v4 or v6), exactly
    /// as typed. Input is rejected, never corrected.
    pub fn new(server_address: &str, session_id: &str, role: Role) -> ShellResult<Self> {
        if server_address.parse::<IpAddr>().is_err() {
            return Err(ShellError::InvalidAddress(server_address.to_string()));
        }
        Ok(Self {
            server_address: server_address.to_string(),
            session_id: session_id.to_string(),
            role,
        })
    }

    #[inline]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Engine launch arguments: `-s <addr> -c <session|host>`.
    pub fn to_args(&self) -> String {
        match self.role {
            Role::Host => format!("-s {} -c {}", self.server_address, host_token()),
            Role::Join if self.session_id.is_empty() => format!("-s {}", self.server_address),
            Role::Join => format!("-s {} -c {}", self.server_address, self.session_id),
        }
    }
}

/// Values pre-filled into the launch prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchDefaults {
    pub server_address: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
    /// Engine already has a target (saved state or startup options).
    AlreadyConfigured,
    /// Prompt shown, waiting for the user.
    Prompted,
    /// A prompt is already up; nothing new shown.
    Pending,
}

/// Resolves the launch config before the first resume.
pub struct LaunchNegotiator {
    prefs: Box<dyn Preferences>,
    startup_args: String,
    startup_applied: bool,
    pending: Option<LaunchDefaults>,
    committed: Option<LaunchConfig>,
}

impl LaunchNegotiator {
    pub fn new(prefs: Box<dyn Preferences>, startup_args: impl Into<String>) -> Self {
        Self {
            prefs,
            startup_args: startup_args.into(),
            startup_applied: false,
            pending: None,
            committed: None,
        }
    }

    #[inline]
    pub fn is_prompting(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn committed(&self) -> Option<&LaunchConfig> {
        self.committed.as_ref()
    }

    pub fn defaults(&self) -> LaunchDefaults {
        LaunchDefaults {
            server_address: self.prefs.get(KEY_LAST_ADDRESS).unwrap_or_default(),
            session_id: self.prefs.get(KEY_LAST_SESSION).unwrap_or_default(),
        }
    }

    pub fn begin<N: NativeEngine>(&mut self, engine: &N, platform: &mut dyn Platform) -> Negotiation {
        if !self.startup_applied {
            engine.apply_startup_options(&self.startup_args);
            self.startup_applied = true;
        }

        if self.pending.is_some() {
            return Negotiation::Pending;
        }

        let configured = engine.configured_address();
        if !configured.is_empty() {
            log::info!("engine already targets {configured}, skipping launch prompt");
            return Negotiation::AlreadyConfigured;
        }

        let defaults = self.defaults();
        platform.show_launch_prompt(&defaults);
        self.pending = Some(defaults);
        Negotiation::Prompted
    }

    /// Validate and commit the user's answer.
    ///
    /// Invalid input re-shows the prompt with the same defaults and commits
    /// nothing.
    pub fn submit<N: NativeEngine>(
        &mut self,
        engine: &N,
        server_address: &str,
        session_id: &str,
        role: Role,
        platform: &mut dyn Platform,
    ) -> ShellResult<LaunchConfig> {
        let Some(defaults) = self.pending.as_ref() else {
            return Err(if self.committed.is_some() {
                ShellError::AlreadyCommitted
            } else {
                ShellError::NoPromptPending
            });
        };

        let cfg = match LaunchConfig::new(server_address, session_id, role) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::info!("rejected launch input: {e}");
                platform.show_message(INVALID_ADDRESS_MESSAGE);
                platform.show_launch_prompt(defaults);
                return Err(e);
            }
        };

        self.prefs.set(KEY_LAST_ADDRESS, cfg.server_address());
        self.prefs.set(KEY_LAST_SESSION, cfg.session_id());
        if let Err(e) = self.prefs.flush() {
            log::warn!("could not persist launch defaults: {e}");
        }

        engine.set_launch_args(&cfg.to_args());
        log::info!("launch config committed: {}", cfg.to_args());

        self.pending = None;
        self.committed = Some(cfg.clone());
        Ok(cfg)
    }

    /// Prompt dismissed via "Exit".
    pub fn abandon(&mut self) {
        self.pending = None;
    }
}
