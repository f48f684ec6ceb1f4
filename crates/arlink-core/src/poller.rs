use std::time::Duration;

use crate::error::NativeError;
use crate::platform::{NoticeId, Platform};
use crate::sched::{Scheduler, TimerId};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Tasks the control-context scheduler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTask {
    PollReadiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Scheduled,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Readiness observed; notice dismissed, no further ticks.
    Ready,
    /// Not ready (or the query faulted); another tick is scheduled.
    Rescheduled,
    /// Timer was cancelled or superseded before it fired.
    Stale,
}

/// Re-checks the engine's readiness predicate until it first holds, then
/// dismisses the pending notice.
///
/// The notice belongs to the poller: created by `start`, dismissed exactly
/// once by readiness or `cancel`, whichever comes first.
pub struct StatusPoller {
    interval: Duration,
    state: PollerState,
    timer: Option<TimerId>,
    notice: Option<NoticeId>,
    ticks: u32,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: PollerState::Idle,
            timer: None,
            notice: None,
            ticks: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> PollerState {
        self.state
    }

    #[inline]
    pub fn notice_visible(&self) -> bool {
        self.notice.is_some()
    }

    pub fn start(
        &mut self,
        sched: &mut Scheduler<ControlTask>,
        platform: &mut dyn Platform,
        notice_text: &str,
    ) {
        // A restart supersedes whatever was pending.
        self.cancel(sched, platform);

        self.notice = Some(platform.show_notice(notice_text));
        self.timer = Some(sched.schedule_after(self.interval, ControlTask::PollReadiness));
        self.state = PollerState::Scheduled;
        self.ticks = 0;
    }

    /// Cancel the pending tick and drop the notice. Safe to call repeatedly.
    pub fn cancel(&mut self, sched: &mut Scheduler<ControlTask>, platform: &mut dyn Platform) {
        if let Some(id) = self.timer.take() {
            sched.cancel(id);
        }
        self.dismiss(platform);
        if self.state == PollerState::Scheduled {
            self.state = PollerState::Cancelled;
        }
    }

    /// Handle a fired timer. `query` asks the engine for readiness.
    pub fn on_fire(
        &mut self,
        id: TimerId,
        query: impl FnOnce() -> Result<bool, NativeError>,
        sched: &mut Scheduler<ControlTask>,
        platform: &mut dyn Platform,
    ) -> PollOutcome {
        if self.timer != Some(id) || self.state != PollerState::Scheduled {
            return PollOutcome::Stale;
        }
        self.timer = None;
        self.ticks += 1;

        let ready = match query() {
            Ok(ready) => ready,
            Err(e) => {
                log::warn!("readiness query failed on tick {}: {e}", self.ticks);
                false
            }
        };

        if ready {
            log::info!("engine ready after {} ticks", self.ticks);
            self.dismiss(platform);
            self.state = PollerState::Idle;
            return PollOutcome::Ready;
        }

        self.timer = Some(sched.schedule_after(self.interval, ControlTask::PollReadiness));
        PollOutcome::Rescheduled
    }

    fn dismiss(&mut self, platform: &mut dyn Platform) {
        if let Some(notice) = self.notice.take() {
            platform.dismiss_notice(notice);
        }
    }
}
