use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::bus::WorkQueue;
use crate::engine::{Geometry, NativeEngine};
use crate::input::TouchEvent;
use crate::state::ShellState;

/// Work executed on the render context, in posting order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderWork {
    Touch(TouchEvent),
}

/// Result of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame drawn; `geometry` is what was applied right before it, if anything.
    Drawn { geometry: Option<Geometry> },
    /// Engine already torn down, nothing reached it.
    EngineGone,
}

/// Render-side entry into the engine.
///
/// Every call into the engine happens under the liveness domain shared with
/// `EngineHandle::destroy`.
pub struct RenderBridge<N: NativeEngine> {
    state: Arc<ShellState<N>>,
    queue: WorkQueue<RenderWork>,
    frame_index: u64,
}

impl<N: NativeEngine> RenderBridge<N> {
    pub(crate) fn new(state: Arc<ShellState<N>>, queue: WorkQueue<RenderWork>) -> Self {
        Self {
            state,
            queue,
            frame_index: 0,
        }
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Surface resize as delivered on the render context.
    #[inline]
    pub fn on_surface_size_changed(&self, width: u32, height: u32) {
        self.state.viewport.set_size(width, height);
    }

    pub fn surface_created(&self) -> bool {
        self.state
            .handle
            .with_live(|engine| engine.on_surface_created())
            .is_some()
    }

    /// Apply pending geometry (at most once), then draw.
    pub fn draw_frame(&mut self) -> FrameOutcome {
        let viewport = &self.state.viewport;
        let drawn = self.state.handle.with_live(|engine| {
            let geometry = viewport.take_dirty();
            if let Some(g) = geometry {
                log::debug!(
                    "geometry changed: rotation={} {}x{}",
                    g.rotation.code(),
                    g.width,
                    g.height
                );
                engine.on_geometry_changed(g);
            }
            engine.on_draw_frame();
            geometry
        });

        match drawn {
            Some(geometry) => {
                self.frame_index = self.frame_index.wrapping_add(1);
                log::trace!("frame {}", self.frame_index);
                FrameOutcome::Drawn { geometry }
            }
            None => FrameOutcome::EngineGone,
        }
    }

    /// Deliver everything queued so far, in order. Work posted after the
    /// engine is gone is dropped.
    pub fn run_queued(&mut self) -> usize {
        let handle = &self.state.handle;
        self.queue.drain(|work| match work {
            RenderWork::Touch(t) => {
                if handle
                    .with_live(|engine| engine.on_touch(t.x, t.y, t.long_press))
                    .is_none()
                {
                    log::trace!("touch at ({}, {}) after teardown, dropped", t.x, t.y);
                }
            }
        })
    }

    /// One render-context iteration: queued work first, then a frame.
    pub fn pump(&mut self) -> FrameOutcome {
        self.run_queued();
        self.draw_frame()
    }
}

enum RenderControl {
    Resume,
    /// Park the loop; the reply goes out once no frame is in flight.
    Pause(Sender<()>),
    Stop,
}

/// Receiving end of a `SurfaceSwitch`, handed to `RenderThread::spawn_with`.
pub struct SurfaceControl {
    rx: Receiver<RenderControl>,
}

/// Run/park switch for the render thread, usable from the control context
/// before the thread exists.
#[derive(Clone)]
pub struct SurfaceSwitch {
    ctl: Sender<RenderControl>,
}

pub fn surface_switch() -> (SurfaceSwitch, SurfaceControl) {
    let (ctl, rx) = unbounded();
    (SurfaceSwitch { ctl }, SurfaceControl { rx })
}

impl SurfaceSwitch {
    #[inline]
    pub fn resume(&self) {
        let _ = self.ctl.send(RenderControl::Resume);
    }

    /// Park the render loop and wait until it has stopped drawing.
    ///
    /// Returns `false` if the render thread is already gone.
    pub fn pause(&self) -> bool {
        let (ack_tx, ack_rx) = bounded(1);
        if self.ctl.send(RenderControl::Pause(ack_tx)).is_err() {
            return false;
        }
        ack_rx.recv().is_ok()
    }
}

/// Dedicated, continuously scheduled render context.
///
/// Starts parked. The first `resume` fires the surface-created hook, then the
/// bridge is pumped every `frame_interval` until `pause` or `stop`.
pub struct RenderThread {
    switch: SurfaceSwitch,
    join: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn<N: NativeEngine>(
        bridge: RenderBridge<N>,
        frame_interval: Duration,
    ) -> std::io::Result<Self> {
        let (switch, control) = surface_switch();
        Self::spawn_with(bridge, frame_interval, switch, control)
    }

    /// Spawn on a switch created up front, so the host glue can hold it
    /// before the render thread is running.
    pub fn spawn_with<N: NativeEngine>(
        bridge: RenderBridge<N>,
        frame_interval: Duration,
        switch: SurfaceSwitch,
        control: SurfaceControl,
    ) -> std::io::Result<Self> {
        let join = std::thread::Builder::new()
            .name("arlink-render".into())
            .spawn(move || render_main(bridge, frame_interval, control.rx))?;

        Ok(Self {
            switch,
            join: Some(join),
        })
    }

    #[inline]
    pub fn switch(&self) -> SurfaceSwitch {
        self.switch.clone()
    }

    #[inline]
    pub fn resume(&self) {
        self.switch.resume();
    }

    /// Blocks until the loop is parked.
    #[inline]
    pub fn pause(&self) -> bool {
        self.switch.pause()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.switch.ctl.send(RenderControl::Stop);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn render_main<N: NativeEngine>(
    mut bridge: RenderBridge<N>,
    frame_interval: Duration,
    rx: Receiver<RenderControl>,
) {
    let mut running = false;
    let mut surface_ready = false;

    loop {
        let ctl = if running {
            let t0 = Instant::now();
            if bridge.pump() == FrameOutcome::EngineGone {
                // Nothing left to draw into; wait for stop.
                running = false;
                continue;
            }
            match rx.recv_timeout(frame_interval.saturating_sub(t0.elapsed())) {
                Ok(c) => c,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(c) => c,
                Err(_) => break,
            }
        };

        match ctl {
            RenderControl::Resume => {
                if !surface_ready {
                    surface_ready = bridge.surface_created();
                }
                running = true;
            }
            RenderControl::Pause(ack) => {
                running = false;
                let _ = ack.send(());
            }
            RenderControl::Stop => break,
        }
    }

    log::debug!("render thread exit after {} frames", bridge.frame_index());
}
