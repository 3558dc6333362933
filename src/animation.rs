//! Frame loop on its own task, pausable and cancellable through a handle.

use std::time::Duration;

use async_channel::{Receiver, Sender, unbounded};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::config::Viewport;
use crate::error::AnimationError;
use crate::notify::Notifier;
use crate::stage::{Stage, StageSnapshot};
use crate::types::NotificationKind;

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

enum Control {
    Pause,
    Resume,
    Resize(Viewport),
    Pointer(f64, f64),
    Snapshot(oneshot::Sender<StageSnapshot>),
}

/// Handle to the running frame loop. Dropping it without calling
/// [`dispose`](Self::dispose) leaves the task running until the runtime stops.
pub struct Animation {
    tx: Sender<Control>,
    task: JoinHandle<Stage>,
}

impl Animation {
    /// Starts ticking `stage` every `frame_interval`.
    pub fn spawn(stage: Stage, frame_interval: Duration, notifier: Option<Notifier>) -> Self {
        let (tx, rx) = unbounded();
        let task = tokio::spawn(run(stage, frame_interval, rx, notifier));
        Self { tx, task }
    }

    /// # Errors
    ///
    /// Fails when the frame task has already stopped.
    pub fn pause(&self) -> Result<(), AnimationError> {
        self.send(Control::Pause)
    }

    /// # Errors
    ///
    /// Fails when the frame task has already stopped.
    pub fn resume(&self) -> Result<(), AnimationError> {
        self.send(Control::Resume)
    }

    /// # Errors
    ///
    /// Fails when the frame task has already stopped.
    pub fn resize(&self, viewport: Viewport) -> Result<(), AnimationError> {
        self.send(Control::Resize(viewport))
    }

    /// # Errors
    ///
    /// Fails when the frame task has already stopped.
    pub fn pointer(&self, x: f64, y: f64) -> Result<(), AnimationError> {
        self.send(Control::Pointer(x, y))
    }

    /// # Errors
    ///
    /// Fails when the frame task has already stopped.
    pub async fn snapshot(&self) -> Result<StageSnapshot, AnimationError> {
        let (reply, rx) = oneshot::channel();
        self.send(Control::Snapshot(reply))?;
        rx.await.map_err(|_| AnimationError::Stopped)
    }

    /// Stops the frame loop and hands the stage back.
    ///
    /// # Errors
    ///
    /// Fails when the frame task panicked or was aborted.
    pub async fn dispose(self) -> Result<Stage, AnimationError> {
        self.tx.close();
        self.task.await.map_err(|err| {
            warn!(error = %err, "frame task terminated unexpectedly");
            AnimationError::Stopped
        })
    }

    fn send(&self, control: Control) -> Result<(), AnimationError> {
        self.tx
            .try_send(control)
            .map_err(|_| AnimationError::Stopped)
    }
}

async fn run(
    mut stage: Stage,
    frame_interval: Duration,
    rx: Receiver<Control>,
    notifier: Option<Notifier>,
) -> Stage {
    if frame_interval.is_zero() {
        warn!(fallback = ?MIN_FRAME_INTERVAL, "zero frame interval");
    }
    let mut ticker = interval(frame_interval.max(MIN_FRAME_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut paused = false;

    loop {
        tokio::select! {
            control = rx.recv() => {
                let Ok(control) = control else { break };
                match control {
                    Control::Pause => {
                        if !paused {
                            debug!("animations paused");
                        }
                        paused = true;
                    }
                    Control::Resume => {
                        if paused {
                            debug!("animations resumed");
                            stage.restart_clock();
                            ticker.reset();
                        }
                        paused = false;
                    }
                    Control::Resize(viewport) => {
                        debug!(width = viewport.width, height = viewport.height, "stage resized");
                        stage.resize(viewport);
                    }
                    Control::Pointer(x, y) => stage.pointer(x, y),
                    Control::Snapshot(reply) => {
                        let _ = reply.send(stage.snapshot());
                    }
                }
            }
            _ = ticker.tick(), if !paused => {
                let report = stage.frame(Instant::now().into_std());
                if report.degraded {
                    if let Some(notifier) = notifier.as_ref() {
                        if let Err(err) = notifier.notify("Performance optimised automatically", NotificationKind::Info) {
                            warn!(error = %err, "could not announce reduced motion");
                        }
                    }
                }
            }
        }
    }

    info!(frames = stage.snapshot().frames, "frame loop stopped");
    stage
}
