//! Frame loop and mount lifecycle
//!
//! [`mount`] spawns a task that owns a [`Backdrop`] and a [`FrameSink`]. Input
//! arrives over an mpsc channel, shutdown over a watch channel, and frames are
//! paced by a tokio interval. Dropping the [`MountHandle`] stops the loop.
use std::time::Duration;

use ratatui::{backend::Backend, buffer::Buffer, Terminal};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::backdrop::Backdrop;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::fx::FxState;

/// Host input, already translated to pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Wheel,
    Resize { cols: u16, rows: u16 },
    SetFx(FxState),
}

/// Destination for finished frames
pub trait FrameSink {
    fn present(&mut self, frame: &Buffer) -> Result<(), BackdropError>;
}

impl<B: Backend> FrameSink for Terminal<B> {
    fn present(&mut self, frame: &Buffer) -> Result<(), BackdropError> {
        self.draw(|f| {
            let area = f.area().intersection(frame.area);
            let out = f.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (frame.cell((x, y)), out.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;
        Ok(())
    }
}

/// Counters returned when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub events: u64,
}

/// Drive `backdrop` until `shutdown` flips to true or its sender is dropped
pub async fn run_frame_loop<S: FrameSink>(
    mut backdrop: Backdrop,
    mut sink: S,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
    frame_interval: Duration,
) -> Result<LoopStats, BackdropError> {
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = LoopStats::default();

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("frame loop shutdown requested");
                    break;
                }
            }
            Some(event) = input_rx.recv() => {
                backdrop.handle(&event, Instant::now());
                stats.events += 1;
            }
            _ = interval.tick() => {
                let frame = backdrop.render(Instant::now());
                sink.present(frame)?;
                stats.frames += 1;
            }
        }
    }

    Ok(stats)
}

/// Owner's side of a mounted backdrop
pub struct MountHandle {
    shutdown_tx: watch::Sender<bool>,
    input_tx: mpsc::Sender<InputEvent>,
    task: Option<JoinHandle<Result<LoopStats, BackdropError>>>,
}

impl MountHandle {
    /// Sender for host input events
    pub fn input(&self) -> mpsc::Sender<InputEvent> {
        self.input_tx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for it to release the sink and buffers
    pub async fn unmount(mut self) -> Result<LoopStats, BackdropError> {
        let _ = self.shutdown_tx.send(true);
        let Some(task) = self.task.take() else {
            return Ok(LoopStats::default());
        };
        let stats = task
            .await
            .map_err(|e| BackdropError::LoopTask(e.to_string()))??;
        info!(frames = stats.frames, events = stats.events, "backdrop unmounted");
        Ok(stats)
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            warn!("backdrop handle dropped without unmount, stopping frame loop");
            let _ = self.shutdown_tx.send(true);
        }
    }
}

/// Seed a backdrop for a `cols` × `rows` surface and start its frame loop
///
/// Must be called inside a tokio runtime.
pub fn mount<S>(
    config: BackdropConfig,
    sink: S,
    cols: u16,
    rows: u16,
) -> Result<MountHandle, BackdropError>
where
    S: FrameSink + Send + 'static,
{
    config.validate()?;

    let wall_ms = chrono::Utc::now().timestamp_millis();
    let frame_interval = config.frame_interval();
    let (input_tx, input_rx) = mpsc::channel(config.input_buffer);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    info!(
        preset = %config.preset,
        seed = %config.seed,
        cols,
        rows,
        frame_ms = frame_interval.as_millis() as u64,
        "mounting backdrop"
    );

    let backdrop = Backdrop::new(config, cols, rows, Instant::now(), wall_ms);
    let task = tokio::spawn(run_frame_loop(
        backdrop,
        sink,
        input_rx,
        shutdown_rx,
        frame_interval,
    ));

    Ok(MountHandle {
        shutdown_tx,
        input_tx,
        task: Some(task),
    })
}
