//! A mounted backdrop: simulator, spotlight, buffers and the per-frame pipeline
//!
//! Each [`Backdrop::render`] call runs one frame:
//! 1. apply a pending resize
//! 2. advance the spotlight
//! 3. tick the market data if the data interval elapsed
//! 4. redraw every panel to the offscreen buffer
//! 5. composite through the spotlight mask onto the visible buffer

use ratatui::{buffer::Buffer, layout::Rect};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::compositor::{Canvases, Mask};
use crate::config::BackdropConfig;
use crate::fx::FxState;
use crate::panel::{draw_scene, layout, FrameTime, PanelSlot};
use crate::runtime::InputEvent;
use crate::sim::{MarketSimulator, MarketState};
use crate::spotlight::Spotlight;
use crate::surface::{Bounds, CellSurface};

pub struct Backdrop {
    config: BackdropConfig,
    sim: MarketSimulator,
    state: MarketState,
    spotlight: Spotlight,
    canvases: Canvases,
    viewport: Bounds,
    slots: Vec<PanelSlot>,
    pending_resize: Option<(u16, u16)>,
    mounted_at: Instant,
    mounted_wall_ms: i64,
    last_data_update: Instant,
    fx: FxState,
    frames: u64,
}

impl Backdrop {
    /// Seed every dataset and size the buffers for a `cols` × `rows` terminal
    pub fn new(config: BackdropConfig, cols: u16, rows: u16, now: Instant, wall_ms: i64) -> Self {
        let mut sim = MarketSimulator::new(&config.seed, wall_ms);
        let state = MarketState::seed(&mut sim, &config.dataset, wall_ms);
        let area = Rect::new(0, 0, cols, rows);
        let viewport = config.cell.viewport(cols, rows);
        let slots = layout(config.preset, viewport);

        debug!(
            preset = %config.preset,
            panels = slots.len(),
            width_px = viewport.width,
            height_px = viewport.height,
            "backdrop seeded"
        );

        Self {
            spotlight: Spotlight::new(config.spotlight),
            canvases: Canvases::new(area),
            viewport,
            slots,
            sim,
            state,
            pending_resize: None,
            mounted_at: now,
            mounted_wall_ms: wall_ms,
            last_data_update: now,
            fx: FxState::On,
            frames: 0,
            config,
        }
    }

    pub fn with_fx(mut self, fx: FxState) -> Self {
        self.fx = fx;
        self
    }

    pub fn handle(&mut self, event: &InputEvent, now: Instant) {
        match *event {
            InputEvent::PointerMove { x, y } => self.spotlight.pointer_move(x, y, now),
            InputEvent::PointerLeave => self.spotlight.pointer_leave(),
            InputEvent::Wheel => self.spotlight.wheel(now),
            // Applied at the start of the next frame, never mid-draw
            InputEvent::Resize { cols, rows } => self.pending_resize = Some((cols, rows)),
            InputEvent::SetFx(fx) => {
                info!(fx = fx.as_str(), "fx toggled");
                self.fx = fx;
            }
        }
    }

    /// Run one frame and return the visible buffer
    pub fn render(&mut self, now: Instant) -> &Buffer {
        if let Some((cols, rows)) = self.pending_resize.take() {
            self.apply_resize(cols, rows);
        }

        self.spotlight.tick(now);
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.mounted_at);
        let wall_ms = self.mounted_wall_ms + elapsed.as_millis() as i64;

        if now.saturating_duration_since(self.last_data_update) >= self.config.data_interval() {
            self.state.update(&mut self.sim, wall_ms);
            self.last_data_update = now;
        }

        if !self.fx.is_on() {
            self.canvases.blackout();
            return &self.canvases.visible;
        }

        let time = FrameTime::new(elapsed.as_secs_f64() * 1000.0, wall_ms)
            .with_reduced_motion(self.config.reduced_motion);

        self.canvases.offscreen.reset();
        {
            let mut surface = CellSurface::new(&mut self.canvases.offscreen, self.config.cell);
            draw_scene(&mut surface, self.viewport, &self.slots, &time, &self.state);
        }

        let mask = Mask {
            center: self.spotlight.center(),
            radius: self.spotlight.radius(),
            glow: self.config.spotlight.glow,
        };
        self.canvases.composite(&mask, self.config.cell);
        &self.canvases.visible
    }

    fn apply_resize(&mut self, cols: u16, rows: u16) {
        let area = Rect::new(0, 0, cols, rows);
        if area == self.canvases.area() {
            return;
        }
        self.canvases.resize(area);
        self.viewport = self.config.cell.viewport(cols, rows);
        self.slots = layout(self.config.preset, self.viewport);
        info!(cols, rows, panels = self.slots.len(), "backdrop resized");
    }

    pub fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn canvases(&self) -> &Canvases {
        &self.canvases
    }

    pub fn slots(&self) -> &[PanelSlot] {
        &self.slots
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    pub fn fx(&self) -> FxState {
        self.fx
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }
}
