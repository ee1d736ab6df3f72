//! Panel renderers and scene layout
//!
//! Every panel is a free function `draw_*(surface, bounds, time, data)` that
//! paints its own frame and contents. [`draw_panel`] routes a [`PanelSlot`]
//! through a [`Clip`] so nothing lands outside the slot, and [`draw_scene`]
//! paints the grid plus every slot of a preset's layout.

mod board;
mod book;
mod chart;
mod grid;
mod tape;

pub use board::{draw_fx, draw_heatmap, draw_macro};
pub use book::draw_depth;
pub use chart::{draw_candles, draw_options_skew, draw_sparklines, draw_vol_surface, draw_yield_curve};
pub use grid::draw_grid;
pub use tape::{draw_news_ticker, draw_newswire, draw_quotes, draw_time_and_sales, quote_rows};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::config::Preset;
use crate::palette::C_BORDER;
use crate::sim::MarketState;
use crate::surface::{Bounds, Clip, Paint, Surface};

/// Width of the reference frame every layout is authored in
pub const REFERENCE_WIDTH: f64 = 1200.0;

/// Height of the reference frame every layout is authored in
pub const REFERENCE_HEIGHT: f64 = 800.0;

/// Scaled zones narrower than this are skipped
const MIN_PANEL_WIDTH: f64 = 50.0;

/// Scaled zones shorter than this are skipped
const MIN_PANEL_HEIGHT: f64 = 30.0;

/// Timing handed to every panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since mount
    pub now_ms: f64,
    /// Wall clock, epoch milliseconds
    pub wall_ms: i64,
    /// 1.0 normally, 0.0 under reduced motion
    pub motion: f64,
}

impl FrameTime {
    pub fn new(now_ms: f64, wall_ms: i64) -> Self {
        Self {
            now_ms,
            wall_ms,
            motion: 1.0,
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.motion = if reduced { 0.0 } else { 1.0 };
        self
    }

    /// Animation clock: elapsed time scaled by the motion factor
    pub fn t(&self) -> f64 {
        self.now_ms * self.motion
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Quotes,
    Candles,
    Heatmap,
    Depth,
    TimeAndSales,
    Sparklines,
    Macro,
    Fx,
    OptionsSkew,
    VolSurface,
    NewsTicker,
    YieldCurve,
    Newswire,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Quotes => "quotes",
            PanelKind::Candles => "candles",
            PanelKind::Heatmap => "heatmap",
            PanelKind::Depth => "depth",
            PanelKind::TimeAndSales => "time_and_sales",
            PanelKind::Sparklines => "sparklines",
            PanelKind::Macro => "macro",
            PanelKind::Fx => "fx",
            PanelKind::OptionsSkew => "options_skew",
            PanelKind::VolSurface => "vol_surface",
            PanelKind::NewsTicker => "news_ticker",
            PanelKind::YieldCurve => "yield_curve",
            PanelKind::Newswire => "newswire",
        }
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A panel placed in viewport pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSlot {
    pub kind: PanelKind,
    pub bounds: Bounds,
}

const TERMINAL_ZONES: [(PanelKind, Bounds); 11] = [
    (PanelKind::Quotes, Bounds::new(60.0, 80.0, 240.0, 120.0)),
    (PanelKind::Candles, Bounds::new(320.0, 80.0, 480.0, 180.0)),
    (PanelKind::Heatmap, Bounds::new(820.0, 80.0, 280.0, 160.0)),
    (PanelKind::Depth, Bounds::new(60.0, 220.0, 240.0, 280.0)),
    (PanelKind::TimeAndSales, Bounds::new(320.0, 280.0, 180.0, 200.0)),
    (PanelKind::Sparklines, Bounds::new(520.0, 280.0, 280.0, 200.0)),
    (PanelKind::Macro, Bounds::new(820.0, 260.0, 280.0, 220.0)),
    (PanelKind::Fx, Bounds::new(60.0, 520.0, 240.0, 160.0)),
    (PanelKind::OptionsSkew, Bounds::new(320.0, 500.0, 180.0, 120.0)),
    (PanelKind::VolSurface, Bounds::new(520.0, 500.0, 180.0, 120.0)),
    (PanelKind::NewsTicker, Bounds::new(720.0, 500.0, 380.0, 40.0)),
];

const HOVER_ZONES: [(PanelKind, Bounds); 5] = [
    (PanelKind::Quotes, Bounds::new(28.0, 28.0, 1144.0, 192.0)),
    (PanelKind::Newswire, Bounds::new(28.0, 248.0, 336.0, 296.0)),
    (PanelKind::YieldCurve, Bounds::new(392.0, 248.0, 368.0, 296.0)),
    (PanelKind::Heatmap, Bounds::new(788.0, 248.0, 384.0, 296.0)),
    (PanelKind::Sparklines, Bounds::new(28.0, 572.0, 780.0, 200.0)),
];

const COMPACT_ZONES: [(PanelKind, Bounds); 6] = [
    (PanelKind::Quotes, Bounds::new(40.0, 80.0, 320.0, 160.0)),
    (PanelKind::Candles, Bounds::new(380.0, 80.0, 780.0, 300.0)),
    (PanelKind::Depth, Bounds::new(40.0, 260.0, 320.0, 440.0)),
    (PanelKind::TimeAndSales, Bounds::new(380.0, 400.0, 240.0, 300.0)),
    (PanelKind::YieldCurve, Bounds::new(640.0, 400.0, 520.0, 300.0)),
    (PanelKind::NewsTicker, Bounds::new(380.0, 720.0, 780.0, 40.0)),
];

/// Zones of a preset in the 1200×800 reference frame
pub fn reference_zones(preset: Preset) -> &'static [(PanelKind, Bounds)] {
    match preset {
        Preset::Terminal => &TERMINAL_ZONES,
        Preset::Hover => &HOVER_ZONES,
        Preset::Compact => &COMPACT_ZONES,
    }
}

/// Scale a preset's zones to the viewport, dropping zones that end up too
/// small or that spill past the viewport edge
pub fn layout(preset: Preset, viewport: Bounds) -> Vec<PanelSlot> {
    let sx = viewport.width / REFERENCE_WIDTH;
    let sy = viewport.height / REFERENCE_HEIGHT;

    reference_zones(preset)
        .iter()
        .filter_map(|(kind, zone)| {
            let bounds = zone.scale(sx, sy);
            if bounds.width < MIN_PANEL_WIDTH || bounds.height < MIN_PANEL_HEIGHT {
                return None;
            }
            if bounds.right() > viewport.width || bounds.bottom() > viewport.height {
                return None;
            }
            Some(PanelSlot { kind: *kind, bounds })
        })
        .collect()
}

/// Draw one panel, clipped to its slot
pub fn draw_panel<S: Surface + ?Sized>(
    surface: &mut S,
    slot: &PanelSlot,
    time: &FrameTime,
    state: &MarketState,
) {
    let mut clip = Clip::new(surface, slot.bounds);
    let b = slot.bounds;
    match slot.kind {
        PanelKind::Quotes => draw_quotes(&mut clip, b, time, &state.quotes),
        PanelKind::Candles => draw_candles(&mut clip, b, time, &state.candles),
        PanelKind::Heatmap => draw_heatmap(&mut clip, b, time, &state.sectors),
        PanelKind::Depth => draw_depth(&mut clip, b, time, &state.depth),
        PanelKind::TimeAndSales => draw_time_and_sales(&mut clip, b, time, &state.trades),
        PanelKind::Sparklines => draw_sparklines(&mut clip, b, time, &state.sparklines),
        PanelKind::Macro => draw_macro(&mut clip, b, time, &state.macro_data),
        PanelKind::Fx => draw_fx(&mut clip, b, time, &state.fx_rates),
        PanelKind::OptionsSkew => draw_options_skew(&mut clip, b, time),
        PanelKind::VolSurface => draw_vol_surface(&mut clip, b, time),
        PanelKind::NewsTicker => draw_news_ticker(&mut clip, b, time, &state.headlines),
        PanelKind::YieldCurve => draw_yield_curve(&mut clip, b, time, &state.yields),
        PanelKind::Newswire => draw_newswire(&mut clip, b, time, &state.headlines),
    }
}

/// Grid plus every panel of the layout
pub fn draw_scene<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: Bounds,
    slots: &[PanelSlot],
    time: &FrameTime,
    state: &MarketState,
) {
    {
        let mut clip = Clip::new(surface, viewport);
        draw_grid(&mut clip, viewport, time);
    }
    for slot in slots {
        draw_panel(surface, slot, time, state);
    }
}

/// Panel background and border
pub(crate) fn draw_frame<S: Surface + ?Sized>(surface: &mut S, bounds: Bounds, fill: Color) {
    surface.fill_rect(bounds, fill.into());
    surface.stroke_rect(bounds, C_BORDER.into());
}

/// Connected line segments through `points`
pub(crate) fn polyline<S: Surface + ?Sized>(
    surface: &mut S,
    points: impl IntoIterator<Item = (f64, f64)>,
    paint: Paint,
) {
    let mut prev = None;
    for point in points {
        if let Some(from) = prev {
            surface.line(from, point, paint);
        }
        prev = Some(point);
    }
}
