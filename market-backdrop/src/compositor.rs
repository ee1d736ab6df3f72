//! Offscreen/visible buffer pair and the spotlight composite
//!
//! The visible buffer starts each frame pure black. The offscreen scene is
//! copied in and then kept only where the radial mask allows: fully inside
//! 60 % of the radius, fading linearly to nothing at the radius.

use ratatui::{buffer::Buffer, layout::Rect};

use crate::palette::{fade, tint, C_BLACK, C_GLOW};
use crate::surface::CellMetrics;

/// Mask is fully opaque inside this fraction of the radius
const MASK_INNER: f64 = 0.6;
/// Cells revealed less than this show colour only, no glyph
const GLYPH_CUTOFF: f64 = 0.15;
/// Glow reaches this multiple of the radius
const GLOW_REACH: f64 = 1.25;
const GLOW_PEAK: f64 = 0.18;

/// Opacity of the spotlight mask at `distance` px from its centre
pub fn mask_alpha(distance: f64, radius: f64) -> f64 {
    if !(radius > 0.0) {
        return 0.0;
    }
    let inner = radius * MASK_INNER;
    if distance <= inner {
        1.0
    } else if distance >= radius {
        0.0
    } else {
        1.0 - (distance - inner) / (radius - inner)
    }
}

fn glow_strength(distance: f64, radius: f64) -> f64 {
    if !(radius > 0.0) {
        return 0.0;
    }
    (GLOW_PEAK * (1.0 - distance / (radius * GLOW_REACH))).max(0.0)
}

/// Spotlight geometry for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    pub center: (f64, f64),
    pub radius: f64,
    pub glow: bool,
}

/// The two cell buffers a mounted backdrop draws into
#[derive(Debug, Clone)]
pub struct Canvases {
    pub offscreen: Buffer,
    pub visible: Buffer,
}

impl Canvases {
    pub fn new(area: Rect) -> Self {
        Self {
            offscreen: Buffer::empty(area),
            visible: Buffer::empty(area),
        }
    }

    pub fn area(&self) -> Rect {
        self.visible.area
    }

    /// Reallocate both buffers for a new terminal size
    pub fn resize(&mut self, area: Rect) {
        self.offscreen = Buffer::empty(area);
        self.visible = Buffer::empty(area);
    }

    /// Visible buffer to solid black
    pub fn blackout(&mut self) {
        let area = self.visible.area;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = self.visible.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_bg(C_BLACK);
                }
            }
        }
    }

    /// Black out the visible buffer, then reveal the offscreen scene through `mask`
    pub fn composite(&mut self, mask: &Mask, metrics: CellMetrics) {
        self.blackout();
        if !(mask.radius > 0.0) {
            return;
        }

        let area = self.visible.area;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let (px, py) = metrics.cell_center(x, y);
                let distance = (px - mask.center.0).hypot(py - mask.center.1);
                let alpha = mask_alpha(distance, mask.radius);
                let glow = if mask.glow { glow_strength(distance, mask.radius) } else { 0.0 };
                if alpha <= 0.0 && glow <= 0.0 {
                    continue;
                }

                let (Some(src), Some(dst)) = (self.offscreen.cell((x, y)), self.visible.cell_mut((x, y)))
                else {
                    continue;
                };

                let (mut fg, mut bg) = (fade(src.fg, alpha), fade(src.bg, alpha));
                if glow > 0.0 {
                    fg = tint(fg, C_GLOW, glow);
                    bg = tint(bg, C_GLOW, glow);
                }
                if alpha >= GLYPH_CUTOFF {
                    dst.set_symbol(src.symbol());
                }
                dst.set_fg(fg).set_bg(bg);
            }
        }
    }
}
