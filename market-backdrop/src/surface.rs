//! Drawing surfaces for the panel renderer
//!
//! Panels draw in pixel space through the [`Surface`] trait. Three
//! implementations exist:
//! - [`CellSurface`] rasterizes onto a ratatui [`Buffer`] using [`CellMetrics`]
//! - [`Clip`] drops or truncates everything outside a rectangle
//! - [`RecordingSurface`] keeps the raw command list (headless rendering, tests)

use ratatui::{buffer::Buffer, style::Color};
use serde::{Deserialize, Serialize};

use crate::palette::{blend, C_BLACK};

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Edge-inclusive point test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Edge-inclusive rectangle test, with a small tolerance for float noise
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let out = Bounds::new(x, y, right - x, bottom - y);
        (!out.is_empty()).then_some(out)
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Bounds {
        Bounds::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }
}

/// Pixel size of one terminal cell
///
/// Plays the role of the device pixel ratio: every pixel-space coordinate is
/// divided by these factors when rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CellMetrics {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

impl CellMetrics {
    /// Pixel viewport of a `cols` × `rows` terminal
    pub fn viewport(&self, cols: u16, rows: u16) -> Bounds {
        Bounds::new(
            0.0,
            0.0,
            f64::from(cols) * self.width_px,
            f64::from(rows) * self.height_px,
        )
    }

    /// Pixel-space centre of a cell
    pub fn cell_center(&self, col: u16, row: u16) -> (f64, f64) {
        (
            (f64::from(col) + 0.5) * self.width_px,
            (f64::from(row) + 0.5) * self.height_px,
        )
    }
}

/// Colour plus opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub alpha: f64,
}

impl Paint {
    pub const fn solid(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub paint: Paint,
    pub align: Align,
    pub baseline: Baseline,
}

impl TextStyle {
    pub fn new(color: Color) -> Self {
        Self {
            paint: Paint::solid(color),
            align: Align::Left,
            baseline: Baseline::Top,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn middle(mut self) -> Self {
        self.baseline = Baseline::Middle;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.paint = self.paint.with_alpha(alpha);
        self
    }
}

/// Pixel-space drawing target
pub trait Surface {
    fn fill_rect(&mut self, rect: Bounds, paint: Paint);

    fn stroke_rect(&mut self, rect: Bounds, paint: Paint);

    fn line(&mut self, from: (f64, f64), to: (f64, f64), paint: Paint);

    /// Small filled marker (strike dots, points)
    fn dot(&mut self, x: f64, y: f64, paint: Paint);

    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle);

    /// Monospace advance of one glyph
    fn char_width(&self) -> f64;

    fn line_height(&self) -> f64;

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width()
    }

    /// Pixel rectangle a text command covers
    fn text_extent(&self, x: f64, y: f64, text: &str, style: &TextStyle) -> Bounds {
        let width = self.measure_text(text);
        let height = self.line_height();
        let left = match style.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let top = match style.baseline {
            Baseline::Top => y,
            Baseline::Middle => y - height / 2.0,
        };
        Bounds::new(left, top, width, height)
    }
}

// ============================================================================
// CLIPPING
// ============================================================================

/// Surface adapter that keeps every command inside `bounds`
pub struct Clip<'a, S: Surface + ?Sized> {
    inner: &'a mut S,
    bounds: Bounds,
}

impl<'a, S: Surface + ?Sized> Clip<'a, S> {
    pub fn new(inner: &'a mut S, bounds: Bounds) -> Self {
        Self { inner, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl<S: Surface + ?Sized> Surface for Clip<'_, S> {
    fn fill_rect(&mut self, rect: Bounds, paint: Paint) {
        if let Some(r) = rect.intersect(&self.bounds) {
            self.inner.fill_rect(r, paint);
        }
    }

    fn stroke_rect(&mut self, rect: Bounds, paint: Paint) {
        if self.bounds.contains_bounds(&rect) {
            self.inner.stroke_rect(rect, paint);
            return;
        }
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.line((l, t), (r, t), paint);
        self.line((r, t), (r, b), paint);
        self.line((r, b), (l, b), paint);
        self.line((l, b), (l, t), paint);
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), paint: Paint) {
        if let Some((a, b)) = clip_segment(&self.bounds, from, to) {
            self.inner.line(a, b, paint);
        }
    }

    fn dot(&mut self, x: f64, y: f64, paint: Paint) {
        if self.bounds.contains(x, y) {
            self.inner.dot(x, y, paint);
        }
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let extent = self.text_extent(x, y, text, &style);
        if extent.y < self.bounds.y - 1e-6 || extent.bottom() > self.bounds.bottom() + 1e-6 {
            return;
        }

        let cw = self.char_width();
        let mut first_kept = None;
        let mut kept = String::new();
        for (i, ch) in text.chars().enumerate() {
            let left = extent.x + i as f64 * cw;
            if left >= self.bounds.x - 1e-6 && left + cw <= self.bounds.right() + 1e-6 {
                first_kept.get_or_insert(left);
                kept.push(ch);
            }
        }

        if let Some(left) = first_kept {
            let style = TextStyle {
                align: Align::Left,
                baseline: Baseline::Top,
                ..style
            };
            self.inner.text(left, extent.y, &kept, style);
        }
    }

    fn char_width(&self) -> f64 {
        self.inner.char_width()
    }

    fn line_height(&self) -> f64 {
        self.inner.line_height()
    }
}

/// Liang–Barsky segment clipping
fn clip_segment(b: &Bounds, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, from.0 - b.x),
        (dx, b.right() - from.0),
        (-dy, from.1 - b.y),
        (dy, b.bottom() - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

// ============================================================================
// CELL RASTERIZER
// ============================================================================

/// Rasterizes pixel-space commands onto terminal cells
pub struct CellSurface<'a> {
    buf: &'a mut Buffer,
    metrics: CellMetrics,
}

impl<'a> CellSurface<'a> {
    pub fn new(buf: &'a mut Buffer, metrics: CellMetrics) -> Self {
        Self { buf, metrics }
    }

    fn col(&self, x: f64) -> i64 {
        (x / self.metrics.width_px).floor() as i64
    }

    fn row(&self, y: f64) -> i64 {
        (y / self.metrics.height_px).floor() as i64
    }

    fn put(&mut self, col: i64, row: i64, symbol: &str, paint: Paint) {
        let area = self.buf.area;
        if col < i64::from(area.left())
            || row < i64::from(area.top())
            || col >= i64::from(area.right())
            || row >= i64::from(area.bottom())
        {
            return;
        }
        if let Some(cell) = self.buf.cell_mut((col as u16, row as u16)) {
            let fg = blend(paint.color, background(cell.bg), paint.alpha);
            cell.set_symbol(symbol).set_fg(fg);
        }
    }
}

fn background(color: Color) -> Color {
    match color {
        Color::Reset => C_BLACK,
        other => other,
    }
}

impl Surface for CellSurface<'_> {
    fn fill_rect(&mut self, rect: Bounds, paint: Paint) {
        let area = self.buf.area;
        let (cw, ch) = (self.metrics.width_px, self.metrics.height_px);
        let cols = self.col(rect.x).max(i64::from(area.left()))
            ..=self.col(rect.right()).min(i64::from(area.right()) - 1);
        let rows = self.row(rect.y).max(i64::from(area.top()))
            ..=self.row(rect.bottom()).min(i64::from(area.bottom()) - 1);

        for row in rows {
            let cy = (row as f64 + 0.5) * ch;
            if cy < rect.y || cy >= rect.bottom() {
                continue;
            }
            for col in cols.clone() {
                let cx = (col as f64 + 0.5) * cw;
                if cx < rect.x || cx >= rect.right() {
                    continue;
                }
                if let Some(cell) = self.buf.cell_mut((col as u16, row as u16)) {
                    let bg = blend(paint.color, background(cell.bg), paint.alpha);
                    cell.set_bg(bg);
                    if paint.alpha >= 0.999 {
                        cell.set_symbol(" ");
                    }
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Bounds, paint: Paint) {
        let (c0, c1) = (self.col(rect.x), self.col(rect.right() - 0.001));
        let (r0, r1) = (self.row(rect.y), self.row(rect.bottom() - 0.001));
        for col in c0 + 1..c1 {
            self.put(col, r0, "─", paint);
            self.put(col, r1, "─", paint);
        }
        for row in r0 + 1..r1 {
            self.put(c0, row, "│", paint);
            self.put(c1, row, "│", paint);
        }
        self.put(c0, r0, "┌", paint);
        self.put(c1, r0, "┐", paint);
        self.put(c0, r1, "└", paint);
        self.put(c1, r1, "┘", paint);
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), paint: Paint) {
        let (dxp, dyp) = (to.0 - from.0, to.1 - from.1);
        // Slope in cell units picks the glyph
        let (sx, sy) = (dxp / self.metrics.width_px, dyp / self.metrics.height_px);
        let glyph = if sx.abs() > 2.0 * sy.abs() {
            "─"
        } else if sy.abs() > 2.0 * sx.abs() {
            "│"
        } else if (sx > 0.0) == (sy > 0.0) {
            "╲"
        } else {
            "╱"
        };

        let (mut x0, mut y0) = (self.col(from.0), self.row(from.1));
        let (x1, y1) = (self.col(to.0), self.row(to.1));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, glyph, paint);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += step_x;
            }
            if e2 <= dx {
                err += dx;
                y0 += step_y;
            }
        }
    }

    fn dot(&mut self, x: f64, y: f64, paint: Paint) {
        let (col, row) = (self.col(x), self.row(y));
        self.put(col, row, "●", paint);
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let extent = self.text_extent(x, y, text, &style);
        let row = self.row(extent.center_y());
        let cw = self.metrics.width_px;
        let mut glyph = [0u8; 4];
        for (i, ch) in text.chars().enumerate() {
            let col = self.col(extent.x + (i as f64 + 0.5) * cw);
            self.put(col, row, ch.encode_utf8(&mut glyph), style.paint);
        }
    }

    fn char_width(&self) -> f64 {
        self.metrics.width_px
    }

    fn line_height(&self) -> f64 {
        self.metrics.height_px
    }
}

// ============================================================================
// RECORDING
// ============================================================================

/// A single drawing command captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Bounds, paint: Paint },
    StrokeRect { rect: Bounds, paint: Paint },
    Line { from: (f64, f64), to: (f64, f64), paint: Paint },
    Dot { x: f64, y: f64, paint: Paint },
    Text { extent: Bounds, text: String, style: TextStyle },
}

impl DrawCommand {
    /// Pixel rectangle touched by this command
    pub fn extent(&self) -> Bounds {
        match self {
            DrawCommand::FillRect { rect, .. } | DrawCommand::StrokeRect { rect, .. } => *rect,
            DrawCommand::Line { from, to, .. } => Bounds::new(
                from.0.min(to.0),
                from.1.min(to.1),
                (to.0 - from.0).abs(),
                (to.1 - from.1).abs(),
            ),
            DrawCommand::Dot { x, y, .. } => Bounds::new(*x, *y, 0.0, 0.0),
            DrawCommand::Text { extent, .. } => *extent,
        }
    }
}

/// Surface that records commands instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    char_width: f64,
    line_height: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        let metrics = CellMetrics::default();
        Self::new(metrics.width_px, metrics.height_px)
    }
}

impl RecordingSurface {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            commands: Vec::new(),
            char_width,
            line_height,
        }
    }

    /// Text of every text command, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Bounds, paint: Paint) {
        self.commands.push(DrawCommand::FillRect { rect, paint });
    }

    fn stroke_rect(&mut self, rect: Bounds, paint: Paint) {
        self.commands.push(DrawCommand::StrokeRect { rect, paint });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), paint: Paint) {
        self.commands.push(DrawCommand::Line { from, to, paint });
    }

    fn dot(&mut self, x: f64, y: f64, paint: Paint) {
        self.commands.push(DrawCommand::Dot { x, y, paint });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let extent = self.text_extent(x, y, text, &style);
        self.commands.push(DrawCommand::Text {
            extent,
            text: text.to_string(),
            style,
        });
    }

    fn char_width(&self) -> f64 {
        self.char_width
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{C_UP, C_WHITE};
    use ratatui::layout::Rect;

    #[test]
    fn test_bounds_intersect() {
        let a = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let b = Bounds::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Some(Bounds::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(a.intersect(&Bounds::new(200.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_clip_segment() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(clip_segment(&b, (-5.0, 5.0), (15.0, 5.0)), Some(((0.0, 5.0), (10.0, 5.0))));
        assert_eq!(clip_segment(&b, (-5.0, -5.0), (-1.0, 20.0)), None);
        assert_eq!(clip_segment(&b, (2.0, 2.0), (3.0, 3.0)), Some(((2.0, 2.0), (3.0, 3.0))));
    }

    #[test]
    fn test_clip_truncates_text() {
        let mut rec = RecordingSurface::default();
        {
            let mut clip = Clip::new(&mut rec, Bounds::new(0.0, 0.0, 40.0, 32.0));
            // 10 glyphs from x=16, only 3 fit in [16, 40]
            clip.text(16.0, 0.0, "ABCDEFGHIJ", TextStyle::new(C_WHITE));
            // Starts left of the clip: leading glyphs dropped
            clip.text(-8.0, 16.0, "XYZ", TextStyle::new(C_WHITE));
            // Below the clip
            clip.text(0.0, 30.0, "NOPE", TextStyle::new(C_WHITE));
        }
        assert_eq!(rec.texts(), vec!["ABC", "YZ"]);
        let clip = Bounds::new(0.0, 0.0, 40.0, 32.0);
        assert!(rec.commands.iter().all(|c| clip.contains_bounds(&c.extent())));
    }

    #[test]
    fn test_clip_stroke_partially_outside() {
        let mut rec = RecordingSurface::default();
        {
            let mut clip = Clip::new(&mut rec, Bounds::new(0.0, 0.0, 50.0, 50.0));
            clip.stroke_rect(Bounds::new(25.0, 25.0, 50.0, 50.0), Paint::solid(C_UP));
        }
        // Only the top and left edges survive, shortened
        assert_eq!(rec.commands.len(), 2);
        let clip = Bounds::new(0.0, 0.0, 50.0, 50.0);
        assert!(rec.commands.iter().all(|c| clip.contains_bounds(&c.extent())));
    }

    #[test]
    fn test_cell_surface_fill_and_text() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        {
            let mut surface = CellSurface::new(&mut buf, CellMetrics::default());
            surface.fill_rect(Bounds::new(0.0, 0.0, 40.0, 32.0), Paint::solid(C_UP));
            surface.text(8.0, 16.0, "HI", TextStyle::new(C_WHITE));
        }
        assert_eq!(buf.cell((0, 0)).map(|c| c.bg), Some(C_UP));
        assert_eq!(buf.cell((4, 0)).map(|c| c.bg), Some(Color::Reset));
        assert_eq!(buf.cell((1, 1)).map(|c| c.symbol().to_string()), Some("H".to_string()));
        assert_eq!(buf.cell((2, 1)).map(|c| c.symbol().to_string()), Some("I".to_string()));
    }

    #[test]
    fn test_cell_surface_ignores_offscreen() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        let mut surface = CellSurface::new(&mut buf, CellMetrics::default());
        surface.line((-100.0, -100.0), (1000.0, 1000.0), Paint::solid(C_UP));
        surface.text(-50.0, 0.0, "OFFSCREEN", TextStyle::new(C_WHITE));
        surface.stroke_rect(Bounds::new(-10.0, -10.0, 500.0, 500.0), Paint::solid(C_UP));
        surface.dot(9999.0, 9999.0, Paint::solid(C_UP));
    }
}
