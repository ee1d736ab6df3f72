//! Order book ladder

use super::{draw_frame, FrameTime};
use crate::palette::{C_AMBER, C_DOWN, C_PANEL, C_UP};
use crate::sim::{BookSide, DepthLevel};
use crate::surface::{Align, Bounds, Paint, Surface, TextStyle};

/// Levels shown per side
const LADDER_LEVELS: usize = 12;
const MAX_ROW_HEIGHT: f64 = 12.0;
/// Price column width; size bars start here
const PRICE_COLUMN: f64 = 60.0;

/// Bids stacked upward from the centre line, asks downward, bars by size
pub fn draw_depth<S: Surface + ?Sized>(s: &mut S, b: Bounds, time: &FrameTime, depth: &[DepthLevel]) {
    draw_frame(s, b, C_PANEL);

    let max_size = depth.iter().map(|d| d.size).fold(0.0, f64::max);
    if depth.is_empty() || !(max_size > 0.0 && max_size.is_finite()) {
        return;
    }

    let center_y = b.center_y();
    let row_height = MAX_ROW_HEIGHT.min((b.height - 20.0) / (LADDER_LEVELS * 2) as f64);
    if row_height <= 0.0 {
        return;
    }
    let bar_span = b.width - PRICE_COLUMN;

    let ladder = |side: BookSide| {
        depth
            .iter()
            .filter(move |d| d.side == side)
            .take(LADDER_LEVELS)
            .enumerate()
    };

    for (side, direction, color) in [(BookSide::Bid, -1.0, C_UP), (BookSide::Ask, 1.0, C_DOWN)] {
        for (i, level) in ladder(side) {
            let y = center_y + direction * (i as f64 + 1.0) * row_height;
            let pulse = 1.0 + (time.t() * 0.002 + i as f64).sin() * 0.05;
            let bar_width = level.size / max_size * bar_span * pulse;

            s.fill_rect(
                Bounds::new(b.x + PRICE_COLUMN, y - row_height / 2.0, bar_width, row_height),
                Paint::solid(color).with_alpha(0.2),
            );
            s.text(
                b.x + PRICE_COLUMN - 5.0,
                y,
                &format!("{:.2}", level.price),
                TextStyle::new(color).align(Align::Right).middle(),
            );
            s.text(
                b.x + PRICE_COLUMN + 5.0,
                y,
                &format!("{}", level.size.floor()),
                TextStyle::new(color).middle(),
            );
        }
    }

    s.text(
        b.center_x(),
        center_y,
        "SPREAD",
        TextStyle::new(C_AMBER).align(Align::Center).middle(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn ladder(levels: usize) -> Vec<DepthLevel> {
        let mut out = Vec::new();
        for i in 0..levels {
            let size = 1000.0 * (-0.3 * i as f64).exp();
            out.push(DepthLevel { price: 99.9 - i as f64 * 0.01, size, side: BookSide::Bid });
            out.push(DepthLevel { price: 100.1 + i as f64 * 0.01, size, side: BookSide::Ask });
        }
        out
    }

    fn price_rows(rec: &RecordingSurface) -> Vec<(f64, f64)> {
        rec.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, extent, style } if style.align == Align::Right => {
                    text.parse::<f64>().ok().map(|p| (p, extent.center_y()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bids_above_asks_below() {
        let mut rec = RecordingSurface::default();
        let b = Bounds::new(0.0, 0.0, 240.0, 280.0);
        draw_depth(&mut rec, b, &FrameTime::new(0.0, 0), &ladder(15));

        let rows = price_rows(&rec);
        assert_eq!(rows.len(), LADDER_LEVELS * 2);
        for (price, y) in rows {
            if price < 100.0 {
                assert!(y < b.center_y());
            } else {
                assert!(y > b.center_y());
            }
        }
        assert!(rec.texts().contains(&"SPREAD"));
    }

    #[test]
    fn test_largest_level_gets_longest_bar() {
        let mut rec = RecordingSurface::default();
        draw_depth(&mut rec, Bounds::new(0.0, 0.0, 240.0, 280.0), &FrameTime::new(0.0, 0), &ladder(3));
        let widths: Vec<f64> = rec
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, paint } if paint.alpha < 1.0 => Some(rect.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), 6);
        // Within 5% animation of the full span for level 0, shrinking after
        assert!(widths[0] > 180.0 * 0.95 && widths[0] <= 180.0 * 1.05);
        assert!(widths[1] < widths[0] && widths[2] < widths[1]);
    }

    #[test]
    fn test_empty_or_zero_size_book() {
        let mut rec = RecordingSurface::default();
        draw_depth(&mut rec, Bounds::new(0.0, 0.0, 240.0, 280.0), &FrameTime::new(0.0, 0), &[]);
        assert!(rec.texts().is_empty());

        let zero = vec![DepthLevel { price: 1.0, size: 0.0, side: BookSide::Bid }];
        let mut rec = RecordingSurface::default();
        draw_depth(&mut rec, Bounds::new(0.0, 0.0, 240.0, 280.0), &FrameTime::new(0.0, 0), &zero);
        assert!(rec.texts().is_empty());
    }
}
