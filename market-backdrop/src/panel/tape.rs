//! Row-oriented panels: quotes, time & sales, news ticker, newswire

use chrono::DateTime;

use super::{draw_frame, FrameTime};
use crate::palette::{direction_color, C_AMBER, C_LABEL, C_PANEL, C_PANEL_HI};
use crate::sim::{Quote, TradeTape};
use crate::surface::{Bounds, Paint, Surface, TextStyle};

const QUOTE_ROW_HEIGHT: f64 = 16.0;
const QUOTE_PADDING: f64 = 8.0;

const TAPE_ROW_HEIGHT: f64 = 14.0;
const TAPE_SCROLL_SPEED: f64 = 0.02;
/// Prints older than this start fading
const TAPE_FADE_MS: f64 = 30_000.0;
const TAPE_MIN_ALPHA: f64 = 0.3;

const TICKER_SPEED: f64 = 0.05;
const TICKER_SEPARATOR: &str = "  •  ";

/// Quote rows that fit in a panel of `height` px
pub fn quote_rows(height: f64) -> usize {
    ((height - QUOTE_PADDING * 2.0) / QUOTE_ROW_HEIGHT).floor().max(0.0) as usize
}

pub fn draw_quotes<S: Surface + ?Sized>(s: &mut S, b: Bounds, time: &FrameTime, quotes: &[Quote]) {
    draw_frame(s, b, C_PANEL_HI);
    if quotes.is_empty() {
        return;
    }

    for (i, quote) in quotes.iter().take(quote_rows(b.height)).enumerate() {
        let y = b.y + QUOTE_PADDING + i as f64 * QUOTE_ROW_HEIGHT;
        let flicker = (time.t() * 0.003 + i as f64 * 1.7).sin() * 0.1;
        let color = direction_color(quote.change_pct);

        s.text(b.x + QUOTE_PADDING, y, &quote.symbol, TextStyle::new(C_LABEL));

        let price = quote.price * (1.0 + flicker * 0.001);
        s.text(b.x + QUOTE_PADDING + 50.0, y, &format!("{:.2}", price), TextStyle::new(color));
        s.text(
            b.x + QUOTE_PADDING + 110.0,
            y,
            &format!("{:+.2}%", quote.change_pct),
            TextStyle::new(color),
        );
    }
}

/// HH:MM:SS of an epoch-millisecond stamp
fn clock(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Scrolling tape, newest print on top; old prints fade but are never dropped by age
///
/// Rows drift upward by up to one row height and then snap back, so the
/// newest print always sits in the first full row.
pub fn draw_time_and_sales<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    trades: &TradeTape,
) {
    draw_frame(s, b, C_PANEL);
    if trades.is_empty() {
        return;
    }

    let line = s.line_height();
    let row = TAPE_ROW_HEIGHT.max(line);
    let scroll = (time.t() * TAPE_SCROLL_SPEED).rem_euclid(row);
    let rows = (b.height / row).floor() as usize;

    for (i, trade) in trades.iter().rev().take(rows).enumerate() {
        let y = b.y + (i as f64 + 1.0) * row - scroll;
        if y + line > b.bottom() {
            break;
        }

        let age = (time.wall_ms - trade.timestamp_ms).max(0) as f64;
        let alpha = (1.0 - age / TAPE_FADE_MS).max(TAPE_MIN_ALPHA);
        let style = TextStyle::new(direction_color(if trade.side.is_buy() { 1.0 } else { -1.0 }))
            .alpha(alpha);

        s.text(b.x + 4.0, y, &clock(trade.timestamp_ms), style);
        s.text(b.x + 76.0, y, &format!("{:.2}", trade.price), style);
        s.text(b.x + 132.0, y, &format!("{}", trade.size.floor()), style);
    }
}

/// Headline crawl with a period of text width plus panel width
///
/// The wrap happens while the text is entirely off-panel. The second copy
/// trails by one full period and only matters to surfaces wider than the
/// panel; clipped to the panel it never shows.
pub fn draw_news_ticker<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    headlines: &[String],
) {
    if headlines.is_empty() {
        return;
    }
    draw_frame(s, b, C_PANEL_HI);

    let text = headlines.join(TICKER_SEPARATOR);
    let text_width = s.measure_text(&text);
    let cycle = text_width + b.width;
    // Paused crawl starts at the head of the text rather than off-panel
    let offset = if time.motion > 0.0 {
        (time.t() * TICKER_SPEED).rem_euclid(cycle)
    } else {
        b.width
    };

    let x = b.right() - offset;
    let style = TextStyle::new(C_AMBER).middle();
    s.text(x, b.center_y(), &text, style);
    if x < b.right() - text_width {
        s.text(x + cycle, b.center_y(), &text, style);
    }
}

/// Bulleted headline list with a slow horizontal sway
pub fn draw_newswire<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    headlines: &[String],
) {
    s.fill_rect(b, Paint::solid(C_PANEL).with_alpha(0.9));
    s.text(b.x + 10.0, b.y + 6.0, "NEWSWIRE", TextStyle::new(C_AMBER));
    let row = s.line_height() + 2.0;
    for (i, headline) in headlines.iter().enumerate() {
        let y = b.y + 30.0 + i as f64 * row;
        let sway = (time.t() * 0.001 + i as f64).sin() * 4.0;
        s.text(b.x + 12.0 + sway, y, &format!("• {}", headline), TextStyle::new(C_LABEL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Side, Trade};
    use crate::surface::{Clip, DrawCommand, RecordingSurface};

    fn quotes(n: usize) -> Vec<Quote> {
        (0..n)
            .map(|i| Quote {
                symbol: format!("SYM{}", i),
                price: 100.0 + i as f64,
                change_pct: if i % 2 == 0 { 0.5 } else { -0.5 },
                last_update_ms: 0,
            })
            .collect()
    }

    fn symbol_rows(rec: &RecordingSurface) -> usize {
        rec.texts().iter().filter(|t| t.starts_with("SYM")).count()
    }

    #[test]
    fn test_quote_rows_truncate() {
        assert_eq!(quote_rows(120.0), 6);
        assert_eq!(quote_rows(16.0), 0);
        assert_eq!(quote_rows(0.0), 0);

        let mut rec = RecordingSurface::default();
        draw_quotes(&mut rec, Bounds::new(0.0, 0.0, 240.0, 120.0), &FrameTime::new(0.0, 0), &quotes(8));
        assert_eq!(symbol_rows(&rec), 6);

        let mut rec = RecordingSurface::default();
        draw_quotes(&mut rec, Bounds::new(0.0, 0.0, 240.0, 400.0), &FrameTime::new(0.0, 0), &quotes(8));
        assert_eq!(symbol_rows(&rec), 8);
    }

    #[test]
    fn test_quote_flicker_is_tiny() {
        let mut rec = RecordingSurface::default();
        draw_quotes(&mut rec, Bounds::new(0.0, 0.0, 240.0, 120.0), &FrameTime::new(523.0, 0), &quotes(1));
        // 100.00 * (1 ± 0.0001) still prints as 99.99..100.01
        let price: f64 = rec.texts()[1].parse().unwrap();
        assert!((price - 100.0).abs() <= 0.011);
    }

    #[test]
    fn test_old_prints_fade_but_stay() {
        let mut tape = TradeTape::new();
        let now = 1_700_000_100_000;
        tape.push(Trade { price: 10.0, size: 5.0, side: Side::Buy, timestamp_ms: now - 120_000 });
        tape.push(Trade { price: 11.0, size: 5.0, side: Side::Sell, timestamp_ms: now });

        let mut rec = RecordingSurface::default();
        draw_time_and_sales(&mut rec, Bounds::new(0.0, 0.0, 180.0, 200.0), &FrameTime::new(0.0, now), &tape);

        let alphas: Vec<(String, f64)> = rec
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, style, .. } if text.contains('.') => {
                    Some((text.clone(), style.paint.alpha))
                }
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![("11.00".to_string(), 1.0), ("10.00".to_string(), 0.3)]);
    }

    fn tape_of(n: usize, now: i64) -> TradeTape {
        let mut tape = TradeTape::new();
        for i in 0..n {
            tape.push(Trade {
                price: 100.0 + i as f64,
                size: 10.0,
                side: if i % 2 == 0 { Side::Buy } else { Side::Sell },
                timestamp_ms: now - (n - i) as i64 * 1_000,
            });
        }
        tape
    }

    fn clipped_tape(b: Bounds, time: &FrameTime, tape: &TradeTape) -> RecordingSurface {
        let mut rec = RecordingSurface::default();
        {
            let mut clip = Clip::new(&mut rec, b);
            draw_time_and_sales(&mut clip, b, time, tape);
        }
        rec
    }

    #[test]
    fn test_tape_newest_print_survives_clip() {
        let b = Bounds::new(320.0, 280.0, 180.0, 200.0);
        let now = 1_700_000_100_000;
        for tape in [tape_of(1, now), tape_of(50, now)] {
            let newest = format!("{:.2}", 100.0 + (tape.len() - 1) as f64);
            for t in [0.0, 100.0, 350.0, 650.0, 799.0] {
                let rec = clipped_tape(b, &FrameTime::new(t, now), &tape);
                assert!(rec.texts().contains(&newest.as_str()), "{} missing at t={}", newest, t);
                assert!(rec.commands.iter().all(|c| b.contains_bounds(&c.extent())));
            }
        }
    }

    #[test]
    fn test_tape_shows_newest_window() {
        let b = Bounds::new(320.0, 280.0, 180.0, 200.0);
        let rec = clipped_tape(b, &FrameTime::new(0.0, 0), &tape_of(50, 0));
        let prices: Vec<&str> = rec.texts().into_iter().filter(|t| t.contains('.')).collect();
        // 200 px / 16 px rows = 12 slots, the first one left for the upward drift
        assert_eq!(prices.len(), 11);
        assert_eq!(prices.first(), Some(&"149.00"));
        assert_eq!(prices.last(), Some(&"139.00"));
    }

    #[test]
    fn test_tape_scrolls_upward() {
        let b = Bounds::new(0.0, 0.0, 180.0, 200.0);
        let tape = tape_of(1, 0);
        let price_y = |t: f64| {
            clipped_tape(b, &FrameTime::new(t, 0), &tape)
                .commands
                .iter()
                .find_map(|c| match c {
                    DrawCommand::Text { text, extent, .. } if text == "100.00" => Some(extent.y),
                    _ => None,
                })
        };
        let (y0, y1, y2) = (price_y(0.0), price_y(100.0), price_y(300.0));
        assert_eq!(y0, Some(16.0));
        assert_eq!(y1, Some(14.0));
        assert_eq!(y2, Some(10.0));
    }

    #[test]
    fn test_tape_reduced_motion_holds_still() {
        let b = Bounds::new(0.0, 0.0, 180.0, 200.0);
        let tape = tape_of(5, 0);
        let still = |t: f64| clipped_tape(b, &FrameTime::new(t, 0).with_reduced_motion(true), &tape).commands;
        assert_eq!(still(0.0), still(517.0));
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(clock(0), "00:00:00");
        assert_eq!(clock(3_723_000), "01:02:03");
    }

    #[test]
    fn test_ticker_dual_draw_near_wrap() {
        let headlines = vec!["ALPHA".to_string(), "BETA".to_string()];
        let b = Bounds::new(0.0, 0.0, 400.0, 40.0);
        // "ALPHA  •  BETA" is 14 glyphs = 112 px; cycle = 512 px
        let text_width = 112.0;

        let mut rec = RecordingSurface::default();
        // offset = 100 px: text still entering from the right, single draw
        draw_news_ticker(&mut rec, b, &FrameTime::new(2_000.0, 0), &headlines);
        assert_eq!(rec.texts().len(), 1);

        let mut rec = RecordingSurface::default();
        // offset = 450 px: head already past the left edge, second copy queued
        draw_news_ticker(&mut rec, b, &FrameTime::new(9_000.0, 0), &headlines);
        assert_eq!(rec.texts().len(), 2);
        let starts: Vec<f64> = rec
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { extent, .. } => Some(extent.x),
                _ => None,
            })
            .collect();
        assert_eq!(starts[1] - starts[0], text_width + b.width);
    }

    #[test]
    fn test_ticker_wraps_off_panel() {
        let headlines = vec!["ALPHA".to_string(), "BETA".to_string()];
        let b = Bounds::new(0.0, 0.0, 400.0, 40.0);
        let visible = |t: f64| {
            let mut rec = RecordingSurface::default();
            {
                let mut clip = Clip::new(&mut rec, b);
                draw_news_ticker(&mut clip, b, &FrameTime::new(t, 0), &headlines);
            }
            rec.texts().into_iter().map(str::to_string).collect::<Vec<_>>()
        };

        // Cycle is 512 px at 0.05 px/ms: 10_240 ms per period
        for step in 0..512 {
            assert!(visible(step as f64 * 20.0).len() <= 1);
        }
        // Both sides of the wrap show nothing: the seam is never on screen
        assert!(visible(10_230.0).is_empty());
        assert!(visible(10_250.0).is_empty());
        // Mid-crawl the head is on screen
        assert_eq!(visible(4_000.0), vec!["ALPHA  •  BETA".to_string()]);
    }

    #[test]
    fn test_ticker_is_clipped_to_panel() {
        let headlines = vec!["A very long headline that cannot fit".to_string()];
        let b = Bounds::new(100.0, 0.0, 120.0, 40.0);
        let mut rec = RecordingSurface::default();
        {
            let mut clip = Clip::new(&mut rec, b);
            draw_news_ticker(&mut clip, b, &FrameTime::new(3_000.0, 0), &headlines);
        }
        assert!(rec.commands.iter().all(|c| b.contains_bounds(&c.extent())));
    }

    #[test]
    fn test_empty_inputs_draw_frame_only() {
        let mut rec = RecordingSurface::default();
        let time = FrameTime::new(0.0, 0);
        draw_quotes(&mut rec, Bounds::new(0.0, 0.0, 240.0, 120.0), &time, &[]);
        draw_time_and_sales(&mut rec, Bounds::new(0.0, 0.0, 180.0, 200.0), &time, &TradeTape::new());
        assert!(rec.texts().is_empty());

        let mut rec = RecordingSurface::default();
        draw_news_ticker(&mut rec, Bounds::new(0.0, 0.0, 380.0, 40.0), &time, &[]);
        assert!(rec.commands.is_empty());
    }
}
