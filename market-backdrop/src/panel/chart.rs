//! Line and bar charts: candles, sparklines, options skew, vol surface, yield curve

use std::f64::consts::PI;

use tracing::debug;

use super::{draw_frame, polyline, FrameTime};
use crate::palette::{
    direction_color, C_AMBER, C_DIVIDER, C_DOWN, C_EMA_FAST, C_EMA_SLOW, C_LABEL, C_PANEL, C_STEEL,
    C_UP,
};
use crate::sim::{ema, Candle, Sparkline, YieldPoint};
use crate::surface::{Align, Bounds, Paint, Surface, TextStyle};

const CHART_PADDING: f64 = 8.0;
const EMA_FAST: usize = 9;
const EMA_SLOW: usize = 21;

/// OHLC candles with a 9/21 EMA overlay on closes
///
/// A flat or non-finite price range draws the frame only.
pub fn draw_candles<S: Surface + ?Sized>(s: &mut S, b: Bounds, _time: &FrameTime, candles: &[Candle]) {
    if candles.is_empty() {
        return;
    }
    draw_frame(s, b, C_PANEL);

    let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let range = high - low;
    if !(range.is_finite() && range > 0.0) {
        debug!(high, low, "candle range degenerate, skipping candles");
        return;
    }

    let candle_width = ((b.width - CHART_PADDING * 2.0) / candles.len() as f64).max(2.0);
    let scale_y = (b.height - CHART_PADDING * 2.0) / range;
    let y_of = |price: f64| b.y + CHART_PADDING + (high - price) * scale_y;
    let x_of = |i: usize| b.x + CHART_PADDING + i as f64 * candle_width;

    for (i, candle) in candles.iter().enumerate() {
        let x = x_of(i);
        let center_x = x + candle_width / 2.0;

        s.line((center_x, y_of(candle.high)), (center_x, y_of(candle.low)), C_STEEL.into());

        let color = if candle.is_up() { C_UP } else { C_DOWN };
        let (open_y, close_y) = (y_of(candle.open), y_of(candle.close));
        let body = Bounds::new(
            x,
            open_y.min(close_y),
            candle_width - 1.0,
            (close_y - open_y).abs().max(1.0),
        );
        s.fill_rect(body, Paint::solid(color).with_alpha(0.8));
        s.stroke_rect(body, color.into());
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    for (period, color) in [(EMA_FAST, C_EMA_FAST), (EMA_SLOW, C_EMA_SLOW)] {
        let series = ema(&closes, period);
        polyline(
            s,
            series
                .iter()
                .enumerate()
                .map(|(i, v)| (x_of(i) + candle_width / 2.0, y_of(*v))),
            color.into(),
        );
    }
}

/// One tile per symbol: label and last price on the left, line chart on the right
pub fn draw_sparklines<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    _time: &FrameTime,
    sparklines: &[Sparkline],
) {
    draw_frame(s, b, C_PANEL);
    if sparklines.is_empty() {
        return;
    }

    let tile_height = b.height / sparklines.len() as f64;
    let half_line = s.line_height() / 2.0;

    for (i, spark) in sparklines.iter().enumerate() {
        let tile_y = b.y + i as f64 * tile_height;
        s.line((b.x, tile_y + tile_height), (b.right(), tile_y + tile_height), C_DIVIDER.into());

        if spark.len() < 2 {
            continue;
        }

        let prices = spark.prices();
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max - min > 0.0 { max - min } else { 1.0 };
        let chart_width = b.width - 80.0;
        let chart_height = tile_height - CHART_PADDING * 2.0;
        let last = (prices.len() - 1) as f64;
        let color = if spark.is_up() { C_UP } else { C_DOWN };

        polyline(
            s,
            prices.iter().enumerate().map(|(j, price)| {
                (
                    b.x + 60.0 + j as f64 / last * chart_width,
                    tile_y + CHART_PADDING + (1.0 - (price - min) / range) * chart_height,
                )
            }),
            color.into(),
        );

        let mid = tile_y + tile_height / 2.0;
        s.text(b.x + CHART_PADDING, mid - half_line, &spark.symbol, TextStyle::new(C_LABEL).middle());
        s.text(
            b.x + CHART_PADDING,
            mid + half_line,
            &format!("{:.2}", spark.current),
            TextStyle::new(color).middle(),
        );
    }
}

const SKEW_AMPLITUDE: f64 = 20.0;
const SKEW_STRIKES: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

/// Implied-vol smile as a drifting parabola with five strike markers
pub fn draw_options_skew<S: Surface + ?Sized>(s: &mut S, b: Bounds, time: &FrameTime) {
    draw_frame(s, b, C_PANEL);

    let center_x = b.center_x();
    let center_y = b.center_y();
    let period = b.width * 0.8;
    let drift = (time.t() * 0.002).sin() * 0.1;
    let skew_y = |n: f64| center_y - (n * n * 0.5 + drift) * SKEW_AMPLITUDE;

    let steps = (period / 2.0).floor() as usize;
    polyline(
        s,
        (0..=steps).map(|k| {
            let i = k as f64 * 2.0;
            let normalized = (i - period / 2.0) / (period / 2.0) * 2.0;
            (b.x + 10.0 + i, skew_y(normalized))
        }),
        Paint::solid(C_AMBER),
    );

    for strike in SKEW_STRIKES {
        s.dot(center_x + strike * period * 0.3, skew_y(strike), C_STEEL.into());
    }

    s.text(b.x + 4.0, b.y + 4.0, "IV%", TextStyle::new(C_LABEL));
}

const SURFACE_LINES: usize = 5;

/// Stacked wave lines suggesting a volatility surface slice
pub fn draw_vol_surface<S: Surface + ?Sized>(s: &mut S, b: Bounds, time: &FrameTime) {
    draw_frame(s, b, C_PANEL);

    let base_y = b.y + b.height * 0.7;
    let t = time.t();
    let steps = (b.width / 3.0).ceil() as usize;

    for line in 0..SURFACE_LINES {
        let alpha = 0.3 + (line as f64 / SURFACE_LINES as f64) * 0.4;
        let y_offset = line as f64 * -8.0;
        polyline(
            s,
            (0..steps).map(|k| {
                let x = k as f64 * 3.0;
                let nx = x / b.width;
                let wave1 = (nx * PI * 4.0 + t * 0.001 + line as f64).sin() * 10.0;
                let wave2 = (nx * PI * 8.0 + t * 0.0015).sin() * 5.0;
                (b.x + x, base_y + y_offset + wave1 + wave2)
            }),
            Paint::solid(C_STEEL).with_alpha(alpha),
        );
    }
}

/// Treasury curve across tenors with a labelled point per tenor
pub fn draw_yield_curve<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    yields: &[YieldPoint],
) {
    draw_frame(s, b, C_PANEL);
    s.text(b.x + CHART_PADDING, b.y + 4.0, "UST CURVE", TextStyle::new(C_AMBER));
    if yields.len() < 2 {
        return;
    }

    let line_height = s.line_height();
    let plot = Bounds::new(
        b.x + CHART_PADDING * 2.0,
        b.y + line_height + CHART_PADDING,
        b.width - CHART_PADDING * 4.0,
        b.height - line_height * 3.0 - CHART_PADDING,
    );
    if plot.is_empty() {
        return;
    }

    let min = yields.iter().map(|p| p.yield_pct).fold(f64::INFINITY, f64::min);
    let max = yields.iter().map(|p| p.yield_pct).fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    let breathe = (time.t() * 0.0015).sin() * 2.0;
    let last = (yields.len() - 1) as f64;
    let point = |i: usize, y: f64| {
        (
            plot.x + i as f64 / last * plot.width,
            plot.y + (1.0 - (y - min) / range) * plot.height + breathe,
        )
    };

    polyline(
        s,
        yields.iter().enumerate().map(|(i, p)| point(i, p.yield_pct)),
        Paint::solid(C_STEEL),
    );

    let slope = yields[yields.len() - 1].yield_pct - yields[0].yield_pct;
    let label_y = plot.bottom() + CHART_PADDING;
    for (i, p) in yields.iter().enumerate() {
        let (x, y) = point(i, p.yield_pct);
        s.dot(x, y, direction_color(slope).into());
        s.text(x, label_y, &p.tenor, TextStyle::new(C_LABEL).align(Align::Center));
    }
    s.text(
        b.right() - CHART_PADDING,
        b.y + 4.0,
        &format!("{:+.0}bp", slope * 100.0),
        TextStyle::new(direction_color(slope)).align(Align::Right),
    );
}
