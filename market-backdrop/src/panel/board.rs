//! Tile boards: sector heatmap, macro dashboard, FX rates

use super::{draw_frame, FrameTime};
use crate::palette::{direction_color, hsl, C_LABEL, C_PANEL, C_STEEL, C_WHITE};
use crate::sim::{FxRate, MacroIndicator, SectorReturn};
use crate::surface::{Align, Bounds, Surface, TextStyle};

const HEATMAP_COLUMNS: usize = 4;
/// Sector names longer than this are abbreviated
const SECTOR_NAME_MAX: usize = 8;

const MACRO_COLUMNS: usize = 2;

const FX_ROW_HEIGHT: f64 = 18.0;
const FX_PADDING: f64 = 4.0;

fn abbreviate(name: &str) -> String {
    if name.chars().count() > SECTOR_NAME_MAX {
        let mut short: String = name.chars().take(SECTOR_NAME_MAX).collect();
        short.push('.');
        short
    } else {
        name.to_string()
    }
}

/// Fill colour of a heatmap tile: green for gains, red for losses, stronger with magnitude
pub fn heat_color(return_pct: f64, pulse: f64) -> ratatui::style::Color {
    let intensity = return_pct.abs() / 4.0 * pulse;
    let hue = if return_pct >= 0.0 { 120.0 } else { 0.0 };
    hsl(hue, (intensity * 100.0).min(80.0), 20.0 + intensity * 20.0)
}

pub fn draw_heatmap<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    sectors: &[SectorReturn],
) {
    draw_frame(s, b, C_PANEL);
    if sectors.is_empty() {
        return;
    }

    let rows = sectors.len().div_ceil(HEATMAP_COLUMNS);
    let cell_width = (b.width - 8.0) / HEATMAP_COLUMNS as f64;
    let cell_height = (b.height - 8.0) / rows as f64;
    let half_line = s.line_height() / 2.0;

    for (i, sector) in sectors.iter().enumerate() {
        let x = b.x + 4.0 + (i % HEATMAP_COLUMNS) as f64 * cell_width;
        let y = b.y + 4.0 + (i / HEATMAP_COLUMNS) as f64 * cell_height;
        let pulse = 1.0 + (time.t() * 0.001 + i as f64 * 0.5).sin() * 0.1;

        s.fill_rect(
            Bounds::new(x, y, cell_width - 2.0, cell_height - 2.0),
            heat_color(sector.return_pct, pulse).into(),
        );

        let cx = x + cell_width / 2.0;
        let cy = y + cell_height / 2.0;
        let style = TextStyle::new(C_WHITE).align(Align::Center).middle().alpha(0.9);
        s.text(cx, cy - half_line, &abbreviate(&sector.sector), style);
        s.text(cx, cy + half_line, &format!("{:+.1}%", sector.return_pct), style);
    }
}

pub fn draw_macro<S: Surface + ?Sized>(
    s: &mut S,
    b: Bounds,
    time: &FrameTime,
    indicators: &[MacroIndicator],
) {
    draw_frame(s, b, C_PANEL);
    if indicators.is_empty() {
        return;
    }

    let rows = indicators.len().div_ceil(MACRO_COLUMNS);
    let cell_width = b.width / MACRO_COLUMNS as f64;
    let cell_height = b.height / rows as f64;
    let line = s.line_height();

    for (i, item) in indicators.iter().enumerate() {
        let x = b.x + (i % MACRO_COLUMNS) as f64 * cell_width;
        let y = b.y + (i / MACRO_COLUMNS) as f64 * cell_height;
        let glow = item.change.abs() * (time.t() * 0.004).sin() * 0.1;
        let color = direction_color(item.change);

        s.text(x + 4.0, y + 4.0, &item.name, TextStyle::new(C_STEEL));
        let style = TextStyle::new(color).alpha(0.8 + glow);
        s.text(x + 4.0, y + 4.0 + line, &format!("{:.2}", item.value), style);
        s.text(x + 4.0, y + 4.0 + line * 2.0, &format!("{:+.2}", item.change), style);
    }
}

pub fn draw_fx<S: Surface + ?Sized>(s: &mut S, b: Bounds, time: &FrameTime, rates: &[FxRate]) {
    draw_frame(s, b, C_PANEL);

    let rows = ((b.height - FX_PADDING * 2.0) / FX_ROW_HEIGHT).floor().max(0.0) as usize;
    for (i, fx) in rates.iter().take(rows).enumerate() {
        let y = b.y + FX_PADDING + i as f64 * FX_ROW_HEIGHT;
        let flicker = (time.t() * 0.003 + i as f64 * 2.1).sin() * 0.002;

        s.text(b.x + FX_PADDING, y, &fx.pair, TextStyle::new(C_LABEL));
        s.text(
            b.x + FX_PADDING + 60.0,
            y,
            &format!("{:.4}", fx.rate * (1.0 + flicker)),
            TextStyle::new(direction_color(fx.change_pct)),
        );
        s.text(
            b.right() - FX_PADDING,
            y,
            &format!("{:+.2}%", fx.change_pct),
            TextStyle::new(direction_color(fx.change_pct)).align(Align::Right).alpha(0.7),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::rgb;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_abbreviate_sector_names() {
        assert_eq!(abbreviate("Tech"), "Tech");
        assert_eq!(abbreviate("Industrials"), "Industri.");
        assert_eq!(abbreviate("Consumer"), "Consumer");
    }

    #[test]
    fn test_heat_color_hue_by_sign() {
        let (r, g, _) = rgb(heat_color(2.0, 1.0));
        assert!(g > r);
        let (r, g, _) = rgb(heat_color(-2.0, 1.0));
        assert!(r > g);
        // Flat sector is fully desaturated
        let (r, g, b) = rgb(heat_color(0.0, 1.0));
        assert!(r == g && g == b);
    }

    #[test]
    fn test_heatmap_tiles_per_sector() {
        let sectors: Vec<SectorReturn> = (0..12)
            .map(|i| SectorReturn { sector: format!("S{}", i), return_pct: i as f64 - 6.0 })
            .collect();
        let mut rec = RecordingSurface::default();
        draw_heatmap(&mut rec, Bounds::new(0.0, 0.0, 280.0, 160.0), &FrameTime::new(0.0, 0), &sectors);
        // Background plus one tile per sector
        assert_eq!(rec.count(|c| matches!(c, DrawCommand::FillRect { .. })), 13);
        assert!(rec.texts().contains(&"-6.0%"));
        assert!(rec.texts().contains(&"+5.0%"));
    }

    #[test]
    fn test_fx_rows_fit_height() {
        let rates: Vec<FxRate> = (0..6)
            .map(|i| FxRate { pair: format!("P{}", i), rate: 1.0, change_pct: 0.1 })
            .collect();
        let mut rec = RecordingSurface::default();
        draw_fx(&mut rec, Bounds::new(0.0, 0.0, 240.0, 80.0), &FrameTime::new(0.0, 0), &rates);
        // floor((80 - 8) / 18) = 4
        assert_eq!(rec.texts().iter().filter(|t| t.starts_with('P')).count(), 4);
    }

    #[test]
    fn test_macro_two_columns() {
        let items: Vec<MacroIndicator> = (0..6)
            .map(|i| MacroIndicator { name: format!("M{}", i), value: 1.0, change: -0.1 })
            .collect();
        let mut rec = RecordingSurface::default();
        draw_macro(&mut rec, Bounds::new(0.0, 0.0, 280.0, 220.0), &FrameTime::new(0.0, 0), &items);
        let xs: Vec<f64> = rec
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, extent, .. } if text.starts_with('M') => Some(extent.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![4.0, 144.0, 4.0, 144.0, 4.0, 144.0]);
    }
}
