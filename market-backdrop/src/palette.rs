/// Terminal palette and colour arithmetic for the backdrop
use ratatui::style::Color;

// ============================================================================
// COLORS - dark terminal palette
// ============================================================================
pub const C_BLACK: Color = Color::Rgb(0, 0, 0);
pub const C_PANEL: Color = Color::Rgb(10, 21, 32); // Panel background
pub const C_PANEL_HI: Color = Color::Rgb(15, 27, 46); // Tape/ticker background
pub const C_BORDER: Color = Color::Rgb(30, 58, 82);
pub const C_GRID: Color = Color::Rgb(13, 34, 53);
pub const C_DIVIDER: Color = Color::Rgb(42, 77, 107);
pub const C_UP: Color = Color::Rgb(30, 212, 124); // Green
pub const C_DOWN: Color = Color::Rgb(255, 80, 80); // Red
pub const C_LABEL: Color = Color::Rgb(160, 180, 200);
pub const C_STEEL: Color = Color::Rgb(74, 127, 167);
pub const C_AMBER: Color = Color::Rgb(255, 140, 66);
pub const C_WHITE: Color = Color::Rgb(255, 255, 255);
pub const C_GLOW: Color = Color::Rgb(0, 185, 255); // Spotlight inner glow
pub const C_EMA_FAST: Color = Color::Rgb(255, 200, 87);
pub const C_EMA_SLOW: Color = Color::Rgb(180, 130, 220);

/// Up/down colour for a signed value
pub fn direction_color(value: f64) -> Color {
    if value >= 0.0 {
        C_UP
    } else {
        C_DOWN
    }
}

/// RGB components; named colours fall back to black
pub fn rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::White => (255, 255, 255),
        Color::Gray => (192, 192, 192),
        Color::DarkGray => (128, 128, 128),
        _ => (0, 0, 0),
    }
}

/// Source-over blend of `top` onto `bottom` at `alpha`
pub fn blend(top: Color, bottom: Color, alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let (tr, tg, tb) = rgb(top);
    let (br, bg, bb) = rgb(bottom);
    let mix = |t: u8, b: u8| (f64::from(t) * a + f64::from(b) * (1.0 - a)).round() as u8;
    Color::Rgb(mix(tr, br), mix(tg, bg), mix(tb, bb))
}

/// Scale a colour toward black by `alpha`
pub fn fade(color: Color, alpha: f64) -> Color {
    blend(color, C_BLACK, alpha)
}

/// Additive tint, saturating per channel
pub fn tint(color: Color, glow: Color, strength: f64) -> Color {
    let s = strength.clamp(0.0, 1.0);
    let (r, g, b) = rgb(color);
    let (gr, gg, gb) = rgb(glow);
    let add = |c: u8, t: u8| (f64::from(c) + f64::from(t) * s).min(255.0).round() as u8;
    Color::Rgb(add(r, gr), add(g, gg), add(b, gb))
}

/// HSL to RGB; hue in degrees, saturation and lightness in percent
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(channel(r1), channel(g1), channel(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_extremes() {
        assert_eq!(blend(C_WHITE, C_BLACK, 1.0), C_WHITE);
        assert_eq!(blend(C_WHITE, C_BLACK, 0.0), C_BLACK);
        assert_eq!(blend(C_WHITE, C_BLACK, 0.5), Color::Rgb(128, 128, 128));
    }

    #[test]
    fn test_fade_to_black() {
        assert_eq!(fade(C_UP, 0.0), C_BLACK);
        assert_eq!(fade(C_UP, 1.0), C_UP);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl(0.0, 100.0, 50.0), Color::Rgb(255, 0, 0));
        assert_eq!(hsl(120.0, 100.0, 50.0), Color::Rgb(0, 255, 0));
        assert_eq!(hsl(120.0, 0.0, 20.0), Color::Rgb(51, 51, 51));
    }

    #[test]
    fn test_tint_saturates() {
        assert_eq!(tint(C_WHITE, C_GLOW, 1.0), C_WHITE);
        assert_eq!(tint(C_BLACK, C_GLOW, 0.0), C_BLACK);
    }
}
