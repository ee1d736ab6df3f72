//! Background grid with an edge vignette

use super::FrameTime;
use crate::palette::C_GRID;
use crate::surface::{Bounds, Paint, Surface};

const GRID_STEP: f64 = 40.0;
const GRID_ALPHA: f64 = 0.6;
/// How much of the grid's opacity is lost at the viewport edge
const VIGNETTE: f64 = 0.5;

/// Opacity of a grid line `distance` px from the centre of a `half`-px span
fn line_alpha(distance: f64, half: f64) -> f64 {
    if half <= 0.0 {
        return GRID_ALPHA;
    }
    GRID_ALPHA * (1.0 - VIGNETTE * (distance / half).min(1.0))
}

pub fn draw_grid<S: Surface + ?Sized>(s: &mut S, viewport: Bounds, _time: &FrameTime) {
    let (half_w, half_h) = (viewport.width / 2.0, viewport.height / 2.0);

    let mut x = viewport.x + GRID_STEP;
    while x < viewport.right() {
        let alpha = line_alpha((x - viewport.center_x()).abs(), half_w);
        s.line((x, viewport.y), (x, viewport.bottom()), Paint::solid(C_GRID).with_alpha(alpha));
        x += GRID_STEP;
    }

    let mut y = viewport.y + GRID_STEP;
    while y < viewport.bottom() {
        let alpha = line_alpha((y - viewport.center_y()).abs(), half_h);
        s.line((viewport.x, y), (viewport.right(), y), Paint::solid(C_GRID).with_alpha(alpha));
        y += GRID_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_grid_line_count() {
        let mut rec = RecordingSurface::default();
        draw_grid(&mut rec, Bounds::new(0.0, 0.0, 1200.0, 800.0), &FrameTime::new(0.0, 0));
        // 29 verticals (40..1160) and 19 horizontals (40..760)
        assert_eq!(rec.commands.len(), 29 + 19);
    }

    #[test]
    fn test_vignette_fades_edges() {
        let mut rec = RecordingSurface::default();
        draw_grid(&mut rec, Bounds::new(0.0, 0.0, 1200.0, 800.0), &FrameTime::new(0.0, 0));
        let alpha_at = |x: f64| {
            rec.commands.iter().find_map(|c| match c {
                DrawCommand::Line { from, to, paint } if from.0 == x && to.0 == x => Some(paint.alpha),
                _ => None,
            })
        };
        let centre = alpha_at(600.0).unwrap_or_default();
        let edge = alpha_at(40.0).unwrap_or_default();
        assert!(centre > edge);
        assert_eq!(centre, GRID_ALPHA);
    }
}
